// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Charging station model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Connector types offered by the station form.
pub const KNOWN_CONNECTOR_TYPES: [&str; 8] = [
    "Type 1 (J1772)",
    "Type 2 (Mennekes)",
    "CCS1",
    "CCS2",
    "CHAdeMO",
    "Tesla",
    "GB/T",
    "Other",
];

/// Operational status of a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

/// Geographic position of a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Station record stored in the `stations` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Generated ID (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub location: Location,
    pub status: StationStatus,
    /// Rated power in kW
    pub power_output: f64,
    pub connector_type: String,
    /// ID of the user who created the station
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// Build a new record from validated input.
    pub fn from_input(
        id: String,
        input: StationInput,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: input.name,
            location: input.location.into(),
            status: input.status.unwrap_or_default(),
            power_output: input.power_output,
            connector_type: input.connector_type,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace: every mutable field comes from `input`, including
    /// optional ones the client left out. Identity, creator and creation time
    /// are kept.
    pub fn replaced_with(&self, input: StationInput, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            ..Self::from_input(String::new(), input, None, now)
        }
    }
}

/// Location fields accepted on create/update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct LocationInput {
    #[validate(custom(function = "validate_latitude"))]
    pub latitude: f64,
    #[validate(custom(function = "validate_longitude"))]
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    check_coordinate(value, 90.0, "Latitude must be between -90 and 90")
}

fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    check_coordinate(value, 180.0, "Longitude must be between -180 and 180")
}

fn check_coordinate(value: f64, bound: f64, message: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() && value.abs() <= bound {
        Ok(())
    } else {
        Err(ValidationError::new("range").with_message(message.into()))
    }
}

impl From<LocationInput> for Location {
    fn from(input: LocationInput) -> Self {
        Self {
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
        }
    }
}

/// Station fields accepted on create/update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StationInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(nested)]
    pub location: LocationInput,
    /// Defaults to `active` when omitted
    #[serde(default)]
    pub status: Option<StationStatus>,
    #[validate(range(min = 0.0, message = "Power output must be non-negative"))]
    pub power_output: f64,
    #[validate(length(min = 1, message = "Connector type is required"))]
    pub connector_type: String,
}

impl StationInput {
    /// Trim free-text fields; a blank address becomes absent.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.connector_type = self.connector_type.trim().to_string();
        self.location.address = self
            .location
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(power_output: f64) -> StationInput {
        serde_json::from_value(serde_json::json!({
            "name": "  Downtown Hub ",
            "location": { "latitude": 40.7, "longitude": -74.0, "address": "  " },
            "powerOutput": power_output,
            "connectorType": " CCS2 "
        }))
        .unwrap()
    }

    #[test]
    fn test_normalized_trims_fields() {
        let input = input(50.0).normalized();
        assert_eq!(input.name, "Downtown Hub");
        assert_eq!(input.connector_type, "CCS2");
        assert_eq!(input.location.address, None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_negative_power_output_fails_validation() {
        let errors = input(-1.0).normalized().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("power_output"));
    }

    #[test]
    fn test_out_of_range_latitude_fails_validation() {
        let mut input = input(22.0).normalized();
        input.location.latitude = 91.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<StationInput, _> = serde_json::from_value(serde_json::json!({
            "name": "X",
            "location": { "latitude": 0.0, "longitude": 0.0 },
            "status": "broken",
            "powerOutput": 7.0,
            "connectorType": "Tesla"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_replace_keeps_identity_and_unsets_omitted_fields() {
        let created = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut first = input(50.0);
        first.location.address = Some("1 Main St".to_string());
        first.status = Some(StationStatus::Maintenance);
        let station = Station::from_input(
            "s1".to_string(),
            first.normalized(),
            Some("u1".to_string()),
            created,
        );

        let later = created + chrono::Duration::minutes(5);
        let replaced = station.replaced_with(input(11.0).normalized(), later);

        assert_eq!(replaced.id, "s1");
        assert_eq!(replaced.created_by.as_deref(), Some("u1"));
        assert_eq!(replaced.created_at, created);
        assert_eq!(replaced.updated_at, later);
        assert_eq!(replaced.power_output, 11.0);
        assert_eq!(replaced.status, StationStatus::Active);
        assert_eq!(replaced.location.address, None);
    }

    #[test]
    fn test_station_json_uses_frontend_field_names() {
        let now = chrono::Utc::now();
        let station = Station::from_input("s1".to_string(), input(50.0).normalized(), None, now);
        let json = serde_json::to_value(&station).unwrap();

        assert_eq!(json["_id"], "s1");
        assert_eq!(json["powerOutput"], 50.0);
        assert_eq!(json["connectorType"], "CCS2");
        assert_eq!(json["status"], "active");
        assert!(json.get("createdBy").is_none());
        assert!(json["createdAt"].is_string());
    }
}
