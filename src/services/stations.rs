// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Station lifecycle: list, fetch, create, full-replace update, delete.

use validator::Validate;

use crate::config::Config;
use crate::db::{new_document_id, Database};
use crate::error::{AppError, Result};
use crate::models::station::KNOWN_CONNECTOR_TYPES;
use crate::models::{Station, StationInput, UserProfile};
use crate::time_utils::now_millis;

const NOT_FOUND: &str = "Station not found";

/// Validation rules that depend on configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationRules {
    /// Only accept connector types from [`KNOWN_CONNECTOR_TYPES`].
    pub strict_connector_types: bool,
}

impl StationRules {
    /// Normalize and validate client input.
    pub fn check(&self, input: StationInput) -> Result<StationInput> {
        let input = input.normalized();
        input.validate()?;

        if self.strict_connector_types
            && !KNOWN_CONNECTOR_TYPES.contains(&input.connector_type.as_str())
        {
            return Err(AppError::Validation(format!(
                "connectorType: must be one of {}",
                KNOWN_CONNECTOR_TYPES.join(", ")
            )));
        }
        Ok(input)
    }
}

impl From<&Config> for StationRules {
    fn from(config: &Config) -> Self {
        Self {
            strict_connector_types: config.strict_connector_types,
        }
    }
}

/// All stations, newest first.
pub async fn list(db: &Database) -> Result<Vec<Station>> {
    db.list_stations().await
}

pub async fn get(db: &Database, station_id: &str) -> Result<Station> {
    db.get_station(station_id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Create a station attributed to `creator`.
pub async fn create(
    db: &Database,
    rules: StationRules,
    input: StationInput,
    creator: &UserProfile,
) -> Result<Station> {
    let input = rules.check(input)?;
    let station = Station::from_input(
        new_document_id(),
        input,
        Some(creator.id.clone()),
        now_millis(),
    );
    db.insert_station(&station).await?;

    tracing::info!(station_id = %station.id, created_by = %creator.id, "Station created");
    Ok(station)
}

/// Replace every mutable field of an existing station. This is not a
/// partial patch: fields the client leaves out are reset.
pub async fn update(
    db: &Database,
    rules: StationRules,
    station_id: &str,
    input: StationInput,
) -> Result<Station> {
    let existing = get(db, station_id).await?;
    let input = rules.check(input)?;

    let station = existing.replaced_with(input, now_millis());
    if !db.replace_station(&station).await? {
        // Deleted between the read and the write.
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(station_id = %station.id, "Station updated");
    Ok(station)
}

pub async fn delete(db: &Database, station_id: &str) -> Result<()> {
    if !db.delete_station(station_id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(station_id, "Station deleted");
    Ok(())
}

/// Load a batch of stations without a creator, replacing the existing set
/// unless `keep_existing`. Every entry is checked before anything is written.
pub async fn seed(
    db: &Database,
    rules: StationRules,
    inputs: Vec<StationInput>,
    keep_existing: bool,
) -> Result<usize> {
    let now = now_millis();
    let stations = inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| {
            let input = rules.check(input).map_err(|e| match e {
                AppError::Validation(msg) => {
                    AppError::Validation(format!("stations[{}]: {}", idx, msg))
                }
                other => other,
            })?;
            Ok(Station::from_input(new_document_id(), input, None, now))
        })
        .collect::<Result<Vec<Station>>>()?;

    if !keep_existing {
        let removed = db.clear_stations().await?;
        tracing::info!(removed, "Cleared existing stations");
    }

    let inserted = db.insert_stations(&stations).await?;
    tracing::info!(inserted, "Seeded stations");
    Ok(inserted)
}
