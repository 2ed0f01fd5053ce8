// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard aggregation over the station collection.
//!
//! Recomputed from a single full read on every request; the collection is
//! small enough that no stored aggregate is kept.

use crate::db::Database;
use crate::error::Result;
use crate::models::{DashboardSummary, Station, StationStatus, UserProfile};

/// Number of stations listed under "recent".
pub const RECENT_STATIONS_LIMIT: usize = 5;

/// Build the dashboard for `user`.
pub async fn summary(db: &Database, user: &UserProfile) -> Result<DashboardSummary> {
    let stations = db.list_stations().await?;
    tracing::debug!(user_id = %user.id, stations = stations.len(), "Building dashboard");
    Ok(summarize(user.clone(), stations))
}

/// Compute counts and recent stations. `stations` must be newest first.
pub fn summarize(user: UserProfile, stations: Vec<Station>) -> DashboardSummary {
    let (mut active, mut inactive, mut maintenance) = (0, 0, 0);
    for station in &stations {
        match station.status {
            StationStatus::Active => active += 1,
            StationStatus::Inactive => inactive += 1,
            StationStatus::Maintenance => maintenance += 1,
        }
    }

    let recent_stations: Vec<Station> = stations
        .into_iter()
        .take(RECENT_STATIONS_LIMIT)
        .collect();

    DashboardSummary {
        message: format!("Welcome, {}!", user.name),
        user,
        recent_stations,
        active_count: active,
        inactive_count: inactive,
        maintenance_count: maintenance,
        total_count: active + inactive + maintenance,
    }
}
