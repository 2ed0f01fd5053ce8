// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard summary returned to signed-in users.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Station, UserProfile};

/// Summary statistics over the station collection.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Greeting addressed to the signed-in user
    pub message: String,
    pub user: UserProfile,
    /// Most recently created stations, newest first
    pub recent_stations: Vec<Station>,
    pub active_count: usize,
    pub inactive_count: usize,
    pub maintenance_count: usize,
    pub total_count: usize,
}
