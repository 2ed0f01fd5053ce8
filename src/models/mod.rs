// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod dashboard;
pub mod station;
pub mod user;

pub use dashboard::DashboardSummary;
pub use station::{Location, LocationInput, Station, StationInput, StationStatus};
pub use user::{EmailClaim, Role, User, UserProfile};
