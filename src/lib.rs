// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EV Station Manager: REST backend for electric-vehicle charging stations.
//!
//! This crate provides the authentication, station CRUD and dashboard
//! endpoints consumed by the station-management frontend.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::TokenService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub tokens: TokenService,
}

impl AppState {
    /// Build state from config and an opened database handle.
    pub fn new(config: Config, db: Database) -> Self {
        let tokens = TokenService::new(&config.jwt_signing_key, config.token_ttl);
        Self { config, db, tokens }
    }
}
