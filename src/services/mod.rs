// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod dashboard;
pub mod password;
pub mod stations;
pub mod token;

pub use stations::StationRules;
pub use token::{TokenError, TokenService, VerifiedToken};
