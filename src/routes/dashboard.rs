// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard route (requires authentication).

use axum::{extract::State, middleware, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{require_auth, AuthUser};
use crate::models::DashboardSummary;
use crate::services::dashboard;
use crate::AppState;

pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Summary for the signed-in user.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardSummary>> {
    Ok(Json(dashboard::summary(&state.db, &user.profile).await?))
}
