// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Station routes. Reads are public; writes require a session token.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::{require_admin, require_auth, AuthUser};
use crate::models::{Station, StationInput};
use crate::services::stations::{self, StationRules};
use crate::AppState;

/// Station routes. The auth guard is attached per method so `GET` stays
/// public on the same paths; the admin guard on delete is opt-in.
pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state.clone(), require_auth);

    let delete_route = if state.config.admin_only_delete {
        delete(delete_station).route_layer(middleware::from_fn(require_admin))
    } else {
        delete(delete_station)
    };

    Router::new()
        .route(
            "/api/stations",
            get(list_stations).merge(post(create_station).route_layer(auth.clone())),
        )
        .route(
            "/api/stations/{id}",
            get(get_station).merge(
                put(update_station)
                    .merge(delete_route)
                    .route_layer(auth),
            ),
        )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

async fn list_stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Station>>> {
    Ok(Json(stations::list(&state.db).await?))
}

async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Station>> {
    Ok(Json(stations::get(&state.db, &id).await?))
}

async fn create_station(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<StationInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Station>)> {
    let Json(input) = body?;
    let station = stations::create(
        &state.db,
        StationRules::from(&state.config),
        input,
        &user.profile,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(station)))
}

/// Full replace of the station's mutable fields.
async fn update_station(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: std::result::Result<Json<StationInput>, JsonRejection>,
) -> Result<Json<Station>> {
    let Json(input) = body?;
    tracing::debug!(station_id = %id, user_id = %user.id(), "Replacing station");
    let station =
        stations::update(&state.db, StationRules::from(&state.config), &id, input).await?;
    Ok(Json(station))
}

async fn delete_station(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    tracing::debug!(station_id = %id, user_id = %user.id(), "Deleting station");
    stations::delete(&state.db, &id).await?;
    Ok(Json(MessageResponse {
        message: "Station deleted successfully".to_string(),
    }))
}
