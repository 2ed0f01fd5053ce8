// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication middleware.

use crate::error::AppError;
use crate::models::{Role, UserProfile};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user resolved from the session token.
///
/// Inserted as a request extension by [`require_auth`]; handlers take it as
/// `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile: UserProfile,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role == Role::Admin
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid session token for an existing user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::MissingToken)?;

    let verified = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected session token");
        AppError::from(e)
    })?;

    // The account may have been removed after the token was issued.
    let user = state
        .db
        .get_user(&verified.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %verified.user_id, "Token for unknown user");
            AppError::UserNotFound
        })?;

    request.extensions_mut().insert(AuthUser {
        profile: user.profile(),
    });

    Ok(next.run(request).await)
}

/// Middleware that additionally requires the `admin` role. Must run after
/// [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AppError::MissingToken)?;

    if !user.is_admin() {
        tracing::info!(user_id = %user.id(), "Blocked non-admin request");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
