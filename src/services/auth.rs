// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{new_document_id, Database};
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{Role, User, UserProfile};
use crate::services::password;
use crate::services::TokenService;
use crate::time_utils::now_millis;

/// Registration payload.
#[derive(Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login payload.
#[derive(Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

const REDACTED: &str = "[redacted]";

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Token plus the public user profile.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Create a user and sign them in.
pub async fn register(
    db: &Database,
    tokens: &TokenService,
    request: RegisterRequest,
) -> Result<AuthResponse> {
    let request = RegisterRequest {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        password: request.password,
    };
    request.validate()?;

    // Cheap pre-check before paying for a hash; create_user still enforces
    // uniqueness.
    if db.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let plaintext = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let user = User {
        id: new_document_id(),
        name: request.name,
        email: request.email,
        password_hash,
        role: Role::User,
        created_at: now_millis(),
    };
    db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    let token = tokens.issue(&user.id)?;
    Ok(AuthResponse {
        token,
        user: user.profile(),
    })
}

/// Verify credentials and sign in. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn login(
    db: &Database,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<AuthResponse> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let user = db.find_user_by_email(&email).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let plaintext = request.password;
    let verified = tokio::task::spawn_blocking(move || {
        password::verify_or_dummy(&plaintext, stored_hash.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = %user.id, "User logged in");
            let token = tokens.issue(&user.id)?;
            Ok(AuthResponse {
                token,
                user: user.profile(),
            })
        }
        _ => {
            tracing::info!("Login rejected");
            Err(AppError::InvalidCredentials)
        }
    }
}
