// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT compatibility tests.
//!
//! These tests pin the session token format: HS256 with `sub`, `iat` and
//! `exp` claims. Tokens minted by other HS256 clients with the same secret
//! must verify, and anything else must not.

use chrono::Duration;
use ev_station_manager::services::{TokenError, TokenService};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

/// Claims structure that must match what the token service writes.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

fn external_token(algorithm: Algorithm, claims: &impl Serialize) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

fn service() -> TokenService {
    TokenService::new(SIGNING_KEY, Duration::hours(24))
}

#[test]
fn test_issued_token_decodes_with_plain_hs256() {
    let token = service().issue("user-42").unwrap();

    let data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SIGNING_KEY),
        &Validation::new(Algorithm::HS256),
    )
    .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(data.claims.sub, "user-42");
    assert_eq!(data.claims.exp - data.claims.iat, 24 * 60 * 60);
}

#[test]
fn test_externally_signed_token_verifies() {
    let now = chrono::Utc::now().timestamp();
    let token = external_token(
        Algorithm::HS256,
        &Claims {
            sub: "user-7".to_string(),
            exp: now + 3600,
            iat: now,
        },
    );

    let verified = service().verify(&token).unwrap();
    assert_eq!(verified.user_id, "user-7");
    assert_eq!(verified.issued_at, now);
}

#[test]
fn test_other_algorithm_is_rejected() {
    let now = chrono::Utc::now().timestamp();
    let token = external_token(
        Algorithm::HS512,
        &Claims {
            sub: "user-7".to_string(),
            exp: now + 3600,
            iat: now,
        },
    );

    assert_eq!(service().verify(&token), Err(TokenError::Malformed));
}

#[test]
fn test_token_without_subject_is_rejected() {
    #[derive(Serialize)]
    struct NoSubject {
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now().timestamp();
    let token = external_token(
        Algorithm::HS256,
        &NoSubject {
            exp: now + 3600,
            iat: now,
        },
    );

    assert_eq!(service().verify(&token), Err(TokenError::Malformed));
}

#[test]
fn test_expiry_is_exact() {
    let now = chrono::Utc::now().timestamp();
    let token = external_token(
        Algorithm::HS256,
        &Claims {
            sub: "user-7".to_string(),
            exp: now - 1,
            iat: now - 3600,
        },
    );

    assert_eq!(service().verify(&token), Err(TokenError::Expired));
}
