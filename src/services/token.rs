// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature or structure is invalid")]
    Malformed,
    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::MalformedToken,
            TokenError::Expired => AppError::ExpiredToken,
        }
    }
}

/// Identity decoded from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Mints and checks session tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(signing_key: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Create a token as if issued at `issued_at`.
    pub fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Token expiry out of range")))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Check signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(VerifiedToken {
            user_id: data.claims.sub,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    fn service() -> TokenService {
        TokenService::new(KEY, Duration::hours(24))
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let tokens = service();
        let token = tokens.issue("user-123").unwrap();

        let verified = tokens.verify(&token).unwrap();
        assert_eq!(verified.user_id, "user-123");
        assert_eq!(verified.expires_at - verified.issued_at, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(25);
        let token = tokens.issue_at("user-123", issued).unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token_is_malformed() {
        let tokens = service();
        let token = tokens.issue("user-123").unwrap();

        // Flip a character in the signature segment.
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 2;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert_eq!(tokens.verify(&tampered), Err(TokenError::Malformed));
    }

    #[test]
    fn test_token_from_other_secret_is_malformed() {
        let other = TokenService::new(b"another_signing_key_32_bytes!!!!", Duration::hours(1));
        let token = other.issue("user-123").unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(service().verify("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(service().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_overflowing_ttl_is_an_error() {
        let tokens = TokenService::new(KEY, Duration::hours(2_500_000_000));
        assert!(matches!(tokens.issue("user-123"), Err(AppError::Internal(_))));
    }
}
