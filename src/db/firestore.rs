// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credential records)
//! - User emails (uniqueness claims, one document per normalized email)
//! - Stations

use crate::db::collections;
use crate::error::AppError;
use crate::models::{EmailClaim, Station, User};
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Ids matching `__.*__` are reserved by Firestore.
const PING_DOC_ID: &str = "health-check";

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn connect_emulator(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Drop the client and its gRPC channel.
    pub fn close(self) {
        drop(self.client);
    }

    /// Point read of a document that never exists; succeeds with `None`
    /// whenever the database answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        let _: Option<EmailClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(PING_DOC_ID)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Claim the email, then write the user. The claim document is created
    /// with insert semantics, so a second registration for the same email
    /// fails even when racing.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let claim_id = email_doc_id(&user.email);
        let claim = EmailClaim {
            user_id: user.id.clone(),
        };

        let claimed: Result<EmailClaim, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&claim_id)
            .object(&claim)
            .execute()
            .await;

        match claimed {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => return Err(AppError::DuplicateEmail),
            Err(e) => return Err(db_error(e)),
        }

        let written: Result<User, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await;

        if let Err(e) = written {
            // Release the claim so the email can be registered again.
            if let Err(release_err) = self
                .client
                .fluent()
                .delete()
                .from(collections::USER_EMAILS)
                .document_id(&claim_id)
                .execute()
                .await
            {
                tracing::warn!(error = %release_err, "Failed to release email claim");
            }
            return Err(db_error(e));
        }

        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(db_error)
    }

    /// Resolve through the claim document (a strongly consistent point read).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let claim: Option<EmailClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(db_error)?;

        match claim {
            Some(claim) => self.get_user(&claim.user_id).await,
            None => Ok(None),
        }
    }

    // ─── Station Operations ──────────────────────────────────────

    pub async fn list_stations(&self) -> Result<Vec<Station>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::STATIONS)
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_error)
    }

    pub async fn get_station(&self, station_id: &str) -> Result<Option<Station>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::STATIONS)
            .obj()
            .one(station_id)
            .await
            .map_err(db_error)
    }

    pub async fn insert_station(&self, station: &Station) -> Result<(), AppError> {
        let _: Station = self
            .client
            .fluent()
            .insert()
            .into(collections::STATIONS)
            .document_id(&station.id)
            .object(station)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// An update without a field mask replaces the whole document, so fields
    /// absent from `station` are removed. The `Exists` precondition keeps a
    /// concurrently deleted station from being recreated.
    pub async fn replace_station(&self, station: &Station) -> Result<bool, AppError> {
        let updated: Result<Station, FirestoreError> = self
            .client
            .fluent()
            .update()
            .in_col(collections::STATIONS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(&station.id)
            .object(station)
            .execute()
            .await;

        match updated {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataNotFoundError(_)) => Ok(false),
            Err(e) => Err(db_error(e)),
        }
    }

    /// Without the precondition, deleting a missing document succeeds silently.
    pub async fn delete_station(&self, station_id: &str) -> Result<bool, AppError> {
        let deleted = self
            .client
            .fluent()
            .delete()
            .from(collections::STATIONS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(station_id)
            .execute()
            .await;

        match deleted {
            Ok(()) => Ok(true),
            Err(FirestoreError::DataNotFoundError(_)) => Ok(false),
            Err(e) => Err(db_error(e)),
        }
    }

    /// Store multiple stations.
    ///
    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    pub async fn insert_stations(&self, stations: &[Station]) -> Result<usize, AppError> {
        stream::iter(stations)
            .map(|station| self.insert_station(station))
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(stations.len())
    }

    pub async fn clear_stations(&self) -> Result<usize, AppError> {
        let stations = self.list_stations().await?;
        let client = &self.client;

        stream::iter(&stations)
            .map(|station| async move {
                client
                    .fluent()
                    .delete()
                    .from(collections::STATIONS)
                    .document_id(&station.id)
                    .execute()
                    .await
                    .map_err(db_error)
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        tracing::debug!(count = stations.len(), "Deleted stations");
        Ok(stations.len())
    }
}

/// Document IDs may not contain `/`, so emails are percent-encoded.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

fn db_error(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}
