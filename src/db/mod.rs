// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] is the owned connection handle held in `AppState`. It is
//! opened once at startup under a [`ConnectPolicy`], cloned into request
//! handlers, and closed explicitly on shutdown.

pub mod firestore;
pub mod memory;

use std::future::Future;
use std::time::Duration;

use crate::config::{Config, DatabaseBackend};
use crate::error::AppError;
use crate::models::{Station, User};
use self::firestore::FirestoreStore;
use self::memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness claims (keyed by encoded normalized email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const STATIONS: &str = "stations";
}

const CONNECT_BASE_DELAY: Duration = Duration::from_millis(500);
const CONNECT_MAX_DELAY: Duration = Duration::from_secs(8);

/// Bounded retry with exponential backoff for establishing a connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl ConnectPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.db_connect_attempts.max(1),
            base_delay: CONNECT_BASE_DELAY,
        }
    }

    /// Run `connect` until it succeeds or attempts are exhausted.
    pub async fn connect<T, F, Fut>(&self, mut connect: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match connect().await {
                Ok(conn) => return Ok(conn),
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(CONNECT_MAX_DELAY);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Database connection failed, giving up");
                    return Err(e);
                }
            }
        }
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

/// Owned handle to the document store.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Open the configured backend.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        match config.database_backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory database; data is lost on restart");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Firestore => {
                let project_id = config.gcp_project_id.as_str();
                let store = ConnectPolicy::from_config(config)
                    .connect(|| FirestoreStore::connect(project_id))
                    .await?;
                Ok(Self {
                    backend: Backend::Firestore(store),
                })
            }
        }
    }

    /// Create an empty in-memory database (local runs and tests).
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::default()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Firestore(_) => "firestore",
            Backend::Memory(_) => "memory",
        }
    }

    /// End the connection lifecycle. Clones still held elsewhere keep their
    /// own channel until dropped.
    pub async fn close(self) {
        let backend = self.backend_name();
        match self.backend {
            Backend::Firestore(store) => store.close(),
            Backend::Memory(_) => {}
        }
        tracing::info!(backend, "Database connection closed");
    }

    /// Cheap round trip used by the health check.
    pub async fn ping(&self) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.ping().await,
            Backend::Memory(_) => Ok(()),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Store a new user. Fails with `DuplicateEmail` if the email is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.create_user(user).await,
            Backend::Memory(store) => store.create_user(user),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_user(user_id).await,
            Backend::Memory(store) => Ok(store.get_user(user_id)),
        }
    }

    /// Look up a user by normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.find_user_by_email(email).await,
            Backend::Memory(store) => Ok(store.find_user_by_email(email)),
        }
    }

    // ─── Station Operations ──────────────────────────────────────

    /// All stations, newest first.
    pub async fn list_stations(&self) -> Result<Vec<Station>, AppError> {
        let mut stations = match &self.backend {
            Backend::Firestore(store) => store.list_stations().await?,
            Backend::Memory(store) => store.list_stations(),
        };
        sort_newest_first(&mut stations);
        Ok(stations)
    }

    pub async fn get_station(&self, station_id: &str) -> Result<Option<Station>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_station(station_id).await,
            Backend::Memory(store) => Ok(store.get_station(station_id)),
        }
    }

    pub async fn insert_station(&self, station: &Station) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.insert_station(station).await,
            Backend::Memory(store) => {
                store.insert_station(station);
                Ok(())
            }
        }
    }

    /// Overwrite the whole stored document. Returns `false` if it no longer exists.
    pub async fn replace_station(&self, station: &Station) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.replace_station(station).await,
            Backend::Memory(store) => Ok(store.replace_station(station)),
        }
    }

    /// Returns `false` if the station did not exist.
    pub async fn delete_station(&self, station_id: &str) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.delete_station(station_id).await,
            Backend::Memory(store) => Ok(store.delete_station(station_id)),
        }
    }

    /// Bulk insert (seeding). Returns the number of stations written.
    pub async fn insert_stations(&self, stations: &[Station]) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.insert_stations(stations).await,
            Backend::Memory(store) => {
                for station in stations {
                    store.insert_station(station);
                }
                Ok(stations.len())
            }
        }
    }

    /// Remove every station. Returns the number removed.
    pub async fn clear_stations(&self) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.clear_stations().await,
            Backend::Memory(store) => Ok(store.clear_stations()),
        }
    }
}

/// Generate a time-ordered document ID.
pub fn new_document_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Order by `createdAt` descending, ties broken by id descending.
pub fn sort_newest_first(stations: &mut [Station]) {
    stations.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
