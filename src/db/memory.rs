// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store backed by `DashMap`.
//!
//! Mirrors the Firestore collections, including the email claim index, so
//! the service can run without GCP credentials.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Station, User};

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, User>>,
    /// normalized email -> user id
    emails: Arc<DashMap<String, String>>,
    stations: Arc<DashMap<String, Station>>,
}

impl MemoryStore {
    pub fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEmail),
            Entry::Vacant(slot) => {
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = self.emails.get(email).map(|id| id.value().clone())?;
        self.get_user(&user_id)
    }

    /// Unordered; the caller sorts.
    pub fn list_stations(&self) -> Vec<Station> {
        self.stations.iter().map(|s| s.value().clone()).collect()
    }

    pub fn get_station(&self, station_id: &str) -> Option<Station> {
        self.stations.get(station_id).map(|s| s.value().clone())
    }

    pub fn insert_station(&self, station: &Station) {
        self.stations.insert(station.id.clone(), station.clone());
    }

    pub fn replace_station(&self, station: &Station) -> bool {
        match self.stations.get_mut(&station.id) {
            Some(mut existing) => {
                *existing = station.clone();
                true
            }
            None => false,
        }
    }

    pub fn delete_station(&self, station_id: &str) -> bool {
        self.stations.remove(station_id).is_some()
    }

    pub fn clear_stations(&self) -> usize {
        let count = self.stations.len();
        self.stations.clear();
        count
    }
}
