// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ephemeral in-memory store.
//!
//! Same observable semantics as the Postgres store, minus durability and
//! referential integrity. Used for local development and tests.

use crate::db::Storage;
use crate::error::AppError;
use crate::models::{Fortune, NewFortune, UpsertUser, User};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// DashMap-backed store.
#[derive(Default)]
pub struct MemoryStore {
    fortunes: DashMap<Uuid, Fortune>,
    users: DashMap<String, User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn create_fortune(&self, new: NewFortune) -> Result<Fortune, AppError> {
        let fortune = Fortune {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            card_name: new.card_name,
            fortune_text: new.fortune_text,
            card_image: new.card_image,
            reading_type: new.reading_type,
            is_shared: new.is_shared,
            timestamp: Utc::now(),
        };
        self.fortunes.insert(fortune.id, fortune.clone());
        Ok(fortune)
    }

    async fn list_fortunes(&self) -> Result<Vec<Fortune>, AppError> {
        let mut fortunes: Vec<Fortune> = self
            .fortunes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first; id descending keeps equal timestamps deterministic
        fortunes.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(fortunes)
    }

    async fn get_fortune(&self, id: Uuid) -> Result<Option<Fortune>, AppError> {
        Ok(self.fortunes.get(&id).map(|entry| entry.value().clone()))
    }

    async fn upsert_user(&self, profile: UpsertUser) -> Result<User, AppError> {
        let user = match self.users.entry(profile.id.clone()) {
            Entry::Occupied(mut entry) => {
                let user = entry.get_mut();
                user.email = profile.email;
                user.first_name = profile.first_name;
                user.last_name = profile.last_name;
                user.profile_image_url = profile.profile_image_url;
                user.updated_at = Utc::now();
                user.clone()
            }
            Entry::Vacant(entry) => {
                let now = Utc::now();
                let user = User {
                    id: profile.id,
                    email: profile.email,
                    first_name: profile.first_name,
                    last_name: profile.last_name,
                    profile_image_url: profile.profile_image_url,
                    curse_level: 0,
                    fortune_streak: 0,
                    created_at: now,
                    updated_at: now,
                };
                entry.insert(user.clone());
                user
            }
        };
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }
}
