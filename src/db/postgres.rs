// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable Postgres store.
//!
//! The pool is shared across all concurrent requests; its connection
//! limit is the only backpressure mechanism in the service. Conflicting
//! writes are serialized by Postgres, not by the application.

use crate::db::Storage;
use crate::error::AppError;
use crate::models::{Fortune, NewFortune, UpsertUser, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

const MAX_CONNECTIONS: u32 = 10;

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        tracing::info!("Connected to Postgres");
        Ok(Self { pool })
    }
}

fn row_to_fortune(row: &PgRow) -> Fortune {
    Fortune {
        id: row.get("id"),
        user_id: row.get("user_id"),
        card_name: row.get("card_name"),
        fortune_text: row.get("fortune_text"),
        card_image: row.get("card_image"),
        reading_type: row.get("reading_type"),
        is_shared: row.get("is_shared"),
        timestamp: row.get("timestamp"),
    }
}

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        profile_image_url: row.get("profile_image_url"),
        curse_level: row.get("curse_level"),
        fortune_streak: row.get("fortune_streak"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl Storage for PgStore {
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

        sqlx::query(
            "INSERT INTO fortunes \
             (id, user_id, card_name, fortune_text, card_image, reading_type, is_shared, timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(fortune.id)
        .bind(&fortune.user_id)
        .bind(&fortune.card_name)
        .bind(&fortune.fortune_text)
        .bind(&fortune.card_image)
        .bind(&fortune.reading_type)
        .bind(fortune.is_shared)
        .bind(fortune.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(fortune)
    }

    async fn list_fortunes(&self) -> Result<Vec<Fortune>, AppError> {
        let rows = sqlx::query(
            "SELECT id, user_id, card_name, fortune_text, card_image, reading_type, is_shared, timestamp \
             FROM fortunes ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.iter().map(row_to_fortune).collect())
    }

    async fn get_fortune(&self, id: Uuid) -> Result<Option<Fortune>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_id, card_name, fortune_text, card_image, reading_type, is_shared, timestamp \
             FROM fortunes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.as_ref().map(row_to_fortune))
    }

    async fn upsert_user(&self, profile: UpsertUser) -> Result<User, AppError> {
        let row = sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, profile_image_url) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 first_name = EXCLUDED.first_name, \
                 last_name = EXCLUDED.last_name, \
                 profile_image_url = EXCLUDED.profile_image_url, \
                 updated_at = now() \
             RETURNING id, email, first_name, last_name, profile_image_url, \
                       curse_level, fortune_streak, created_at, updated_at",
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.profile_image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row_to_user(&row))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, profile_image_url, \
                    curse_level, fortune_streak, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.as_ref().map(row_to_user))
    }
}
