// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fortune model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted reading. Fortunes are append-only: created once per
/// successful generation, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fortune {
    pub id: Uuid,
    /// Owning user; `None` for anonymous readings
    pub user_id: Option<String>,
    /// Catalog name at creation time, stored denormalized
    pub card_name: String,
    pub fortune_text: String,
    pub card_image: Option<String>,
    /// Currently always `"single-card"`; free string for future variants
    pub reading_type: String,
    /// Reserved, no behavior reads this yet
    pub is_shared: bool,
    /// System-assigned at creation; sole ordering key for history
    pub timestamp: DateTime<Utc>,
}

/// Fields supplied when recording a new reading. The store assigns
/// the id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFortune {
    pub user_id: Option<String>,
    pub card_name: String,
    pub fortune_text: String,
    pub card_image: Option<String>,
    pub reading_type: String,
    pub is_shared: bool,
}
