//! Storage layer.
//!
//! One polymorphic [`Storage`] contract with two interchangeable
//! implementations, selected at process startup: an ephemeral
//! DashMap-backed store and a durable Postgres-backed store.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{Fortune, NewFortune, UpsertUser, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Data persistence contract for fortunes and users.
///
/// Fortunes are write-once, read-many: there is deliberately no update
/// or delete operation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Record a new reading. Assigns a fresh id and the current timestamp.
    async fn create_fortune(&self, new: NewFortune) -> Result<Fortune, AppError>;

    /// All fortunes, newest first (timestamp descending, ties broken by
    /// id descending). Materialized, empty when none exist.
    async fn list_fortunes(&self) -> Result<Vec<Fortune>, AppError>;

    async fn get_fortune(&self, id: Uuid) -> Result<Option<Fortune>, AppError>;

    /// Create-or-update keyed by the provider-assigned id. On update the
    /// profile fields are overwritten and `updated_at` refreshed;
    /// `curse_level`, `fortune_streak` and `created_at` are left alone.
    async fn upsert_user(&self, profile: UpsertUser) -> Result<User, AppError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;
}
