// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Haunted Fortune Teller API
//!
//! This crate provides the backend for the Halloween tarot reading app:
//! random card draws, generated fortunes, an append-only reading
//! archive, and session-based identity.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Storage;
use services::{IdentityClient, OracleClient, TarotDeck};
use std::sync::Arc;

/// Shared application state. Constructed once at startup and injected
/// into handlers; there is no global storage singleton.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Storage>,
    pub deck: TarotDeck,
    pub oracle: OracleClient,
    pub identity: IdentityClient,
}
