// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Haunted Fortune Teller API Server
//!
//! Serves tarot readings generated by an external completion provider
//! and archives every fortune it reveals.

use haunted_fortune::{
    config::{Config, StorageBackend},
    db::{MemoryStore, PgStore, Storage},
    services::{IdentityClient, OracleClient, TarotDeck},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Haunted Fortune Teller API");

    // Select the fortune store
    let store: Arc<dyn Storage> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL is required for the postgres backend");
            let store = PgStore::connect(url)
                .await
                .expect("Failed to connect to Postgres");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; fortunes will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Completion provider client
    let oracle = OracleClient::new(
        config.oracle_base_url.clone(),
        config.oracle_api_key.clone(),
        config.oracle_model.clone(),
    )
    .expect("Failed to initialize completion client");
    tracing::info!(model = %config.oracle_model, "Completion client initialized");

    // Identity provider client
    let identity = IdentityClient::new(
        config.identity_base_url.clone(),
        config.identity_client_id.clone(),
        config.identity_client_secret.clone(),
    )
    .expect("Failed to initialize identity client");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        deck: TarotDeck::default(),
        oracle,
        identity,
    });

    // Build router
    let app = haunted_fortune::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("haunted_fortune=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
