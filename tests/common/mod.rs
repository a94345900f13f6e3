// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, routing::post, Json, Router};
use haunted_fortune::config::Config;
use haunted_fortune::db::MemoryStore;
use haunted_fortune::routes::create_router;
use haunted_fortune::services::{IdentityClient, OracleClient, TarotDeck};
use haunted_fortune::AppState;
use std::sync::Arc;

/// Spawn a local stand-in for the completion provider that answers every
/// chat-completions request with a fixed status and body.
#[allow(dead_code)]
pub async fn spawn_oracle_stub(status: StatusCode, body: serde_json::Value) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Chat-completions response body carrying the given content.
#[allow(dead_code)]
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

/// Create a test app backed by the in-memory store.
///
/// With `oracle_base_url = None` the completion provider is unreachable,
/// so every generation attempt fails.
#[allow(dead_code)]
pub fn create_test_app(
    oracle_base_url: Option<String>,
) -> (axum::Router, Arc<MemoryStore>, Vec<u8>) {
    let mut config = Config::test_default();
    if let Some(url) = oracle_base_url {
        config.oracle_base_url = url;
    }
    let signing_key = config.session_signing_key.clone();

    let store = Arc::new(MemoryStore::new());

    let oracle = OracleClient::new(
        config.oracle_base_url.clone(),
        config.oracle_api_key.clone(),
        config.oracle_model.clone(),
    )
    .expect("Failed to build completion client");

    let identity = IdentityClient::new(
        config.identity_base_url.clone(),
        config.identity_client_id.clone(),
        config.identity_client_secret.clone(),
    )
    .expect("Failed to build identity client");

    let state = Arc::new(AppState {
        config,
        store: store.clone(),
        deck: TarotDeck::default(),
        oracle,
        identity,
    });

    (create_router(state), store, signing_key)
}
