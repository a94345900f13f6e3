// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fortune and profile API routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::models::{Fortune, NewFortune, User};
use crate::services::FortuneReading;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Reading type recorded for every fortune today.
const SINGLE_CARD: &str = "single-card";

/// Public routes (no authentication).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/fortunes", get(fortune_history))
        .route("/api/fortunes/{id}", get(get_fortune))
}

/// The fortune submission route. Works anonymously; the optional-auth
/// middleware is applied in routes/mod.rs.
pub fn fortune_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/fortune", post(draw_fortune))
}

/// Routes that require a valid session. The auth middleware is applied
/// in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/user", get(get_current_user))
}

// ─── Fortune Submission ──────────────────────────────────────

/// Generate a reading, persist it tagged with the caller's identity (if
/// any), and return it. No retry on failure; the client re-invokes.
async fn draw_fortune(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
) -> Result<Json<FortuneReading>> {
    let reading = state.oracle.draw_fortune(&state.deck).await?;

    let user_id = user.map(|u| u.user_id);
    tracing::info!(
        card = %reading.card_name,
        anonymous = user_id.is_none(),
        "Reading generated"
    );

    state
        .store
        .create_fortune(NewFortune {
            user_id,
            card_name: reading.card_name.clone(),
            fortune_text: reading.fortune_text.clone(),
            card_image: Some(reading.card_image.clone()),
            reading_type: SINGLE_CARD.to_string(),
            is_shared: false,
        })
        .await?;

    Ok(Json(reading))
}

// ─── Fortune History ─────────────────────────────────────────

/// Full history, newest first. No pagination or per-user filtering.
async fn fortune_history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Fortune>>> {
    let fortunes = state.store.list_fortunes().await?;
    Ok(Json(fortunes))
}

/// Single fortune lookup.
async fn get_fortune(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fortune>> {
    state
        .store
        .get_fortune(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Fortune {} not found", id)))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    state
        .store
        .get_user(&user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))
}
