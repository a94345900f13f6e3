// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-provider login routes.
//!
//! The provider runs a standard authorization-code flow. On every
//! successful callback the user's profile is upserted and a session
//! cookie is issued; the provider is the source of truth for profile
//! fields.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_token, SESSION_COOKIE};
use crate::models::UpsertUser;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting the login flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after login completes.
    /// If not provided, uses FRONTEND_URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start the login flow - redirect to the identity provider.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback_url = callback_url_from_headers(&headers);
    let auth_url = state.identity.authorize_url(&callback_url, &oauth_state);

    tracing::info!(
        client_id = %state.config.identity_client_id,
        frontend_url = %frontend_url,
        "Starting login flow, redirecting to identity provider"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    code: String,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// Login callback - exchange the code, upsert the user, set the session
/// cookie.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Decode and verify frontend URL from the state parameter
    let frontend_url = verify_and_decode_state(&params.state, &state.config.oauth_state_key)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Provider-side errors (user denied, expired code) go back to the
    // frontend rather than surfacing as API errors
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Login error from identity provider");
        let redirect = format!("{}?error={}", frontend_url, error);
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let callback_url = callback_url_from_headers(&headers);
    let identity = state
        .identity
        .exchange_code(&params.code, &callback_url)
        .await?;

    let user = state
        .store
        .upsert_user(UpsertUser {
            id: identity.sub,
            email: identity.email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            profile_image_url: identity.profile_image_url,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Login successful, profile stored");

    let token = create_session_token(&user.id, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session token creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .build();

    Ok((jar.add(cookie), Redirect::temporary(&frontend_url)))
}

/// Logout - drop the session cookie and return to the frontend.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Redirect::temporary(&state.config.frontend_url),
    )
}

/// Callback URL derived from the request's Host header.
fn callback_url_from_headers(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/callback", scheme, host)
}

/// Sign the frontend URL + timestamp into an opaque state parameter.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Payload format: "frontend_url|timestamp_hex"
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and decode the frontend URL from the state
/// parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = format!("{}|{}", parts[0], parts[1]);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if parts[2] != expected {
        tracing::error!("Login state signature mismatch! Potential tampering.");
        return None;
    }

    Some(parts[0].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let secret = b"secret_key";
        let signed = sign_state("https://example.com", secret).unwrap();
        let decoded = verify_and_decode_state(&signed, secret);
        assert_eq!(decoded, Some("https://example.com".to_string()));
    }

    #[test]
    fn test_state_rejects_wrong_secret() {
        let signed = sign_state("https://example.com", b"secret_key").unwrap();
        assert_eq!(verify_and_decode_state(&signed, b"wrong_key"), None);
    }

    #[test]
    fn test_state_rejects_tampered_payload() {
        let secret = b"secret_key";
        let signed = sign_state("https://example.com", secret).unwrap();

        let raw = URL_SAFE_NO_PAD.decode(&signed).unwrap();
        let mut tampered = String::from_utf8(raw).unwrap();
        tampered = tampered.replacen("example.com", "attacker.com", 1);
        let tampered = URL_SAFE_NO_PAD.encode(tampered.as_bytes());

        assert_eq!(verify_and_decode_state(&tampered, secret), None);
    }

    #[test]
    fn test_state_rejects_malformed_input() {
        let secret = b"secret_key";
        assert_eq!(verify_and_decode_state("not-base64!!!", secret), None);

        let malformed = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&malformed, secret), None);
    }
}
