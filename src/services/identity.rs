// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client.
//!
//! The provider is opaque to the rest of the service: it hands back a
//! stable user id plus optional profile fields after a standard OAuth
//! authorization-code exchange.

use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Verified identity returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIdentity {
    /// Stable subject id
    pub sub: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth client for the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    pub fn new(
        base_url: String,
        client_id: String,
        client_secret: String,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            client_id,
            client_secret,
        })
    }

    /// Authorization URL the browser is redirected to.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope=openid%20email%20profile&\
             state={}",
            self.base_url,
            self.client_id,
            urlencoding::encode(redirect_uri),
            state
        )
    }

    /// Exchange an authorization code for the caller's identity.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderIdentity, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Token exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        self.fetch_userinfo(&token.access_token).await
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<ProviderIdentity, AppError> {
        let response = self
            .http
            .get(format!("{}/oauth/userinfo", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Userinfo request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Malformed provider response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let client = IdentityClient::new(
            "https://id.example.com".to_string(),
            "client-1".to_string(),
            "secret".to_string(),
        )
        .unwrap();

        let url = client.authorize_url("http://localhost:8080/auth/callback", "abc123");
        assert!(url.starts_with("https://id.example.com/oauth/authorize?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("state=abc123"));
    }

    #[test]
    fn test_identity_parses_optional_fields() {
        let raw = r#"{"sub":"user-9","email":null,"first_name":"Raven"}"#;
        let identity: ProviderIdentity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.sub, "user-9");
        assert!(identity.email.is_none());
        assert_eq!(identity.first_name.as_deref(), Some("Raven"));
        assert!(identity.profile_image_url.is_none());
    }
}
