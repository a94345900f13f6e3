//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; there is no runtime reloading.

use std::env;

/// Which fortune store backs the service. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Ephemeral DashMap-backed store, for local development and tests
    Memory,
    /// Durable Postgres-backed store (the default)
    Postgres,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for login redirects and CORS
    pub frontend_url: String,
    /// Fortune store selection
    pub storage_backend: StorageBackend,
    /// Postgres connection string; required for the postgres backend
    pub database_url: Option<String>,

    // --- Completion provider ---
    /// Base URL of the OpenAI-compatible completion API
    pub oracle_base_url: String,
    /// Completion API credential
    pub oracle_api_key: String,
    /// Model identifier submitted with every completion request
    pub oracle_model: String,

    // --- Identity provider ---
    /// Base URL of the OAuth identity provider
    pub identity_base_url: String,
    pub identity_client_id: String,
    pub identity_client_secret: String,

    // --- Session plumbing ---
    /// HS256 signing key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// HMAC key for the signed OAuth state parameter
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing `DATABASE_URL` is fatal unless `STORAGE_BACKEND=memory`
    /// was selected explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("postgres") | Err(_) => StorageBackend::Postgres,
            Ok(other) => return Err(ConfigError::InvalidBackend(other.to_string())),
        };

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => Some(url),
            Err(_) if storage_backend == StorageBackend::Memory => None,
            Err(_) => return Err(ConfigError::Missing("DATABASE_URL")),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            storage_backend,
            database_url,

            oracle_base_url: env::var("ORACLE_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            oracle_api_key: env::var("ORACLE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ORACLE_API_KEY"))?,
            oracle_model: env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-5".to_string()),

            identity_base_url: env::var("IDENTITY_BASE_URL")
                .map_err(|_| ConfigError::Missing("IDENTITY_BASE_URL"))?,
            identity_client_id: env::var("IDENTITY_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("IDENTITY_CLIENT_ID"))?,
            identity_client_secret: env::var("IDENTITY_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("IDENTITY_CLIENT_SECRET"))?,

            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }

    /// Fixed configuration for tests. No environment access.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            storage_backend: StorageBackend::Memory,
            database_url: None,
            oracle_base_url: "http://127.0.0.1:1".to_string(),
            oracle_api_key: "test_oracle_key".to_string(),
            oracle_model: "gpt-5".to_string(),
            identity_base_url: "http://127.0.0.1:1".to_string(),
            identity_client_id: "test_client_id".to_string(),
            identity_client_secret: "test_secret".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!".to_vec(),
            oauth_state_key: b"test_state_key".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Unknown STORAGE_BACKEND value: {0}")]
    InvalidBackend(String),
}
