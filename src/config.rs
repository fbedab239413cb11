//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and handed to [`crate::AppState`]; nothing reads
//! the environment after that except the Firestore emulator switch.

use std::env;

/// Default number of logs returned by the recent-logs query.
pub const DEFAULT_RECENT_LOGS_LIMIT: u32 = 30;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project hosting the Firestore database
    pub gcp_project_id: String,
    /// Firebase Web API key used by the identity REST API
    pub firebase_api_key: String,
    /// Auth emulator host (host:port), if running locally
    pub auth_emulator_host: Option<String>,
    /// Keyring service name for the encryption key slot
    pub secure_store_service: String,
    /// Default page size for recent health logs
    pub recent_logs_limit: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            auth_emulator_host: None,
            secure_store_service: "health-tracker-test".to_string(),
            recent_logs_limit: DEFAULT_RECENT_LOGS_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            auth_emulator_host: env::var("FIREBASE_AUTH_EMULATOR_HOST")
                .ok()
                .filter(|v| !v.is_empty()),
            secure_store_service: env::var("SECURE_STORE_SERVICE")
                .unwrap_or_else(|_| "health-tracker".to_string()),
            recent_logs_limit: env::var("RECENT_LOGS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RECENT_LOGS_LIMIT),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
