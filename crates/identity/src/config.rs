//! Identity configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SELLER_API_BASE_URL` - Base URL of the users service hosting the
//!   seller-status endpoint (default: `http://localhost:5000`)
//! - `SESSION_RESOLVE_DELAY_MS` - Session resolution delay in
//!   milliseconds (default: 1000)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default base URL of the users service.
pub const DEFAULT_SELLER_API_BASE_URL: &str = "http://localhost:5000";

/// Default session resolution delay in milliseconds.
pub const DEFAULT_SESSION_RESOLVE_DELAY_MS: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Identity resolution configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the users service hosting `GET /users/seller/{email}`.
    pub seller_api_base_url: Url,
    /// How long session resolution waits before settling.
    pub session_resolve_delay: Duration,
}

impl IdentityConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Every variable has a default, so a bare environment is valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let seller_api_base_url = parse_base_url(&get_env_or_default(
            "SELLER_API_BASE_URL",
            DEFAULT_SELLER_API_BASE_URL,
        ))?;
        let session_resolve_delay = parse_delay_ms(&get_env_or_default(
            "SESSION_RESOLVE_DELAY_MS",
            "1000",
        ))?;

        Ok(Self {
            seller_api_base_url,
            session_resolve_delay,
        })
    }
}

impl Default for IdentityConfig {
    /// The shipped configuration, without touching the environment.
    fn default() -> Self {
        Self {
            seller_api_base_url: Url::parse(DEFAULT_SELLER_API_BASE_URL)
                .expect("default base URL is valid"),
            session_resolve_delay: Duration::from_millis(DEFAULT_SESSION_RESOLVE_DELAY_MS),
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("SELLER_API_BASE_URL".to_string(), e.to_string()))
}

fn parse_delay_ms(value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SESSION_RESOLVE_DELAY_MS".to_string(), e.to_string())
        })
}
