//! Application Configuration Module
//!
//! Centralizes the configuration for the interview service. Settings are
//! loaded from environment variables into a single struct that the binary
//! passes around.

use std::env;

use secrecy::SecretString;
use tracing::Level;

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: Option<SecretString>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `NEUROVISA_API_URL`: (Optional) Base URL of the backend API.
    //     Defaults to "http://127.0.0.1:8000/api/v1".
    // *   `NEUROVISA_TOKEN`: (Optional) A bearer token from a previous login.
    // *   `NEUROVISA_EMAIL` / `NEUROVISA_PASSWORD`: Credentials used to log
    //     in when no token is provided. One of the two auth options is
    //     required.
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. This is useful for local development and is ignored if not present.
        dotenvy::dotenv().ok();

        let api_url = env::var("NEUROVISA_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api/v1".to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        let token = env::var("NEUROVISA_TOKEN").ok().map(SecretString::from);
        let email = env::var("NEUROVISA_EMAIL").ok();
        let password = env::var("NEUROVISA_PASSWORD").ok().map(SecretString::from);

        let log_level_str = env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        let config = Self {
            api_url,
            token,
            email,
            password,
            log_level,
        };

        // Either a ready token or a full credential pair must be present.
        if config.token.is_none() {
            if config.email.is_none() {
                return Err(ConfigError::MissingVar(
                    "NEUROVISA_TOKEN or NEUROVISA_EMAIL must be set".to_string(),
                ));
            }
            if config.password.is_none() {
                return Err(ConfigError::MissingVar(
                    "NEUROVISA_PASSWORD must be set when logging in with NEUROVISA_EMAIL"
                        .to_string(),
                ));
            }
        }

        Ok(config)
    }
}
