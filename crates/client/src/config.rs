//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIXHUB_API_BASE_URL` - Origin of the remote commerce API
//!
//! ## Optional
//! - `FIXHUB_API_TOKEN` - Bearer token; when absent, every operation uses
//!   the local-cache-only path and no network calls are made
//! - `FIXHUB_CACHE_DIR` - Snapshot cache directory (default: `.fixhub-cache`)
//! - `FIXHUB_SYNC_MAX_ATTEMPTS` - Remote retry budget per operation
//!   (default: 3)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_DIR: &str = ".fixhub-cache";
const DEFAULT_SYNC_MAX_ATTEMPTS: u32 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Commerce client configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Origin of the remote commerce API.
    pub api_base_url: Url,
    /// Bearer token for the remote API. `None` selects the
    /// local-cache-only path.
    pub api_token: Option<SecretString>,
    /// Directory holding the snapshot cache slots.
    pub cache_dir: PathBuf,
    /// Remote retry budget per sync operation.
    pub sync_max_attempts: u32,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_dir", &self.cache_dir)
            .field("sync_max_attempts", &self.sync_max_attempts)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the base
    /// URL. Used by tests and embedding code that wires config itself.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            api_token: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            sync_max_attempts: DEFAULT_SYNC_MAX_ATTEMPTS,
        }
    }

    /// Set the bearer token, switching the client to the authenticated
    /// path.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the snapshot cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the remote retry budget per sync operation.
    #[must_use]
    pub fn with_sync_max_attempts(mut self, attempts: u32) -> Self {
        self.sync_max_attempts = attempts;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("FIXHUB_API_BASE_URL")?)?;
        let api_token = get_optional_env("FIXHUB_API_TOKEN").map(SecretString::from);
        let cache_dir = cache_dir_from_env();
        let sync_max_attempts = get_env_or_default(
            "FIXHUB_SYNC_MAX_ATTEMPTS",
            &DEFAULT_SYNC_MAX_ATTEMPTS.to_string(),
        )
        .parse::<u32>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("FIXHUB_SYNC_MAX_ATTEMPTS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            api_token,
            cache_dir,
            sync_max_attempts,
        })
    }

    /// Whether a bearer token is configured.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.api_token.is_some()
    }
}

/// Resolve the snapshot cache directory from the environment.
///
/// Exposed separately so cache-only tooling (the CLI `cache` commands)
/// does not need the full config.
#[must_use]
pub fn cache_dir_from_env() -> PathBuf {
    PathBuf::from(get_env_or_default("FIXHUB_CACHE_DIR", DEFAULT_CACHE_DIR))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the API base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("FIXHUB_API_BASE_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "FIXHUB_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("https://api.fixhub.dev").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.fixhub.dev"));
    }

    #[test]
    fn test_parse_base_url_rejects_non_http_scheme() {
        let result = parse_base_url("ftp://api.fixhub.dev");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let result = parse_base_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new(Url::parse("https://api.fixhub.dev").unwrap())
            .with_token("super-secret-bearer-token");

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-bearer-token"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::new(Url::parse("http://localhost:4100").unwrap());
        assert!(!config.is_authenticated());
        assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(config.sync_max_attempts, DEFAULT_SYNC_MAX_ATTEMPTS);
    }

    #[test]
    fn test_with_token_authenticates() {
        let config =
            ClientConfig::new(Url::parse("http://localhost:4100").unwrap()).with_token("tok");
        assert!(config.is_authenticated());
    }
}
