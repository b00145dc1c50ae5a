//! CRM configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECORDS_API_URL` - Base URL of the hosted record store
//! - `RECORDS_PROJECT_ID` - Record store project identifier
//! - `RECORDS_PUBLIC_KEY` - Record store public key
//!
//! ## Optional
//! - `CRM_HOST` - Bind address (default: 127.0.0.1)
//! - `CRM_PORT` - Listen port (default: 3002)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// CRM application configuration.
///
/// Read once at startup; immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Record store connection settings
    pub records: RecordsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Record store connection settings.
///
/// Implements `Debug` manually to redact the public key.
#[derive(Clone)]
pub struct RecordsConfig {
    /// Base URL of the record store API
    pub api_url: Url,
    /// Project identifier
    pub project_id: String,
    /// Public key sent with every request
    pub public_key: SecretString,
}

impl std::fmt::Debug for RecordsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordsConfig")
            .field("api_url", &self.api_url.as_str())
            .field("project_id", &self.project_id)
            .field("public_key", &"[REDACTED]")
            .finish()
    }
}

impl RecordsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("RECORDS_API_URL")?;
        let api_url = parse_api_url(&raw_url, "RECORDS_API_URL")?;
        let project_id = get_required_env("RECORDS_PROJECT_ID")?;
        if project_id.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "RECORDS_PROJECT_ID".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let public_key = get_required_env("RECORDS_PUBLIC_KEY")?;
        reject_placeholder(&public_key, "RECORDS_PUBLIC_KEY")?;

        Ok(Self {
            api_url,
            project_id,
            public_key: SecretString::from(public_key),
        })
    }
}

impl CrmConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the public key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CRM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CRM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CRM_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CRM_PORT".to_string(), e.to_string()))?;
        let records = RecordsConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            records,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
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

/// Parse an absolute http(s) URL.
fn parse_api_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Reject keys that are obviously copied from a template.
fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
