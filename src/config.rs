//! Client configuration loaded from environment variables.
//!
//! Only the backend origin is needed to start a page; everything else
//! (Firebase credentials) is fetched from the backend at page load.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8002";
const DEFAULT_SESSION_FILE: &str = ".cv-portal/session.json";

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Client configuration, loaded once per page load.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin serving the Firebase configuration and CV analysis
    pub backend_url: String,
    /// Where the signed-in session is persisted (None = in-memory only)
    pub session_file: Option<PathBuf>,
    /// Optional request timeout. Unset means requests never time out.
    pub http_timeout: Option<Duration>,
    pub log_format: LogFormat,
    /// Firebase Auth emulator host (e.g. `127.0.0.1:9099`)
    pub auth_emulator_host: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if backend_url.is_empty() {
            return Err(ConfigError::Invalid("BACKEND_URL", "must not be empty".into()));
        }

        let session_file = match env::var("SESSION_FILE") {
            Ok(v) if v.trim().eq_ignore_ascii_case("none") => None,
            Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
            _ => Some(PathBuf::from(DEFAULT_SESSION_FILE)),
        };

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => {
                let secs: u64 = v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("HTTP_TIMEOUT_SECS", v.clone()))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Ok(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Ok(v) => return Err(ConfigError::Invalid("LOG_FORMAT", v)),
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            backend_url,
            session_file,
            http_timeout,
            log_format,
            auth_emulator_host: env::var("FIREBASE_AUTH_EMULATOR_HOST")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    /// Config for tests: no persistence, no timeout.
    pub fn test_default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_file: None,
            http_timeout: None,
            log_format: LogFormat::Pretty,
            auth_emulator_host: None,
        }
    }

    /// Build the shared HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> reqwest::Client {
        let builder = reqwest::Client::builder();
        let builder = match self.http_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
