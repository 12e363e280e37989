use std::path::PathBuf;
use std::time::Duration;

use pictura_replicate::PollConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret. Vendor keys are optional: without them the server still starts
/// and the affected endpoints answer with a configuration error.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must exceed the poll timeout.
    pub request_timeout_secs: u64,
    /// How long in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Root directory for uploaded avatars, served at `/storage`.
    pub storage_dir: PathBuf,
    pub jwt: JwtConfig,
    pub replicate: ReplicateConfig,
    pub openai: OpenAiConfig,
}

/// Image-generation vendor settings.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub api_token: Option<String>,
    pub api_url: String,
    pub poll: PollConfig,
}

/// Prompt-enhancement vendor settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                         |
    /// |---------------------------|---------------------------------|
    /// | `HOST`                    | `0.0.0.0`                       |
    /// | `PORT`                    | `3000`                          |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`         |
    /// | `REQUEST_TIMEOUT_SECS`    | `330`                           |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                            |
    /// | `STORAGE_DIR`             | `storage`                       |
    /// | `REPLICATE_API_TOKEN`     | unset                           |
    /// | `REPLICATE_API_BASE`      | `https://api.replicate.com/v1`  |
    /// | `POLL_INTERVAL_MS`        | `1000` (must be > 0)            |
    /// | `POLL_BACKOFF_MULTIPLIER` | `1.0`                           |
    /// | `POLL_MAX_INTERVAL_MS`    | `30000`                         |
    /// | `POLL_TIMEOUT_SECS`       | `300` (`0` = no timeout)        |
    /// | `OPENAI_API_KEY`          | unset                           |
    /// | `OPENAI_API_BASE`         | `https://api.openai.com/v1`     |
    /// | `OPENAI_MODEL`            | `gpt-4o-mini`                   |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "330".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let storage_dir =
            PathBuf::from(std::env::var("STORAGE_DIR").unwrap_or_else(|_| "storage".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            storage_dir,
            jwt: JwtConfig::from_env(),
            replicate: ReplicateConfig::from_env(),
            openai: OpenAiConfig::from_env(),
        }
    }
}

impl ReplicateConfig {
    pub fn from_env() -> Self {
        let interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        let backoff_multiplier: f64 = std::env::var("POLL_BACKOFF_MULTIPLIER")
            .unwrap_or_else(|_| "1.0".into())
            .parse()
            .expect("POLL_BACKOFF_MULTIPLIER must be a valid f64");

        let max_interval_ms: u64 = std::env::var("POLL_MAX_INTERVAL_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .expect("POLL_MAX_INTERVAL_MS must be a valid u64");

        let timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("POLL_TIMEOUT_SECS must be a valid u64");

        let poll = PollConfig {
            interval: Duration::from_millis(interval_ms),
            backoff_multiplier,
            max_interval: Duration::from_millis(max_interval_ms),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            max_attempts: None,
        };
        if let Err(reason) = poll.validate() {
            panic!("POLL_INTERVAL_MS is invalid: {reason}");
        }

        Self {
            api_token: non_empty_var("REPLICATE_API_TOKEN"),
            api_url: std::env::var("REPLICATE_API_BASE")
                .unwrap_or_else(|_| pictura_replicate::api::DEFAULT_API_URL.into()),
            poll,
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            api_url: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| pictura_openai::chat::DEFAULT_API_URL.into()),
            model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| pictura_openai::chat::DEFAULT_MODEL.into()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
