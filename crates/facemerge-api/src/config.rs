//! API configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use facemerge_providers::{ConfigError, ProvidersConfig};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second, per client IP
    pub rate_limit_rps: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size (bounds the in-memory upload)
    pub max_body_size: usize,
    /// Directory holding `index.html` and the static assets
    pub static_dir: PathBuf,
    /// Environment (development/production)
    pub environment: String,
    /// Emit JSON log lines instead of colored text
    pub json_logs: bool,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            request_timeout: Duration::from_secs(60),
            max_body_size: 10 * 1024 * 1024, // 10MB
            static_dir: PathBuf::from("static"),
            environment: "development".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);
        let production = environment.to_lowercase() == "production";

        Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "API_PORT").unwrap_or(defaults.port),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: parse_var(&lookup, "RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: parse_var(&lookup, "MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            // JSON by default in production
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(production),
            metrics_enabled: lookup("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            environment,
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|s| s.trim().parse().ok())
}

/// Everything the server needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Create config from environment variables.
    ///
    /// Fails when the provider credentials are missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiConfig::from_env(),
            providers: ProvidersConfig::from_env()?,
        })
    }
}
