//! Provider configuration.
//!
//! Credentials and endpoints are read once at startup and handed to the
//! client constructors. Nothing in this crate reads the environment after
//! that.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default timeout for a single provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the Azure detect operation, appended when the configured
/// endpoint is a bare resource host.
pub const AZURE_DETECT_PATH: &str = "/face/v1.0/detect";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Azure Face API is partially configured: {0} not set")]
    PartialAzure(&'static str),
}

/// Face++ credentials and endpoint.
#[derive(Debug, Clone)]
pub struct FaceppConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Full URL of the `detect` operation
    pub endpoint: Url,
    pub timeout: Duration,
}

/// Azure Face credentials and endpoint.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub api_key: String,
    /// Full URL of the `detect` operation
    pub endpoint: Url,
    pub timeout: Duration,
}

impl AzureConfig {
    /// Build a config, completing a bare resource host with the detect path.
    pub fn new(api_key: impl Into<String>, endpoint: Url, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: complete_azure_endpoint(endpoint),
            timeout,
        }
    }
}

/// Configuration for every provider the service may call.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub facepp: FaceppConfig,
    /// `None` when Azure is not configured at all
    pub azure: Option<AzureConfig>,
}

impl ProvidersConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout = match get("PROVIDER_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name: "PROVIDER_TIMEOUT",
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let facepp = FaceppConfig {
            api_key: get("FACEPP_API_KEY").ok_or(ConfigError::Missing("FACEPP_API_KEY"))?,
            api_secret: get("FACEPP_API_SECRET")
                .ok_or(ConfigError::Missing("FACEPP_API_SECRET"))?,
            endpoint: parse_url(
                "FACEPP_API_ENDPOINT",
                &get("FACEPP_API_ENDPOINT").ok_or(ConfigError::Missing("FACEPP_API_ENDPOINT"))?,
            )?,
            timeout,
        };

        let azure = match (get("AZURE_FACE_API_KEY"), get("AZURE_FACE_API_ENDPOINT")) {
            (Some(key), Some(endpoint)) => Some(AzureConfig::new(
                key,
                parse_url("AZURE_FACE_API_ENDPOINT", &endpoint)?,
                timeout,
            )),
            (Some(_), None) => return Err(ConfigError::PartialAzure("AZURE_FACE_API_ENDPOINT")),
            (None, Some(_)) => return Err(ConfigError::PartialAzure("AZURE_FACE_API_KEY")),
            (None, None) => None,
        };

        Ok(Self { facepp, azure })
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn complete_azure_endpoint(mut endpoint: Url) -> Url {
    if endpoint.path().trim_end_matches('/').is_empty() {
        endpoint.set_path(AZURE_DETECT_PATH);
    }
    endpoint
}
