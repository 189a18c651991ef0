use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub enablement: EnablementConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Service Usage API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the Service Usage API
    pub service_usage_origin: String,
    /// OAuth access token, sent as a bearer token when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

/// Enablement polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnablementConfig {
    /// Delay before each status poll after an enable request
    pub poll_interval_ms: u64,
    /// Polls after the first one before another enable request is issued
    pub polls_before_retry: u32,
    /// Enable requests issued before giving up with a timeout
    pub max_enable_attempts: u32,
}

/// Enablement cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Cache file location; defaults to `<config dir>/gcp-apictl/configstore.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Capture endpoint events are posted to
    pub endpoint: String,
    /// Project API key; events are only sent when one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl EnablementConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service_usage_origin: crate::platform::api::client::SERVICE_USAGE_ORIGIN.to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for EnablementConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10_000,
            polls_before_retry: 12,
            max_enable_attempts: 2,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true, // Telemetry enabled by default
            endpoint: crate::telemetry::DEFAULT_CAPTURE_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}
