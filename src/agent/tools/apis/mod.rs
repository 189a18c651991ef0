//! API enablement tools
//!
//! Agent tools over the Service Usage API:
//! - Checking whether a service is enabled on a project
//! - Enabling a service and waiting until it is active
//! - Producing a console link for enabling a service by hand
//!
//! ## Tools
//!
//! - `CheckApiEnabledTool` - Report whether a service is enabled
//! - `EnsureApiEnabledTool` - Enable a service if needed and wait for it
//! - `ApiEnableLinkTool` - Console URL for manual enablement (no network)
//!
//! ## Example Flow
//!
//! 1. User asks: "Deploy this to Cloud Run in my-project"
//! 2. Agent calls `check_api_enabled` for `run.googleapis.com`
//! 3. If not enabled, agent calls `ensure_api_enabled`
//! 4. If that fails with PERMISSION_DENIED, agent calls `api_enable_link`
//!    and hands the URL to the user

mod api_enable_link;
mod check_api_enabled;
mod ensure_api_enabled;

pub use api_enable_link::ApiEnableLinkTool;
pub use check_api_enabled::CheckApiEnabledTool;
pub use ensure_api_enabled::EnsureApiEnabledTool;

use super::error::{ErrorCategory, format_error_for_llm};
use serde::Deserialize;

/// Arguments shared by the enablement tools
#[derive(Debug, Deserialize)]
pub struct ApiToolArgs {
    /// Google Cloud project ID or number
    pub project_id: String,
    /// Service name (e.g. run.googleapis.com) or a URL on that host
    pub service: String,
}

/// JSON schema of [`ApiToolArgs`]
fn api_tool_parameters() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "project_id": {
                "type": "string",
                "description": "The Google Cloud project ID (e.g. my-project-123)"
            },
            "service": {
                "type": "string",
                "description": "The service name, e.g. run.googleapis.com. A URL on the service host is also accepted."
            }
        },
        "required": ["project_id", "service"]
    })
}

/// Validate arguments, returning an LLM-formatted error when they are unusable
fn validate_args(tool_name: &str, args: &ApiToolArgs) -> Result<(), String> {
    if args.project_id.trim().is_empty() {
        return Err(format_error_for_llm(
            tool_name,
            ErrorCategory::ValidationFailed,
            "project_id cannot be empty",
            Some(vec!["Pass the Google Cloud project ID the service belongs to"]),
        ));
    }

    if args.service.trim().is_empty() {
        return Err(format_error_for_llm(
            tool_name,
            ErrorCategory::ValidationFailed,
            "service cannot be empty",
            Some(vec![
                "Pass a service name such as run.googleapis.com",
                "A URL on the service host (https://run.googleapis.com/...) also works",
            ]),
        ));
    }

    Ok(())
}

/// Config pointing the tools at a mock Service Usage origin with a private cache
#[cfg(test)]
fn test_config(origin: &str, cache_dir: &std::path::Path) -> crate::config::types::Config {
    use crate::config::types::{ApiConfig, CacheConfig, Config, EnablementConfig};

    Config {
        api: ApiConfig {
            service_usage_origin: origin.to_string(),
            access_token: None,
            timeout_secs: 5,
        },
        enablement: EnablementConfig {
            poll_interval_ms: 0,
            ..EnablementConfig::default()
        },
        cache: CacheConfig {
            path: Some(cache_dir.join("configstore.json")),
        },
        ..Config::default()
    }
}
