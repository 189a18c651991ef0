//! Ensure API enabled tool for the agent
//!
//! Enables a service when needed and waits until the platform reports it
//! active. This can take a few minutes.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Serialize;
use serde_json::json;

use super::{ApiToolArgs, api_tool_parameters, validate_args};
use crate::agent::tools::error::format_enablement_error;
use crate::config::types::Config;
use crate::enablement::{checker_from_config, normalize_service_name};

/// Error type for ensure API enabled operations
#[derive(Debug, thiserror::Error)]
#[error("Ensure API enabled error: {0}")]
pub struct EnsureApiEnabledError(String);

/// Tool to enable a service on a project and wait for it
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnsureApiEnabledTool {
    #[serde(skip)]
    config: Config,
}

impl EnsureApiEnabledTool {
    /// Create a new EnsureApiEnabledTool using `config` for API access
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Tool for EnsureApiEnabledTool {
    const NAME: &'static str = "ensure_api_enabled";

    type Error = EnsureApiEnabledError;
    type Args = ApiToolArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Make sure a Google Cloud API is enabled on a project, enabling it if needed.

If the API is not enabled this requests enablement and waits until it is active.
Waiting can take a few minutes. Returns an error payload if the project's billing
plan blocks the API, if the credentials lack permission, or on timeout.

**Prerequisites:**
- Credentials allowed to enable services on the project (serviceusage.services.enable)"#
                .to_string(),
            parameters: api_tool_parameters(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        if let Err(error_json) = validate_args(Self::NAME, &args) {
            return Ok(error_json);
        }

        let service = normalize_service_name(&args.service);
        let checker = match checker_from_config(&self.config) {
            Ok(c) => c.silent(true),
            Err(e) => return Ok(format_enablement_error(Self::NAME, &args.project_id, &e)),
        };

        match checker.ensure(&args.project_id, &service).await {
            Ok(()) => {
                let result = json!({
                    "enabled": true,
                    "project_id": args.project_id,
                    "service": service,
                    "message": format!("{} is enabled on {}", service, args.project_id),
                });

                serde_json::to_string_pretty(&result)
                    .map_err(|e| EnsureApiEnabledError(format!("Failed to serialize: {}", e)))
            }
            Err(e) => Ok(format_enablement_error(Self::NAME, &args.project_id, &e)),
        }
    }
}
