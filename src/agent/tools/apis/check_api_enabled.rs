//! Check API enabled tool for the agent
//!
//! Reports whether a service is enabled on a project. Never enables anything.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Serialize;
use serde_json::json;

use super::{ApiToolArgs, api_tool_parameters, validate_args};
use crate::agent::tools::error::format_enablement_error;
use crate::config::types::Config;
use crate::enablement::{checker_from_config, enable_api_link, normalize_service_name};

/// Error type for check API enabled operations
#[derive(Debug, thiserror::Error)]
#[error("Check API enabled error: {0}")]
pub struct CheckApiEnabledError(String);

/// Tool to check whether a service is enabled on a project
#[derive(Debug, Clone, Serialize, Default)]
pub struct CheckApiEnabledTool {
    #[serde(skip)]
    config: Config,
}

impl CheckApiEnabledTool {
    /// Create a new CheckApiEnabledTool using `config` for API access
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Tool for CheckApiEnabledTool {
    const NAME: &'static str = "check_api_enabled";

    type Error = CheckApiEnabledError;
    type Args = ApiToolArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Check whether a Google Cloud API is enabled on a project.

Returns `enabled: true/false`. Does NOT enable anything; use ensure_api_enabled for that.
Results that were already seen as enabled are served from a local cache.

**Use Cases:**
- Verify prerequisites before deploying (e.g. run.googleapis.com for Cloud Run)
- Confirm an API became active after the user enabled it in the console"#
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

        match checker.check(&args.project_id, &service).await {
            Ok(enabled) => {
                let mut result = json!({
                    "enabled": enabled,
                    "project_id": args.project_id,
                    "service": service,
                });
                if !enabled {
                    result["console_url"] = json!(enable_api_link(&args.project_id, &service));
                    result["next_steps"] = json!([
                        "Call ensure_api_enabled to enable it automatically",
                        "Or share console_url with a project owner"
                    ]);
                }

                serde_json::to_string_pretty(&result)
                    .map_err(|e| CheckApiEnabledError(format!("Failed to serialize: {}", e)))
            }
            Err(e) => Ok(format_enablement_error(Self::NAME, &args.project_id, &e)),
        }
    }
}
