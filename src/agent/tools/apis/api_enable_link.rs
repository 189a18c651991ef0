//! Console link tool for the agent
//!
//! Produces the URL where a project owner can enable a service by hand.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ApiToolArgs, api_tool_parameters, validate_args};
use crate::enablement::{enable_api_link, normalize_service_name};

/// Error type for api enable link operations
#[derive(Debug, thiserror::Error)]
#[error("API enable link error: {0}")]
pub struct ApiEnableLinkError(String);

/// Tool that returns the console URL for enabling a service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiEnableLinkTool;

impl ApiEnableLinkTool {
    /// Create a new ApiEnableLinkTool
    pub fn new() -> Self {
        Self
    }
}

impl Tool for ApiEnableLinkTool {
    const NAME: &'static str = "api_enable_link";

    type Error = ApiEnableLinkError;
    type Args = ApiToolArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: r#"Get the Google Cloud console URL where a project owner can enable an API by hand.

Makes no API calls and changes nothing.

**Use Cases:**
- ensure_api_enabled failed with PERMISSION_DENIED and the user must ask an owner
- The user prefers to enable the API themselves"#
                .to_string(),
            parameters: api_tool_parameters(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        if let Err(error_json) = validate_args(Self::NAME, &args) {
            return Ok(error_json);
        }

        let result = json!({
            "project_id": args.project_id,
            "service": normalize_service_name(&args.service),
            "url": enable_api_link(&args.project_id, &args.service),
        });

        serde_json::to_string_pretty(&result)
            .map_err(|e| ApiEnableLinkError(format!("Failed to serialize: {}", e)))
    }
}
