//! Common error utilities for agent tools
//!
//! Tools report failures to the model as structured JSON instead of failing
//! the tool call, so the agent can read what went wrong and decide how to
//! recover. Each tool still keeps its own `thiserror` type for the few
//! failures that cannot be expressed that way (e.g. serialization).
//!
//! ## Example
//!
//! ```ignore
//! use crate::agent::tools::error::{ErrorCategory, format_error_for_llm};
//!
//! let error_json = format_error_for_llm(
//!     "check_api_enabled",
//!     ErrorCategory::ValidationFailed,
//!     "project_id cannot be empty",
//!     Some(vec!["Pass the Google Cloud project ID"]),
//! );
//! ```

use crate::enablement::EnablementError;
use crate::platform::api::ServiceUsageError;
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Common error categories for tool errors
///
/// These categories help the LLM understand what kind of error occurred
/// and how to potentially recover from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Permission denied for operation
    PermissionDenied,
    /// The project's billing plan blocks the operation
    BillingRequired,
    /// Input validation failed
    ValidationFailed,
    /// Operation timed out
    Timeout,
    /// Network or connection error
    NetworkError,
    /// Resource not available
    ResourceUnavailable,
    /// Internal tool error
    InternalError,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permission was denied for this operation",
            Self::BillingRequired => "The project must be upgraded to a billing-enabled plan",
            Self::ValidationFailed => "Input validation failed",
            Self::Timeout => "The operation timed out",
            Self::NetworkError => "A network or connection error occurred",
            Self::ResourceUnavailable => "The requested resource is not available",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Returns whether this error is potentially recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::Timeout | Self::NetworkError | Self::ResourceUnavailable
        )
    }

    /// Returns the error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::BillingRequired => "BILLING_REQUIRED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ResourceUnavailable => "RESOURCE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Format an error for LLM consumption
///
/// Returns a JSON string with structured error information that helps
/// the LLM understand what went wrong and how to potentially fix it.
///
/// # Arguments
///
/// * `tool_name` - Name of the tool that produced the error
/// * `category` - The error category
/// * `message` - Human-readable error message
/// * `suggestions` - Optional list of suggestions for recovery
pub fn format_error_for_llm(
    tool_name: &str,
    category: ErrorCategory,
    message: &str,
    suggestions: Option<Vec<&str>>,
) -> String {
    let mut error_obj = json!({
        "error": true,
        "tool": tool_name,
        "category": category,
        "code": category.code(),
        "message": message,
        "recoverable": category.is_recoverable(),
    });

    if let Some(suggs) = suggestions {
        if !suggs.is_empty() {
            error_obj["suggestions"] = json!(suggs);
        }
    }

    serde_json::to_string_pretty(&error_obj).unwrap_or_else(|_| {
        format!(
            r#"{{"error": true, "tool": "{}", "message": "{}"}}"#,
            tool_name, message
        )
    })
}

/// Classify an enablement failure for the agent
pub fn categorize_enablement_error(error: &EnablementError) -> ErrorCategory {
    match error {
        EnablementError::BillingRequired { .. } => ErrorCategory::BillingRequired,
        EnablementError::PermissionDenied { .. } => ErrorCategory::PermissionDenied,
        EnablementError::Timeout { .. } => ErrorCategory::Timeout,
        EnablementError::Cache(_) => ErrorCategory::InternalError,
        EnablementError::Transport(e) => match e {
            ServiceUsageError::HttpError(_) => ErrorCategory::NetworkError,
            ServiceUsageError::ParseError(_) => ErrorCategory::InternalError,
            ServiceUsageError::InvalidName { .. } => ErrorCategory::ValidationFailed,
            ServiceUsageError::ApiError { status, .. } => match status {
                401 | 403 => ErrorCategory::PermissionDenied,
                404 => ErrorCategory::ResourceUnavailable,
                429 | 500..=599 => ErrorCategory::NetworkError,
                _ => ErrorCategory::ValidationFailed,
            },
        },
    }
}

/// Format an enablement failure for LLM consumption, with recovery hints
pub fn format_enablement_error(tool_name: &str, project_id: &str, error: &EnablementError) -> String {
    let category = categorize_enablement_error(error);
    let suggestions = match category {
        ErrorCategory::BillingRequired => vec![
            "Ask the user to upgrade the project's billing plan using the URL in the message",
            "Retry once the upgrade is complete",
        ],
        ErrorCategory::PermissionDenied => vec![
            "The current credentials cannot enable services on this project",
            "Ask a project owner to enable the service using the URL in the message",
            "Use api_enable_link to produce a console URL for the service",
        ],
        ErrorCategory::Timeout => vec![
            "Enablement can take several minutes; call check_api_enabled again later",
        ],
        ErrorCategory::ResourceUnavailable => vec![
            "Verify the project ID and service name are spelled correctly",
        ],
        ErrorCategory::NetworkError => vec!["Retry the call; the API may be temporarily unavailable"],
        _ => vec![],
    };
    log::debug!("{} failed for project {}: {}", tool_name, project_id, error);

    format_error_for_llm(tool_name, category, &error.to_string(), Some(suggestions))
}
