//! Error types for the Service Usage API client
//!
//! Provides structured error types for all API operations.

use super::types::GoogleApiError;
use thiserror::Error;

/// Violation type reported when the project's billing plan blocks enablement
const BILLING_VIOLATION_TYPE: &str = "serviceusage/billing-enabled";

/// Canonical status string for permission failures
const PERMISSION_DENIED_STATUS: &str = "PERMISSION_DENIED";

/// Errors that can occur when interacting with the Service Usage API
#[derive(Debug, Error)]
pub enum ServiceUsageError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API (or the raw body if it was not JSON)
        message: String,
        /// Parsed Google error envelope, when the body carried one
        body: Option<GoogleApiError>,
    },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A project or service name that cannot be used in a resource path
    #[error("Invalid {kind} name: '{name}'")]
    InvalidName { kind: &'static str, name: String },
}

impl ServiceUsageError {
    /// HTTP status of an API error response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            Self::ParseError(_) | Self::InvalidName { .. } => None,
        }
    }

    /// The upstream error message, as the API reported it
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True when the API refused because the project is not on a billing-enabled plan
    pub fn is_billing_error(&self) -> bool {
        let Self::ApiError { body: Some(body), .. } = self else {
            return false;
        };
        body.details.iter().any(|detail| {
            detail
                .violations
                .iter()
                .any(|v| v.kind.as_deref() == Some(BILLING_VIOLATION_TYPE))
        })
    }

    /// True when the caller lacks permission for the operation
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::ApiError { status, body, .. } => {
                *status == 403
                    || body
                        .as_ref()
                        .and_then(|b| b.status.as_deref())
                        .is_some_and(|s| s == PERMISSION_DENIED_STATUS)
            }
            _ => false,
        }
    }
}

/// Result type alias for Service Usage API operations
pub type Result<T> = std::result::Result<T, ServiceUsageError>;
