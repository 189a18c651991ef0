//! Wire types for the Service Usage API
//!
//! Only the fields this crate reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// State value reported for an enabled service
pub const ENABLED_STATE: &str = "ENABLED";

/// A service on a project, as returned by
/// `GET /v1/projects/{project}/services/{service}`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceState {
    /// Resource name, e.g. `projects/123/services/run.googleapis.com`
    #[serde(default)]
    pub name: Option<String>,
    /// `ENABLED`, `DISABLED` or `STATE_UNSPECIFIED`
    #[serde(default)]
    pub state: String,
}

impl ServiceState {
    pub fn is_enabled(&self) -> bool {
        self.state == ENABLED_STATE
    }
}

/// Standard Google API error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleApiErrorResponse {
    pub error: GoogleApiError,
}

/// Body of a Google API error
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `PERMISSION_DENIED`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

/// One entry of `error.details`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorDetail {
    #[serde(rename = "@type", default)]
    pub type_url: Option<String>,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

/// A precondition or quota violation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Violation {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_state_parsing() {
        let state: ServiceState = serde_json::from_str(
            r#"{"name": "projects/1/services/foo.googleapis.com", "state": "ENABLED", "config": {}}"#,
        )
        .unwrap();
        assert!(state.is_enabled());

        let disabled: ServiceState = serde_json::from_str(r#"{"state": "DISABLED"}"#).unwrap();
        assert!(!disabled.is_enabled());

        let missing: ServiceState = serde_json::from_str("{}").unwrap();
        assert!(!missing.is_enabled());
    }

    #[test]
    fn test_state_comparison_is_exact() {
        let lower = ServiceState {
            name: None,
            state: "enabled".to_string(),
        };
        assert!(!lower.is_enabled());
    }
}
