//! Service name helpers
//!
//! Pure functions shared by the checker, the CLI and the agent tools.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

/// Matches the service named in an upstream permission failure
static PERMISSION_DENIED_SERVICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Permission denied to enable service \[([.a-zA-Z]+)\]")
        .expect("permission denied pattern is valid")
});

/// Normalize a service given either as a bare name or a full URL
///
/// `https://foo.googleapis.com/v1/...` becomes `foo.googleapis.com`; any
/// other input is returned unchanged.
pub fn normalize_service_name(service: &str) -> String {
    let trimmed = service.trim();
    if !trimmed.starts_with("http") {
        return trimmed.to_string();
    }

    match Url::parse(trimmed) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_string(),
            None => trimmed.to_string(),
        },
        Err(e) => {
            log::debug!("Treating '{}' as a bare service name: {}", trimmed, e);
            trimmed.to_string()
        }
    }
}

/// Console URL where a project owner can enable `service` by hand
pub fn enable_api_link(project_id: &str, service: &str) -> String {
    format!(
        "https://console.cloud.google.com/apis/library/{}?project={}",
        normalize_service_name(service),
        project_id
    )
}

/// Console URL where the project's billing plan can be upgraded
pub fn billing_upgrade_link(project_id: &str) -> String {
    format!(
        "https://console.firebase.google.com/project/{}/usage/details",
        project_id
    )
}

/// Extract `X` from `Permission denied to enable service [X]`
pub fn parse_permission_denied_service(message: &str) -> Option<&str> {
    PERMISSION_DENIED_SERVICE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
