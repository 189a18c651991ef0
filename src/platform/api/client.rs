//! Service Usage API client
//!
//! Issues the two calls enablement needs: a status query and an enable
//! request. Every request carries the quota user header so usage is
//! attributed to the target project.

use super::error::{Result, ServiceUsageError};
use super::types::{GoogleApiErrorResponse, ServiceState};
use crate::config::types::ApiConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Production Service Usage origin
pub const SERVICE_USAGE_ORIGIN: &str = "https://serviceusage.googleapis.com";

/// API version path segment
const API_VERSION: &str = "v1";

/// Header used to attribute quota to a project
pub const QUOTA_USER_HEADER: &str = "x-goog-quota-user";

/// User agent for API requests
const USER_AGENT: &str = concat!("gcp-apictl/", env!("CARGO_PKG_VERSION"));

/// DNS-style service name: dot-separated labels of letters, digits and inner hyphens
static SERVICE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("service name pattern is valid")
});

/// Project id, project number, or legacy `domain:project` id
static PROJECT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.:-]*$").expect("project id pattern is valid")
});

/// Service Usage operations the enablement checker depends on
pub trait ServiceUsageApi: Send + Sync {
    /// Read the current state of `service` on `project_id`
    ///
    /// Endpoint: GET /v1/projects/:project/services/:service
    fn get_service(
        &self,
        project_id: &str,
        service: &str,
    ) -> impl Future<Output = Result<ServiceState>> + Send;

    /// Ask the platform to enable `service` on `project_id`
    ///
    /// Endpoint: POST /v1/projects/:project/services/:service:enable
    fn enable_service(
        &self,
        project_id: &str,
        service: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// reqwest-backed client for the Service Usage API
pub struct ServiceUsageClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Origin, without trailing slash
    origin: String,
    /// Optional OAuth access token sent as a bearer token
    access_token: Option<String>,
}

impl ServiceUsageClient {
    /// Create a client against the production origin, without credentials
    pub fn new() -> Result<Self> {
        Self::with_url(SERVICE_USAGE_ORIGIN)
    }

    /// Create a client with a custom origin
    pub fn with_url(origin: impl Into<String>) -> Result<Self> {
        Self::build(origin.into(), None, Duration::from_secs(30))
    }

    /// Create a client from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::build(
            config.service_usage_origin.clone(),
            config.access_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(origin: String, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ServiceUsageError::HttpError)?;

        Ok(Self {
            http_client,
            origin: origin.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Get the configured origin
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build the URL of a service resource, optionally with a custom method suffix
    ///
    /// Names that could escape the service resource path are rejected.
    fn service_url(&self, project_id: &str, service: &str, verb: Option<&str>) -> Result<String> {
        if !PROJECT_ID.is_match(project_id) || project_id.contains("..") {
            return Err(ServiceUsageError::InvalidName {
                kind: "project",
                name: project_id.to_string(),
            });
        }
        if !SERVICE_NAME.is_match(service) {
            return Err(ServiceUsageError::InvalidName {
                kind: "service",
                name: service.to_string(),
            });
        }

        let mut url = format!(
            "{}/{}/projects/{}/services/{}",
            self.origin, API_VERSION, project_id, service
        );
        if let Some(verb) = verb {
            url.push(':');
            url.push_str(verb);
        }
        Ok(url)
    }

    /// Start a request with the quota header and, when configured, the bearer token
    fn request(&self, method: Method, url: &str, project_id: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(QUOTA_USER_HEADER, format!("projects/{}", project_id));

        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ServiceUsageError::ParseError(e.to_string()))
        } else {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<GoogleApiErrorResponse>(&error_body)
                .ok()
                .map(|r| r.error);
            let message = match &body {
                Some(b) if !b.message.is_empty() => b.message.clone(),
                _ if error_body.is_empty() => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
                _ => error_body,
            };

            Err(ServiceUsageError::ApiError {
                status: status_code,
                message,
                body,
            })
        }
    }
}

impl ServiceUsageApi for ServiceUsageClient {
    async fn get_service(&self, project_id: &str, service: &str) -> Result<ServiceState> {
        let url = self.service_url(project_id, service, None)?;
        log::debug!("GET {}", url);

        let response = self.request(Method::GET, &url, project_id).send().await?;
        Self::handle_response(response).await
    }

    async fn enable_service(&self, project_id: &str, service: &str) -> Result<()> {
        let url = self.service_url(project_id, service, Some("enable"))?;
        log::debug!("POST {}", url);

        let response = self.request(Method::POST, &url, project_id).send().await?;
        // The body is a long-running operation; completion is observed by polling instead.
        if response.status().is_success() {
            return Ok(());
        }
        Self::handle_response::<serde_json::Value>(response)
            .await
            .map(|_| ())
    }
}
