//! API enablement checker
//!
//! Checks whether a service is enabled on a project and, when it is not,
//! requests enablement and polls until the platform reports it ENABLED.
//!
//! Per `ensure` call at most `max_enable_attempts` enable requests are
//! issued. Each is followed by up to `polls_before_retry + 1` status polls,
//! every poll preceded by `poll_interval`. When the budget is spent the call
//! fails with [`EnablementError::Timeout`].

use super::cache::EnablementCache;
use super::error::{EnablementError, Result};
use super::names::{
    billing_upgrade_link, enable_api_link, normalize_service_name,
    parse_permission_denied_service,
};
use crate::common::output::{bold, labeled_bullet, labeled_success, labeled_warning};
use crate::config::types::EnablementConfig;
use crate::platform::api::{ServiceUsageApi, ServiceUsageError};
use crate::telemetry::{API_ENABLED_EVENT, TelemetrySink, api_enabled_properties};
use std::sync::Arc;

/// Checks and enables services through a [`ServiceUsageApi`]
pub struct ApiEnablementChecker<A> {
    api: A,
    cache: Arc<dyn EnablementCache>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    settings: EnablementConfig,
    /// Label printed before console lines
    prefix: String,
    /// Suppress console lines
    silent: bool,
}

impl<A: ServiceUsageApi> ApiEnablementChecker<A> {
    pub fn new(api: A, cache: Arc<dyn EnablementCache>) -> Self {
        Self {
            api,
            cache,
            telemetry: None,
            settings: EnablementConfig::default(),
            prefix: String::new(),
            silent: false,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn with_settings(mut self, settings: EnablementConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// True if `service` is enabled on `project_id`
    ///
    /// A cached positive answer is returned without a network call. A live
    /// ENABLED answer is written to the cache. A negative answer is never
    /// an error.
    pub async fn check(&self, project_id: &str, service: &str) -> Result<bool> {
        let service = normalize_service_name(service);

        if self.cache.is_enabled(project_id, &service) {
            log::debug!("API {} on {} is enabled (cached)", service, project_id);
            return Ok(true);
        }

        let state = self.api.get_service(project_id, &service).await?;
        let is_enabled = state.is_enabled();
        log::debug!(
            "API {} on {} reported state {:?}",
            service,
            project_id,
            state.state
        );

        if is_enabled {
            if let Err(e) = self.cache.mark_enabled(project_id, &service) {
                log::warn!("Could not cache enablement of {}: {}", service, e);
            }
            self.success(&format!("required API {} is enabled", bold(&service)));
        }

        Ok(is_enabled)
    }

    /// Make sure `service` is enabled, enabling it and waiting if needed
    pub async fn ensure(&self, project_id: &str, service: &str) -> Result<()> {
        let service = normalize_service_name(service);
        self.bullet(&format!(
            "ensuring required API {} is enabled...",
            bold(&service)
        ));

        if self.check(project_id, &service).await? {
            return Ok(());
        }

        self.warning(&format!(
            "missing required API {}. Enabling now...",
            bold(&service)
        ));
        self.enable_api_with_retries(project_id, &service).await
    }

    /// Like [`ensure`](Self::ensure), but failures only reach the debug log
    ///
    /// For callers whose next request fails with its own error anyway when
    /// the service is unusable.
    pub async fn best_effort_ensure(&self, project_id: &str, service: &str) {
        if let Err(e) = self.ensure(project_id, service).await {
            log::debug!(
                "Unable to check that {} is enabled on {}. Calls to it will fail if it is not enabled: {}",
                service,
                project_id,
                e
            );
        }
    }

    /// Issue one enable request, translating billing and permission failures
    async fn enable(&self, project_id: &str, service: &str) -> Result<()> {
        match self.api.enable_service(project_id, service).await {
            Ok(()) => Ok(()),
            Err(e) => Err(translate_enable_error(project_id, service, e)),
        }
    }

    async fn enable_api_with_retries(&self, project_id: &str, service: &str) -> Result<()> {
        let mut enablement_retries = 0;

        while enablement_retries < self.settings.max_enable_attempts {
            self.enable(project_id, service).await?;

            if self.poll_check_enabled(project_id, service).await? {
                return Ok(());
            }

            enablement_retries += 1;
            log::debug!(
                "API {} still not enabled after enable attempt {}",
                service,
                enablement_retries
            );
        }

        Err(EnablementError::Timeout {
            service: service.to_string(),
        })
    }

    /// Poll after an enable request; false once the poll budget is spent
    async fn poll_check_enabled(&self, project_id: &str, service: &str) -> Result<bool> {
        let interval = self.settings.poll_interval();

        for poll_retries in 0..=self.settings.polls_before_retry {
            tokio::time::sleep(interval).await;

            if self.check(project_id, service).await? {
                self.track_enabled(service);
                return Ok(true);
            }

            log::trace!("poll {} for {}: not enabled", poll_retries, service);
            self.bullet(&format!(
                "waiting for API {} to activate...",
                bold(service)
            ));
        }

        Ok(false)
    }

    fn track_enabled(&self, service: &str) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.track_event(API_ENABLED_EVENT, api_enabled_properties(service));
        }
    }

    fn bullet(&self, message: &str) {
        if !self.silent {
            labeled_bullet(&self.prefix, message);
        }
    }

    fn success(&self, message: &str) {
        if !self.silent {
            labeled_success(&self.prefix, message);
        }
    }

    fn warning(&self, message: &str) {
        if !self.silent {
            labeled_warning(&self.prefix, message);
        }
    }
}

/// Map an enable failure to the error surfaced to the user
///
/// Billing failures become [`EnablementError::BillingRequired`]. Permission
/// failures naming the blocked service get a console link; all other
/// failures pass through unchanged.
pub fn translate_enable_error(
    project_id: &str,
    service: &str,
    error: ServiceUsageError,
) -> EnablementError {
    if error.is_billing_error() {
        return EnablementError::BillingRequired {
            project: project_id.to_string(),
            service: service.to_string(),
            upgrade_url: billing_upgrade_link(project_id),
        };
    }

    if error.is_permission_error() {
        let blocked = error
            .upstream_message()
            .and_then(parse_permission_denied_service)
            .map(str::to_string);

        if let Some(blocked) = blocked {
            return EnablementError::PermissionDenied {
                message: format!(
                    "Permissions denied enabling {}. Please ask a project owner to visit the following URL to enable this service: {}",
                    blocked,
                    enable_api_link(project_id, &blocked)
                ),
                source: error,
            };
        }
    }

    EnablementError::Transport(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enablement::cache::MemoryCache;
    use crate::enablement::testing::{FakeServiceUsage, RecordingTelemetry, api_error};
    use std::time::Duration;

    fn fast_settings() -> EnablementConfig {
        EnablementConfig {
            poll_interval_ms: 0,
            ..EnablementConfig::default()
        }
    }

    fn checker(
        api: FakeServiceUsage,
        cache: Arc<MemoryCache>,
    ) -> ApiEnablementChecker<FakeServiceUsage> {
        ApiEnablementChecker::new(api, cache)
            .with_settings(fast_settings())
            .silent(true)
    }

    #[tokio::test]
    async fn test_check_enabled_writes_cache() {
        let cache = Arc::new(MemoryCache::new());
        let api = FakeServiceUsage::with_states(&["ENABLED"]);
        let checker = checker(api, cache.clone());

        assert!(checker.check("p1", "foo.googleapis.com").await.unwrap());
        assert!(cache.is_enabled("p1", "foo.googleapis.com"));
        assert_eq!(checker.api.status_calls(), 1);
    }

    #[tokio::test]
    async fn test_check_cache_hit_skips_network() {
        let cache = Arc::new(MemoryCache::new());
        cache.mark_enabled("p1", "foo.googleapis.com").unwrap();
        let checker = checker(FakeServiceUsage::with_states(&[]), cache);

        assert!(checker.check("p1", "foo.googleapis.com").await.unwrap());
        assert!(checker.check("p1", "https://foo.googleapis.com").await.unwrap());
        assert_eq!(checker.api.status_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_url_and_hostname_share_cache_key() {
        let cache = Arc::new(MemoryCache::new());
        let checker = checker(FakeServiceUsage::with_states(&["ENABLED"]), cache.clone());

        assert!(
            checker
                .check("p1", "https://foo.googleapis.com/v1/anything")
                .await
                .unwrap()
        );
        assert!(cache.is_enabled("p1", "foo.googleapis.com"));
        assert!(checker.check("p1", "foo.googleapis.com").await.unwrap());
        assert_eq!(checker.api.status_calls(), 1);
        assert_eq!(
            checker.api.requested_services(),
            vec!["foo.googleapis.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_check_negative_is_not_cached() {
        let cache = Arc::new(MemoryCache::new());
        let checker = checker(FakeServiceUsage::with_states(&["DISABLED"]), cache.clone());

        assert!(!checker.check("p1", "foo.googleapis.com").await.unwrap());
        assert!(!cache.is_enabled("p1", "foo.googleapis.com"));
    }

    #[tokio::test]
    async fn test_check_propagates_transport_errors() {
        let api = FakeServiceUsage::with_states(&[]);
        api.push_status_error(api_error(500, "backend unavailable", None));
        let checker = checker(api, Arc::new(MemoryCache::new()));

        let err = checker.check("p1", "foo.googleapis.com").await.unwrap_err();
        assert!(matches!(
            err,
            EnablementError::Transport(ServiceUsageError::ApiError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_ensure_already_enabled_does_not_enable() {
        let checker = checker(
            FakeServiceUsage::with_states(&["ENABLED"]),
            Arc::new(MemoryCache::new()),
        );

        checker.ensure("p1", "foo.googleapis.com").await.unwrap();
        assert_eq!(checker.api.enable_calls(), 0);
    }

    #[tokio::test]
    async fn test_ensure_enables_and_tracks_event() {
        let telemetry = Arc::new(RecordingTelemetry::default());
        let cache = Arc::new(MemoryCache::new());
        let checker = checker(
            FakeServiceUsage::with_states(&["DISABLED", "ENABLED"]),
            cache.clone(),
        )
        .with_telemetry(telemetry.clone());

        checker.ensure("p1", "foo.googleapis.com").await.unwrap();

        assert_eq!(checker.api.enable_calls(), 1);
        assert_eq!(checker.api.status_calls(), 2);
        assert!(cache.is_enabled("p1", "foo.googleapis.com"));
        assert_eq!(
            telemetry.events(),
            vec![(
                "api_enabled".to_string(),
                serde_json::json!({ "api_name": "foo.googleapis.com" })
            )]
        );
    }

    #[tokio::test]
    async fn test_ensure_times_out_after_two_enable_attempts() {
        let telemetry = Arc::new(RecordingTelemetry::default());
        let checker = checker(
            FakeServiceUsage::always("DISABLED"),
            Arc::new(MemoryCache::new()),
        )
        .with_telemetry(telemetry.clone());

        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();

        assert!(matches!(&err, EnablementError::Timeout { service } if service == "foo.googleapis.com"));
        assert!(err.to_string().contains("foo.googleapis.com"));
        assert_eq!(checker.api.enable_calls(), 2);
        // 1 initial check + 2 attempts x (1 + 12) polls
        assert_eq!(checker.api.status_calls(), 1 + 2 * 13);
        assert!(telemetry.events().is_empty());
    }

    #[tokio::test]
    async fn test_second_enable_attempt_can_succeed() {
        let mut states = vec!["DISABLED"; 1 + 13];
        states.push("ENABLED");
        let checker = checker(
            FakeServiceUsage::with_states(&states),
            Arc::new(MemoryCache::new()),
        );

        checker.ensure("p1", "foo.googleapis.com").await.unwrap();
        assert_eq!(checker.api.enable_calls(), 2);
        assert_eq!(checker.api.status_calls(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_waits_full_poll_schedule() {
        let checker = ApiEnablementChecker::new(
            FakeServiceUsage::always("DISABLED"),
            Arc::new(MemoryCache::new()),
        )
        .silent(true);

        let started = tokio::time::Instant::now();
        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();

        assert!(matches!(err, EnablementError::Timeout { .. }));
        // 2 attempts x 13 polls x 10s
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(260), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(261), "elapsed {:?}", elapsed);
        assert_eq!(checker.api.status_calls(), 27);
        assert_eq!(checker.api.enable_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_poll_waits_configured_interval() {
        let checker = ApiEnablementChecker::new(
            FakeServiceUsage::with_states(&["DISABLED", "DISABLED", "DISABLED", "ENABLED"]),
            Arc::new(MemoryCache::new()),
        )
        .with_settings(EnablementConfig {
            poll_interval_ms: 1500,
            ..EnablementConfig::default()
        })
        .silent(true);

        let started = tokio::time::Instant::now();
        checker.ensure("p1", "foo.googleapis.com").await.unwrap();

        // Initial check is immediate; three polls follow the enable request
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(4500), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(4600), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabled_service_does_not_wait() {
        let checker = ApiEnablementChecker::new(
            FakeServiceUsage::with_states(&["ENABLED"]),
            Arc::new(MemoryCache::new()),
        )
        .silent(true);

        let started = tokio::time::Instant::now();
        checker.ensure("p1", "foo.googleapis.com").await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_custom_retry_budget() {
        let checker = ApiEnablementChecker::new(
            FakeServiceUsage::always("DISABLED"),
            Arc::new(MemoryCache::new()),
        )
        .with_settings(EnablementConfig {
            poll_interval_ms: 0,
            polls_before_retry: 2,
            max_enable_attempts: 3,
        })
        .silent(true);

        assert!(checker.ensure("p1", "foo.googleapis.com").await.is_err());
        assert_eq!(checker.api.enable_calls(), 3);
        assert_eq!(checker.api.status_calls(), 1 + 3 * 3);
    }

    #[tokio::test]
    async fn test_billing_error_names_project_and_upgrade_url() {
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(
            400,
            "Billing must be enabled",
            Some(serde_json::json!({
                "status": "FAILED_PRECONDITION",
                "details": [{ "violations": [{ "type": "serviceusage/billing-enabled" }] }]
            })),
        ));
        let checker = checker(api, Arc::new(MemoryCache::new()));

        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();
        assert!(matches!(err, EnablementError::BillingRequired { .. }));
        let message = err.to_string();
        assert!(message.contains("p1"));
        assert!(message.contains("https://console.firebase.google.com/project/p1/usage/details"));
        assert_eq!(checker.api.enable_calls(), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_is_rewritten_with_console_link() {
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(
            403,
            "Permission denied to enable service [artifactregistry.googleapis.com]",
            Some(serde_json::json!({ "status": "PERMISSION_DENIED" })),
        ));
        let checker = checker(api, Arc::new(MemoryCache::new()));

        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();
        let EnablementError::PermissionDenied { message, source } = &err else {
            panic!("expected PermissionDenied, got {err:?}");
        };
        assert!(message.contains(
            "https://console.cloud.google.com/apis/library/artifactregistry.googleapis.com?project=p1"
        ));
        assert!(!message.contains("foo.googleapis.com"));
        assert_eq!(source.status(), Some(403));
    }

    #[tokio::test]
    async fn test_unmatched_permission_denied_is_passed_through() {
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(
            403,
            "The caller does not have permission",
            Some(serde_json::json!({ "status": "PERMISSION_DENIED" })),
        ));
        let checker = checker(api, Arc::new(MemoryCache::new()));

        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error (403): The caller does not have permission"
        );
        assert!(matches!(
            err,
            EnablementError::Transport(ServiceUsageError::ApiError { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_other_enable_errors_are_passed_through() {
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(429, "Quota exceeded", None));
        let checker = checker(api, Arc::new(MemoryCache::new()));

        let err = checker.ensure("p1", "foo.googleapis.com").await.unwrap_err();
        assert!(matches!(
            err,
            EnablementError::Transport(ServiceUsageError::ApiError { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_best_effort_ensure_swallows_every_error() {
        // Timeout
        let checker_timeout = checker(
            FakeServiceUsage::always("DISABLED"),
            Arc::new(MemoryCache::new()),
        );
        checker_timeout
            .best_effort_ensure("p1", "foo.googleapis.com")
            .await;

        // Transport
        let api = FakeServiceUsage::with_states(&[]);
        api.push_status_error(api_error(503, "unavailable", None));
        checker(api, Arc::new(MemoryCache::new()))
            .best_effort_ensure("p1", "foo.googleapis.com")
            .await;

        // Billing
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(
            400,
            "billing",
            Some(serde_json::json!({
                "details": [{ "violations": [{ "type": "serviceusage/billing-enabled" }] }]
            })),
        ));
        checker(api, Arc::new(MemoryCache::new()))
            .best_effort_ensure("p1", "foo.googleapis.com")
            .await;

        // Permission
        let api = FakeServiceUsage::always("DISABLED");
        api.push_enable_error(api_error(
            403,
            "Permission denied to enable service [foo.googleapis.com]",
            None,
        ));
        checker(api, Arc::new(MemoryCache::new()))
            .best_effort_ensure("p1", "foo.googleapis.com")
            .await;
    }

    #[test]
    fn test_translate_enable_error_leaves_parse_errors_alone() {
        let err = translate_enable_error(
            "p1",
            "foo.googleapis.com",
            ServiceUsageError::ParseError("bad".to_string()),
        );
        assert!(matches!(
            err,
            EnablementError::Transport(ServiceUsageError::ParseError(_))
        ));
    }
}
