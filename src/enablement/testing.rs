//! In-memory fakes for enablement tests

use crate::platform::api::types::{GoogleApiError, ServiceState};
use crate::platform::api::{ServiceUsageApi, ServiceUsageError};
use crate::telemetry::TelemetrySink;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build an API error the way the HTTP client would
pub fn api_error(status: u16, message: &str, body: Option<serde_json::Value>) -> ServiceUsageError {
    let body = body.map(|value| {
        let mut parsed: GoogleApiError = serde_json::from_value(value).unwrap();
        parsed.code = status;
        parsed.message = message.to_string();
        parsed
    });
    ServiceUsageError::ApiError {
        status,
        message: message.to_string(),
        body,
    }
}

/// Scripted Service Usage API
///
/// Status polls return queued states in order, then `fallback_state`.
/// Queued errors are returned (once each) before any state.
pub struct FakeServiceUsage {
    states: Mutex<VecDeque<String>>,
    fallback_state: String,
    status_errors: Mutex<VecDeque<ServiceUsageError>>,
    enable_errors: Mutex<VecDeque<ServiceUsageError>>,
    requested: Mutex<Vec<String>>,
    status_calls: AtomicUsize,
    enable_calls: AtomicUsize,
}

impl FakeServiceUsage {
    pub fn with_states(states: &[&str]) -> Self {
        Self {
            states: Mutex::new(states.iter().map(|s| s.to_string()).collect()),
            fallback_state: "DISABLED".to_string(),
            status_errors: Mutex::new(VecDeque::new()),
            enable_errors: Mutex::new(VecDeque::new()),
            requested: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            enable_calls: AtomicUsize::new(0),
        }
    }

    pub fn always(state: &str) -> Self {
        let mut fake = Self::with_states(&[]);
        fake.fallback_state = state.to_string();
        fake
    }

    pub fn push_status_error(&self, error: ServiceUsageError) {
        self.status_errors.lock().push_back(error);
    }

    pub fn push_enable_error(&self, error: ServiceUsageError) {
        self.enable_errors.lock().push_back(error);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }

    /// Distinct service names seen by status or enable calls
    pub fn requested_services(&self) -> Vec<String> {
        let mut seen = self.requested.lock().clone();
        seen.dedup();
        seen
    }
}

impl ServiceUsageApi for FakeServiceUsage {
    async fn get_service(
        &self,
        _project_id: &str,
        service: &str,
    ) -> Result<ServiceState, ServiceUsageError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(service.to_string());

        if let Some(error) = self.status_errors.lock().pop_front() {
            return Err(error);
        }

        let state = self
            .states
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback_state.clone());
        Ok(ServiceState { name: None, state })
    }

    async fn enable_service(
        &self,
        _project_id: &str,
        service: &str,
    ) -> Result<(), ServiceUsageError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(service.to_string());

        match self.enable_errors.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Telemetry sink that keeps every event in memory
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn track_event(&self, name: &str, properties: HashMap<String, serde_json::Value>) {
        let properties: serde_json::Map<String, serde_json::Value> = properties.into_iter().collect();
        self.events
            .lock()
            .push((name.to_string(), serde_json::Value::Object(properties)));
    }
}
