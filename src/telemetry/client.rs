use crate::config::types::TelemetryConfig;
use crate::telemetry::user::UserId;
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use parking_lot::Mutex;
use std::time::Duration;

/// Destination for analytics events
///
/// Tracking is fire-and-forget: implementations must never surface a
/// failure to the caller.
pub trait TelemetrySink: Send + Sync {
    fn track_event(&self, name: &str, properties: HashMap<String, serde_json::Value>);
}

pub struct TelemetryClient {
    user_id: UserId,
    http_client: Client,
    endpoint: String,
    api_key: String,
    pending_tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl TelemetryClient {
    pub async fn new(config: &TelemetryConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let user_id = UserId::load_or_create()?;
        Self::with_user(config, user_id)
    }

    pub fn with_user(
        config: &TelemetryConfig,
        user_id: UserId,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = config
            .api_key
            .clone()
            .ok_or("Telemetry API key is not configured")?;
        let http_client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        Ok(Self {
            user_id,
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            pending_tasks: Mutex::new(Vec::new()),
        })
    }

    // Helper function to create common properties
    fn create_common_properties(&self) -> HashMap<String, serde_json::Value> {
        let mut properties = HashMap::new();
        properties.insert("version".to_string(), json!(env!("CARGO_PKG_VERSION")));
        properties.insert("os".to_string(), json!(std::env::consts::OS));
        properties.insert("personal_id".to_string(), json!(rand::random::<u32>()));
        properties.insert("distinct_id".to_string(), json!(self.user_id.id.clone()));
        properties
    }

    // Flush method to ensure all events are sent before the program exits
    pub async fn flush(&self) {
        let mut tasks = Vec::new();
        {
            let mut pending_tasks = self.pending_tasks.lock();
            tasks.extend(pending_tasks.drain(..));
        }

        if !tasks.is_empty() {
            log::debug!("Waiting for {} telemetry tasks to complete", tasks.len());
            futures_util::future::join_all(tasks).await;
        }
    }
}

impl TelemetrySink for TelemetryClient {
    fn track_event(&self, name: &str, properties: HashMap<String, serde_json::Value>) {
        let mut event_properties = self.create_common_properties();

        for (key, value) in properties {
            event_properties.insert(key, value);
        }

        let event_name = name.to_string();
        let client = self.http_client.clone();
        let endpoint = self.endpoint.clone();
        let payload = json!({
            "api_key": self.api_key,
            "event": event_name,
            "properties": event_properties,
            "timestamp": chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        });

        log::debug!("Tracking event: {}", event_name);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("No async runtime; dropping telemetry event '{}'", event_name);
            return;
        };

        let handle = runtime.spawn(async move {
            match client.post(&endpoint).json(&payload).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        log::debug!("Successfully sent telemetry event: {}", event_name);
                    } else {
                        let status = response.status();
                        let body = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        log::warn!(
                            "Failed to send telemetry event '{}': HTTP {} - {}",
                            event_name,
                            status,
                            body
                        );
                    }
                }
                Err(e) => {
                    log::warn!("Failed to send telemetry event '{}': {}", event_name, e);
                }
            }
        });

        self.pending_tasks.lock().push(handle);
    }
}
