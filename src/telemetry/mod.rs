mod client;
mod user;


pub use client::{TelemetryClient, TelemetrySink};
pub use user::UserId;

use crate::config::types::Config;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Default capture endpoint for analytics events
pub const DEFAULT_CAPTURE_ENDPOINT: &str = "https://eu.i.posthog.com/capture/";

/// Environment variable that disables telemetry when set to `false`
pub const ENV_TELEMETRY: &str = "GCP_APICTL_TELEMETRY";

/// Event emitted once an API becomes enabled after polling
pub const API_ENABLED_EVENT: &str = "api_enabled";

/// Properties of an [`API_ENABLED_EVENT`]
pub fn api_enabled_properties(api_name: &str) -> HashMap<String, Value> {
    HashMap::from([("api_name".to_string(), json!(api_name))])
}

static TELEMETRY_CLIENT: OnceLock<Arc<TelemetryClient>> = OnceLock::new();

pub async fn init_telemetry(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Env overrides are already folded into `config.telemetry.enabled` by `load_config`.
    let telemetry_enabled = config.telemetry.enabled && config.telemetry.api_key.is_some();

    if telemetry_enabled {
        let client = TelemetryClient::new(&config.telemetry).await?;
        TELEMETRY_CLIENT
            .set(Arc::new(client))
            .map_err(|_| "Failed to set telemetry client")?;
    } else {
        log::debug!("Telemetry disabled");
    }

    Ok(())
}

pub fn get_telemetry_client() -> Option<Arc<TelemetryClient>> {
    TELEMETRY_CLIENT.get().cloned()
}
