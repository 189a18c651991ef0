//! API enablement
//!
//! Makes sure a Google Cloud service is enabled on a project before it is
//! used, enabling it and waiting when necessary.
//!
//! # Example
//!
//! ```rust,ignore
//! use gcp_apictl::config::types::Config;
//! use gcp_apictl::enablement::checker_from_config;
//!
//! let checker = checker_from_config(&Config::default())?.with_prefix("functions");
//! checker.ensure("my-project", "cloudfunctions.googleapis.com").await?;
//! ```

pub mod cache;
pub mod checker;
pub mod error;
pub mod names;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheError, EnablementCache, FileCache, MemoryCache};
pub use checker::ApiEnablementChecker;
pub use error::{EnablementError, Result};
pub use names::{enable_api_link, normalize_service_name, parse_permission_denied_service};

use crate::config::types::Config;
use crate::platform::api::ServiceUsageClient;
use std::sync::Arc;

/// Build a checker wired to the real Service Usage API, the file cache and,
/// when initialized, the global telemetry client
pub fn checker_from_config(config: &Config) -> Result<ApiEnablementChecker<ServiceUsageClient>> {
    let api = ServiceUsageClient::from_config(&config.api)?;
    let cache = FileCache::open(config.cache.path.as_deref())?;
    log::debug!("Using enablement cache at {}", cache.path().display());

    let mut checker = ApiEnablementChecker::new(api, Arc::new(cache))
        .with_settings(config.enablement.clone());
    if let Some(telemetry) = crate::telemetry::get_telemetry_client() {
        checker = checker.with_telemetry(telemetry);
    }
    Ok(checker)
}
