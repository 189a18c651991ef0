//! Error types for API enablement

use super::cache::CacheError;
use crate::platform::api::ServiceUsageError;
use thiserror::Error;

/// Errors raised while checking or enabling a service
#[derive(Debug, Error)]
pub enum EnablementError {
    /// Network or HTTP failure from the Service Usage API, passed through verbatim
    #[error(transparent)]
    Transport(#[from] ServiceUsageError),

    /// The project's plan does not allow enabling the service
    #[error(
        "Your project {project} must be on a billing-enabled (pay-as-you-go) plan to complete this command. Required API {service} can't be enabled until the upgrade is complete. To upgrade, visit the following URL:\n\n{upgrade_url}"
    )]
    BillingRequired {
        project: String,
        service: String,
        upgrade_url: String,
    },

    /// Permission failure whose message was rewritten to point at the console
    #[error("{message}")]
    PermissionDenied {
        message: String,
        #[source]
        source: ServiceUsageError,
    },

    /// The service never reported ENABLED within the retry budget
    #[error("Timed out waiting for API {service} to enable. Please try again in a few minutes.")]
    Timeout { service: String },

    /// The enablement cache could not be opened
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type alias for enablement operations
pub type Result<T> = std::result::Result<T, EnablementError>;
