//! Service Usage API client module
//!
//! Provides access to the Service Usage API for reading the state of a
//! service on a project and requesting that it be enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use gcp_apictl::platform::api::{ServiceUsageApi, ServiceUsageClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ServiceUsageClient::new()?;
//!
//!     let service = client.get_service("my-project", "run.googleapis.com").await?;
//!     println!("run.googleapis.com is {}", service.state);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use client::{ServiceUsageApi, ServiceUsageClient};
pub use error::{Result, ServiceUsageError};
pub use types::{ErrorDetail, GoogleApiError, GoogleApiErrorResponse, ServiceState, Violation};
