//! Platform module for Google Cloud management API integration
//!
//! This module provides:
//! - A Service Usage API client for checking and enabling services on a project

pub mod api;

pub use api::{ServiceUsageApi, ServiceUsageClient, ServiceUsageError};
