//! Agent tools using Rig's Tool trait
//!
//! These tools wrap the enablement checker for an LLM agent to use.
//!
//! ## Available Tools
//!
//! ### API Enablement (Service Usage API)
//! - `CheckApiEnabledTool` - Check whether an API is enabled on a project
//! - `EnsureApiEnabledTool` - Enable an API if needed and wait until active
//! - `ApiEnableLinkTool` - Console URL for enabling an API by hand
//!
//! ## Error Handling Pattern
//!
//! Tools use the shared error utilities in `error.rs`:
//!
//! 1. Each tool keeps its own error type for serialization failures
//! 2. Validation and API failures are returned as structured JSON via
//!    `format_error_for_llm` / `format_enablement_error`
//! 3. Error categories help the agent understand and recover from errors

pub mod apis;
pub mod error;

pub use apis::{ApiEnableLinkTool, ApiToolArgs, CheckApiEnabledTool, EnsureApiEnabledTool};
