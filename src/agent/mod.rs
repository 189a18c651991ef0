//! Agent module
//!
//! Exposes API enablement to an LLM agent built on the Rig library. The
//! tools in [`tools`] implement Rig's `Tool` trait and can be registered on
//! any Rig agent:
//!
//! ```rust,ignore
//! use gcp_apictl::agent::tools::{CheckApiEnabledTool, EnsureApiEnabledTool, ApiEnableLinkTool};
//!
//! let agent = client
//!     .agent("gpt-5.2")
//!     .tool(CheckApiEnabledTool::new(config.clone()))
//!     .tool(EnsureApiEnabledTool::new(config.clone()))
//!     .tool(ApiEnableLinkTool::new())
//!     .build();
//! ```

pub mod tools;
