//! # gcp-apictl
//!
//! Command-line and agent-tool interface over the Google Cloud Service Usage
//! API: check whether an API is enabled on a project, enable it and wait
//! until it is active, or produce a console link for enabling it by hand.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gcp_apictl::config::types::Config;
//! use gcp_apictl::enablement::checker_from_config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let checker = checker_from_config(&Config::default())?.with_prefix("run");
//! checker.ensure("my-project", "run.googleapis.com").await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod common;
pub mod config;
pub mod enablement;
pub mod handlers;
pub mod platform;
pub mod telemetry;

// Re-export commonly used types and functions
pub use enablement::{
    ApiEnablementChecker, EnablementError, enable_api_link, normalize_service_name,
};
use cli::{CacheCommand, Commands};
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Check { project, service } => {
            handlers::handle_check(config, &project, &service, json).await
        }
        Commands::Ensure {
            project,
            service,
            best_effort,
            silent,
            prefix,
        } => {
            handlers::handle_ensure(config, &project, &service, best_effort, silent, &prefix, json)
                .await
        }
        Commands::Link { project, service } => handlers::handle_link(&project, &service, json),
        Commands::Cache { command } => match command {
            CacheCommand::Show => handlers::handle_cache_show(config, json),
            CacheCommand::Clear { project } => {
                handlers::handle_cache_clear(config, project.as_deref(), json)
            }
        },
    }
}
