use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gcp-apictl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check and enable Google Cloud APIs for a project")]
#[command(long_about = "Checks whether a Google Cloud API is enabled on a project and, when it is not, enables it and waits until the platform reports it active. Positive results are cached locally so repeated checks skip the network.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format where applicable
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report whether an API is enabled on a project
    Check {
        /// Project ID or number
        #[arg(value_name = "PROJECT")]
        project: String,

        /// Service name (e.g. run.googleapis.com) or a URL on that host
        #[arg(value_name = "SERVICE")]
        service: String,
    },

    /// Enable an API if needed and wait until it is active
    Ensure {
        /// Project ID or number
        #[arg(value_name = "PROJECT")]
        project: String,

        /// Service name (e.g. run.googleapis.com) or a URL on that host
        #[arg(value_name = "SERVICE")]
        service: String,

        /// Never fail; report problems only in the debug log
        #[arg(long)]
        best_effort: bool,

        /// Do not print progress lines
        #[arg(long)]
        silent: bool,

        /// Label printed before progress lines
        #[arg(long, default_value = "apis")]
        prefix: String,
    },

    /// Print the console URL for enabling an API by hand
    Link {
        /// Project ID or number
        #[arg(value_name = "PROJECT")]
        project: String,

        /// Service name (e.g. run.googleapis.com) or a URL on that host
        #[arg(value_name = "SERVICE")]
        service: String,
    },

    /// Inspect or reset the local enablement cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// List cached (project, service) pairs
    Show,

    /// Forget cached entries
    Clear {
        /// Only clear entries for this project
        #[arg(long)]
        project: Option<String>,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
