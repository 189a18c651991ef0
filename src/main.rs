use clap::Parser;
use gcp_apictl::{cli::Cli, config, telemetry};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    if let Err(e) = telemetry::init_telemetry(&config).await {
        log::debug!("Telemetry unavailable: {}", e);
    }

    // Execute command
    let result = gcp_apictl::run_command(cli.command, &config, cli.json).await;

    if let Some(client) = telemetry::get_telemetry_client() {
        client.flush().await;
    }

    result
}
