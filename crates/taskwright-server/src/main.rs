//! Taskwright Server CLI
//!
//! Starts the HTTP server that turns free-form input into tasks.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use taskwright_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use tracing::warn;

/// Taskwright - natural-language task extraction service
#[derive(Debug, Parser)]
#[command(name = "taskwright-server", version)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, env = "TASKWRIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind port from the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            warn!("No config file specified, using the mock provider");
            ServerConfig::default_test_config()
        }
    };

    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    // Read once at startup; request handling never touches the environment
    let env_api_key = std::env::var("OPENAI_API_KEY").ok();

    start_server(config, env_api_key).await
}
