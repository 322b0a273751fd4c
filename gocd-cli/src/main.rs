//! GoCD CLI
//!
//! Command-line interface for the pipeline API of a GoCD server.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "gocd=info,gocd_client=info";

#[derive(Parser)]
#[command(name = "gocd")]
#[command(about = "GoCD pipeline CLI", long_about = None)]
struct Cli {
    /// GoCD server URL
    #[arg(long, env = "GOCD_SERVER_URL", default_value = "http://localhost:8153/go")]
    server_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "GOCD_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Basic auth username
    #[arg(long, env = "GOCD_USERNAME")]
    username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "GOCD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
        timeout: Duration::from_secs(cli.timeout),
        username: cli.username,
        password: cli.password,
    };
    config.validate()?;

    // Ctrl-C aborts the request in flight
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling request");
            on_signal.cancel();
        }
    });

    handle_command(cli.command, &config, &cancel).await
}
