//! Switchyard - chat routing service
//!
//! CLI entry point for the Switchyard server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use switchyard::cli;
use switchyard::server::config::LogFormat;
use switchyard::server::load_config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "switchyard=info,switchyard_core=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = load_config()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    info!("Starting Switchyard v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, config).await
}
