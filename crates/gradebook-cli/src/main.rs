#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use gradebook_postgres::run_pending_migrations;
use gradebook_server::service::ServiceState;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "gradebook_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "gradebook_cli::server::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        address = %cli.address,
        "starting gradebook server"
    );

    if cli.skip_migrations {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "skipping database migrations"
        );
    } else {
        run_pending_migrations(&cli.service.postgres)
            .await
            .context("failed to run database migrations")?;
    }

    let state = ServiceState::from_config(&cli.service)
        .context("failed to initialize application state")?;

    server::serve(cli.address, state).await
}

/// Initializes the tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set and defaults to `info`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
