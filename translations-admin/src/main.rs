//! Translations Admin Main Entry Point
//!
//! Runs migrations, backfill and stats against the translation overlay store.

use std::env;

use clap::Parser;
use dotenv::dotenv;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use translations_admin::{commands, AdminError, Cli, Dependencies};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), AdminError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("translations_admin=info,translations_engine=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| AdminError::Tracing(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .pretty(),
            )
            .try_init()
            .map_err(|e| AdminError::Tracing(e.to_string()))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    init_tracing()?;

    info!(service_version = env!("CARGO_PKG_VERSION"), "Starting translations admin");

    let deps = match Dependencies::new().await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    // Ctrl-C is forwarded to long-running commands as a shutdown broadcast
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received");
            let _ = shutdown_tx.send(());
        }
    });

    let result = commands::execute(cli.command, cli.json, &deps, &mut shutdown_rx).await;
    signal_handle.abort();

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
