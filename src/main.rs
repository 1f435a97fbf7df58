use anyhow::{Context, Result};
use clap::Parser;

use points_ledger::api::{router, ApiState};
use points_ledger::config::{ApiConfig, Args};
use points_ledger::observability::init_logging;
use points_ledger::SharedLedger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);

    let config = ApiConfig::from(&args);
    tracing::info!(
        bind = %args.bind,
        default_year = config.default_year,
        request_timeout = ?config.request_timeout,
        concurrency_limit = ?config.concurrency_limit,
        "starting points ledger"
    );

    let app = router(ApiState::with_config(SharedLedger::new(), config));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("points ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
