//! Logging setup.

use std::sync::Once;

use clap::ValueEnum;
use tracing::Span;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    Json,
    /// Multi-line human readable output, for terminals.
    #[default]
    Pretty,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber once per process.
///
/// A subscriber installed by someone else first (a test harness, an embedding
/// binary) is left in place.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let output = match format {
            LogFormat::Json => fmt::layer().json().boxed(),
            LogFormat::Pretty => fmt::layer().pretty().boxed(),
        };

        if tracing_subscriber::registry()
            .with(env_filter())
            .with(output)
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already installed");
        }
    });
}

#[must_use]
pub fn ledger_span(operation: &'static str) -> Span {
    tracing::info_span!("ledger", op = operation)
}
