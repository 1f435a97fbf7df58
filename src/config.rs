use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::date::DEFAULT_YEAR;
use crate::observability::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "points-ledger")]
#[command(about = "Serves a per-payer points ledger that spends the oldest points first")]
#[command(version)]
pub struct Args {
    /// Address the HTTP server listens on.
    #[arg(long, env = "POINTS_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[arg(long, env = "POINTS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Year assumed for short `MM/DD hAM` transaction dates.
    #[arg(long, env = "POINTS_DEFAULT_YEAR", default_value_t = DEFAULT_YEAR)]
    pub default_year: i32,

    /// Per-request timeout; requests exceeding it get a 503.
    #[arg(long, env = "POINTS_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Maximum number of requests handled at once.
    #[arg(long, env = "POINTS_CONCURRENCY_LIMIT")]
    pub concurrency_limit: Option<usize>,
}

/// Settings the HTTP layer needs at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub default_year: i32,
    pub request_timeout: Option<Duration>,
    pub concurrency_limit: Option<usize>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_YEAR,
            request_timeout: None,
            concurrency_limit: None,
        }
    }
}

impl From<&Args> for ApiConfig {
    fn from(args: &Args) -> Self {
        Self {
            default_year: args.default_year,
            request_timeout: args.request_timeout_secs.map(Duration::from_secs),
            concurrency_limit: args.concurrency_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_flask_service() {
        let args = Args::try_parse_from(["points-ledger"]).unwrap();
        assert_eq!(args.bind, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.log_format, LogFormat::Pretty);
        assert_eq!(ApiConfig::from(&args), ApiConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "points-ledger",
            "--bind=0.0.0.0:8080",
            "--log-format=json",
            "--default-year=2021",
            "--request-timeout-secs=5",
            "--concurrency-limit=64",
        ])
        .unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        let config = ApiConfig::from(&args);
        assert_eq!(config.default_year, 2021);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.concurrency_limit, Some(64));
    }
}
