//! Intents fee analytics configuration
use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{ArgGroup, Parser};
use url::Url;

/// Origins allowed by the API CORS layer unless overridden.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:8501";

/// Default number of assets returned by the top assets report.
pub const DEFAULT_TOP_N: u64 = 20;

/// Default row cap of the daily & cumulative series.
pub const DEFAULT_SERIES_ROW_LIMIT: u64 = 1000;

/// Clickhouse database configuration options
#[derive(Debug, Clone, Parser)]
pub struct ClickhouseOpts {
    /// Clickhouse URL
    #[clap(long, env = "CLICKHOUSE_URL")]
    pub url: Option<Url>,
    /// Clickhouse database
    #[clap(long, env = "CLICKHOUSE_DB", default_value = "default")]
    pub db: String,
    /// Clickhouse username
    #[clap(long, env = "CLICKHOUSE_USERNAME", default_value = "default")]
    pub username: String,
    /// Clickhouse password
    #[clap(long, env = "CLICKHOUSE_PASSWORD", default_value = "")]
    pub password: String,
    /// Table holding the intents fee transfers
    #[clap(long, env = "FEE_TABLE", default_value = "intents_fee_transfers")]
    pub table: String,
}

/// Where fee transactions are read from.
///
/// Exactly one of `--url` (warehouse) or `--data-file` (CSV, in memory) is required.
#[derive(Debug, Clone, Parser)]
#[clap(group(ArgGroup::new("backend").required(true).args(["url", "data_file"])))]
pub struct SourceOpts {
    /// Clickhouse database configuration
    #[clap(flatten)]
    pub clickhouse: ClickhouseOpts,

    /// CSV file of fee transactions evaluated in memory instead of Clickhouse
    #[clap(long, env = "FEE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Seconds report results are cached for (0 disables the cache)
    #[clap(long, env = "CACHE_TTL_SECS", default_value = "300")]
    pub cache_ttl_secs: u64,
}

impl SourceOpts {
    /// Cache time-to-live, `None` when caching is disabled.
    pub const fn cache_ttl(&self) -> Option<Duration> {
        match self.cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Fee report configuration options
#[derive(Debug, Clone, Parser)]
pub struct ReportOpts {
    /// Account that collects intents fees; only transfers to it are counted
    #[clap(long, env = "FEE_RECIPIENT_ID")]
    pub fee_recipient: String,
    /// Default first day (UTC) of the daily & cumulative series
    #[clap(long, env = "SERIES_START_DATE")]
    pub series_start_date: Option<NaiveDate>,
    /// Number of assets in the top assets report
    #[clap(long, env = "TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: u64,
    /// Row cap of the daily & cumulative series (0 = unbounded)
    #[clap(long, env = "SERIES_ROW_LIMIT", default_value_t = DEFAULT_SERIES_ROW_LIMIT)]
    pub series_row_limit: u64,
}

impl ReportOpts {
    /// Series row limit, `None` when unbounded.
    pub const fn series_limit(&self) -> Option<u64> {
        match self.series_row_limit {
            0 => None,
            limit => Some(limit),
        }
    }
}

/// HTTP API configuration options
#[derive(Debug, Clone, Parser)]
pub struct ApiOpts {
    /// API server host
    #[clap(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// API server port
    #[clap(long, env = "API_PORT", default_value = "3000")]
    pub port: u16,
    /// Comma separated list of allowed CORS origins
    #[clap(long, env = "ALLOWED_ORIGINS", default_value = DEFAULT_ALLOWED_ORIGINS)]
    pub allowed_origins: String,
    /// Maximum number of requests per rate limiting period
    #[clap(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = u64::MAX)]
    pub max_requests: u64,
    /// Rate limiting period in seconds
    #[clap(long, env = "RATE_LIMIT_PERIOD_SECS", default_value = "1")]
    pub rate_period_secs: u64,
}

impl ApiOpts {
    /// Allowed origins split into individual entries.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Rate limiting window.
    pub const fn rate_period(&self) -> Duration {
        Duration::from_secs(self.rate_period_secs)
    }
}

/// CLI options for the API server
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Fee transaction source
    #[clap(flatten)]
    pub source: SourceOpts,

    /// Fee report configuration
    #[clap(flatten)]
    pub report: ReportOpts,

    /// HTTP API configuration
    #[clap(flatten)]
    pub api: ApiOpts,
}
