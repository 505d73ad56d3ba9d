//! Report backends and backend selection.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use clickhouse_lib::{ClickhouseReader, DailyCumulativeRow, FeeSummary, TopAssetRow};
use config::{ReportOpts, SourceOpts};
use eyre::{Context, Result, eyre};
use tracing::info;

use crate::{cache::CachedReports, memory::MemoryTable};

/// Parameters shared by every report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportParams {
    /// Account whose incoming transfers count as fees
    pub fee_recipient: String,
    /// Number of assets in the top assets report
    pub top_n: u64,
    /// First day of the daily & cumulative series
    pub series_start: Option<NaiveDate>,
    /// Row cap of the daily & cumulative series, `None` for unbounded
    pub series_limit: Option<u64>,
}

impl From<&ReportOpts> for ReportParams {
    fn from(opts: &ReportOpts) -> Self {
        Self {
            fee_recipient: opts.fee_recipient.clone(),
            top_n: opts.top_n,
            series_start: opts.series_start_date,
            series_limit: opts.series_limit(),
        }
    }
}

/// A source able to compute the fee reports.
#[async_trait]
pub trait FeeReports: Send + Sync + Debug {
    /// Summary statistics over all fee transfers.
    async fn summary(&self, params: &ReportParams) -> Result<FeeSummary>;

    /// Assets ranked by USD fee volume, at most `top_n`.
    async fn top_assets(&self, params: &ReportParams) -> Result<Vec<TopAssetRow>>;

    /// Daily buckets with per-asset running totals, newest first.
    async fn daily_cumulative(&self, params: &ReportParams) -> Result<Vec<DailyCumulativeRow>>;

    /// Short description of the backend, used for connectivity checks.
    async fn backend_info(&self) -> Result<String>;
}

#[async_trait]
impl FeeReports for ClickhouseReader {
    async fn summary(&self, params: &ReportParams) -> Result<FeeSummary> {
        self.get_fee_summary(&params.fee_recipient).await
    }

    async fn top_assets(&self, params: &ReportParams) -> Result<Vec<TopAssetRow>> {
        self.get_top_assets(&params.fee_recipient, params.top_n).await
    }

    async fn daily_cumulative(&self, params: &ReportParams) -> Result<Vec<DailyCumulativeRow>> {
        self.get_daily_cumulative(&params.fee_recipient, params.series_start, params.series_limit)
            .await
    }

    async fn backend_info(&self) -> Result<String> {
        let info = self
            .get_server_info()
            .await?
            .ok_or_else(|| eyre!("server info query returned no row"))?;
        Ok(format!(
            "ClickHouse {} (user {}, database {})",
            info.version, info.user, info.database
        ))
    }
}

/// Open the backend selected by `opts`, wrapped in a cache when a TTL is set.
pub fn open(opts: &SourceOpts) -> Result<Arc<dyn FeeReports>> {
    let ttl = opts.cache_ttl();
    if let Some(path) = &opts.data_file {
        let table = MemoryTable::from_csv_path(path)?;
        info!(path = %path.display(), rows = table.len(), "Using in-memory fee table");
        return Ok(with_cache(table, ttl));
    }

    let ch = &opts.clickhouse;
    let url =
        ch.url.clone().ok_or_else(|| eyre!("either a ClickHouse URL or a data file is required"))?;
    let reader =
        ClickhouseReader::new(url, ch.db.clone(), ch.username.clone(), ch.password.clone())
            .wrap_err("failed to create ClickHouse reader")?
            .with_fee_table(ch.table.clone());
    info!(db = %ch.db, table = %ch.table, "Using ClickHouse fee table");
    Ok(with_cache(reader, ttl))
}

fn with_cache<S: FeeReports + 'static>(inner: S, ttl: Option<Duration>) -> Arc<dyn FeeReports> {
    match ttl {
        Some(ttl) => Arc::new(CachedReports::new(inner, ttl)),
        None => Arc::new(inner),
    }
}
