//! Fee reports computed in process over a table of transfers.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use clickhouse_lib::{DailyCumulativeRow, FeeSummary, TopAssetRow};
use eyre::Result;
use tracing::info;

use crate::{
    normalize::{AssetResolution, normalize},
    record::{FeeTransaction, read_csv_file},
    series::compute_daily_cumulative,
    source::{FeeReports, ReportParams},
    summary::compute_summary,
    top_assets::compute_top_assets,
};

/// An immutable table of fee transfers.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Arc<Vec<FeeTransaction>>,
}

impl MemoryTable {
    /// Wrap an already loaded set of transfers.
    pub fn new(rows: Vec<FeeTransaction>) -> Self {
        Self { rows: Arc::new(rows) }
    }

    /// Load the table from a CSV file with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        read_csv_file(path).map(Self::new)
    }

    /// Number of transfers in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no transfers.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl FeeReports for MemoryTable {
    async fn summary(&self, params: &ReportParams) -> Result<FeeSummary> {
        let fees =
            normalize(&self.rows, &params.fee_recipient, None, AssetResolution::SymbolOnly);
        Ok(compute_summary(&fees))
    }

    async fn top_assets(&self, params: &ReportParams) -> Result<Vec<TopAssetRow>> {
        let fees =
            normalize(&self.rows, &params.fee_recipient, None, AssetResolution::SymbolOnly);
        Ok(compute_top_assets(&fees, params.top_n))
    }

    async fn daily_cumulative(&self, params: &ReportParams) -> Result<Vec<DailyCumulativeRow>> {
        let fees = normalize(
            &self.rows,
            &params.fee_recipient,
            params.series_start,
            AssetResolution::SymbolOrContract,
        );
        let rows = compute_daily_cumulative(&fees, params.series_limit);
        info!(input = fees.len(), rows = rows.len(), "Computed daily cumulative series");
        Ok(rows)
    }

    async fn backend_info(&self) -> Result<String> {
        Ok(format!("in-memory table with {} fee transfers", self.len()))
    }
}
