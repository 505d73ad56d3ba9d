use chrono::{DateTime, NaiveDate, Utc};
use clickhouse::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-asset fee totals, ranked by USD volume
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TopAssetRow {
    /// Token symbol
    pub asset: String,
    /// Total fees in USD, rounded to 2 decimals
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "1234.56")]
    pub total_usd: Decimal,
    /// Total fees in token units, rounded to 6 decimals
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "42.123456")]
    pub total_tokens: Decimal,
    /// Number of fee transfers
    pub total_txs: u64,
    /// Number of distinct source chains
    pub num_chains: u64,
}

/// One `(date, asset, source_chain)` bucket of the daily fee series with
/// running totals per asset
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct DailyCumulativeRow {
    /// UTC calendar day
    pub date: NaiveDate,
    /// Token symbol, or the contract identifier when the symbol is unknown
    pub asset: Option<String>,
    /// Originating chain
    pub source_chain: String,
    /// Token amount collected that day on that chain
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub daily_token_amount: Decimal,
    /// USD amount collected that day on that chain
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub daily_usd_amount: Decimal,
    /// Token amount collected for the asset up to and including `date`
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub cumulative_token_amount: Decimal,
    /// USD amount collected for the asset up to and including `date`
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub cumulative_usd_amount: Decimal,
    /// Number of fee transfers in the bucket
    pub transaction_count: u64,
}

/// Raw summary aggregates as returned by the warehouse.
///
/// Nullable columns are `NULL` when no fee transfer matched.
#[derive(Debug, Row, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeSummaryTotalsRow {
    /// Sum of USD amounts
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total_usd: Option<Decimal>,
    /// Number of fee transfers
    pub total_transactions: u64,
    /// Distinct assets
    pub distinct_assets: u64,
    /// Distinct source chains
    pub distinct_chains: u64,
    /// Unix timestamp of the first transfer
    pub first_ts: Option<u64>,
    /// Unix timestamp of the last transfer
    pub last_ts: Option<u64>,
    /// Most recent day with a transfer
    pub latest_day: Option<NaiveDate>,
    /// Sum of USD amounts on `latest_day`
    #[serde(with = "rust_decimal::serde::str_option")]
    pub latest_day_usd: Option<Decimal>,
    /// Number of transfers on `latest_day`
    pub latest_day_transactions: u64,
}

/// Summary aggregates with timestamps already resolved to UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeSummaryTotals {
    /// Sum of USD amounts
    pub total_usd: Option<Decimal>,
    /// Number of fee transfers
    pub total_transactions: u64,
    /// Distinct assets
    pub distinct_assets: u64,
    /// Distinct source chains
    pub distinct_chains: u64,
    /// Earliest transfer
    pub first_transaction: Option<DateTime<Utc>>,
    /// Latest transfer
    pub last_transaction: Option<DateTime<Utc>>,
    /// Most recent day with a transfer
    pub latest_day: Option<NaiveDate>,
    /// Sum of USD amounts on `latest_day`
    pub latest_day_usd: Option<Decimal>,
    /// Number of transfers on `latest_day`
    pub latest_day_transactions: u64,
}

/// Single-row fee revenue snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FeeSummary {
    /// Total fees in USD
    #[schema(value_type = Option<String>)]
    pub total_usd: Option<Decimal>,
    /// Number of fee transfers
    pub total_transactions: u64,
    /// Number of distinct assets
    pub distinct_assets: u64,
    /// Number of distinct source chains
    pub distinct_chains: u64,
    /// Time of the first fee transfer
    pub first_transaction: Option<DateTime<Utc>>,
    /// Time of the last fee transfer
    pub last_transaction: Option<DateTime<Utc>>,
    /// Most recent day with a fee transfer
    pub latest_day: Option<NaiveDate>,
    /// Fees in USD collected on `latest_day`
    #[schema(value_type = Option<String>)]
    pub latest_day_usd: Option<Decimal>,
    /// Fee transfers on `latest_day`
    pub latest_day_transactions: u64,
    /// Asset with the highest USD total
    pub top_asset: Option<String>,
    /// USD total of `top_asset`
    #[schema(value_type = Option<String>)]
    pub top_asset_usd: Option<Decimal>,
    /// Days between first and last transfer, inclusive
    pub days_active: Option<u64>,
    /// `total_usd / days_active`
    #[schema(value_type = Option<String>)]
    pub avg_daily_usd: Option<Decimal>,
}

/// Connection details reported by the warehouse
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerInfoRow {
    /// Server version
    pub version: String,
    /// Authenticated user
    pub user: String,
    /// Current database
    pub database: String,
}
