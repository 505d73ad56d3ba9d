//! `ClickHouse` access for intents fee analytics.
//!
//! Holds the report row models shared by every backend, the presentation
//! rounding rules and the SQL reader that pushes aggregation into the
//! warehouse.

pub mod conversions;
pub mod models;
pub mod reader;

pub use conversions::{
    TOKEN_DECIMALS, USD_DECIMALS, avg_daily_usd, days_active, round_token, round_usd,
    timestamp_to_utc,
};
pub use models::{
    DailyCumulativeRow, FeeSummary, FeeSummaryTotals, FeeSummaryTotalsRow, ServerInfoRow, TopAssetRow,
};
pub use reader::{ClickhouseReader, DEFAULT_FEE_TABLE};
