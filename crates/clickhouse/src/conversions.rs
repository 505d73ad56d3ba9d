//! Rounding and derived summary fields shared by every report backend.

use chrono::{DateTime, LocalResult, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{FeeSummary, FeeSummaryTotals, FeeSummaryTotalsRow, TopAssetRow};

/// Decimal places of USD amounts.
pub const USD_DECIMALS: u32 = 2;
/// Decimal places of token amounts.
pub const TOKEN_DECIMALS: u32 = 6;

// Midpoints round away from zero, matching ClickHouse `round` on Decimal columns.
const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round a USD amount for presentation.
pub fn round_usd(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(USD_DECIMALS, ROUNDING)
}

/// Round a token amount for presentation.
pub fn round_token(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(TOKEN_DECIMALS, ROUNDING)
}

/// Number of calendar days between the first and last transfer, inclusive.
pub fn days_active(first: Option<DateTime<Utc>>, last: Option<DateTime<Utc>>) -> Option<u64> {
    let (first, last) = (first?, last?);
    let days = (last.date_naive() - first.date_naive()).num_days() + 1;
    u64::try_from(days).ok()
}

/// Average USD per active day, `None` instead of dividing by zero.
pub fn avg_daily_usd(total_usd: Option<Decimal>, days_active: Option<u64>) -> Option<Decimal> {
    let total = total_usd?;
    match days_active? {
        0 => None,
        days => total.checked_div(Decimal::from(days)).map(round_usd),
    }
}

/// Convert a unix timestamp in seconds to UTC.
pub fn timestamp_to_utc(ts: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(ts).ok()?;
    match Utc.timestamp_opt(secs, 0) {
        LocalResult::Single(dt) => Some(dt),
        _ => None,
    }
}

impl From<FeeSummaryTotalsRow> for FeeSummaryTotals {
    fn from(row: FeeSummaryTotalsRow) -> Self {
        Self {
            total_usd: row.total_usd,
            total_transactions: row.total_transactions,
            distinct_assets: row.distinct_assets,
            distinct_chains: row.distinct_chains,
            first_transaction: row.first_ts.and_then(timestamp_to_utc),
            last_transaction: row.last_ts.and_then(timestamp_to_utc),
            latest_day: row.latest_day,
            latest_day_usd: row.latest_day_usd,
            latest_day_transactions: row.latest_day_transactions,
        }
    }
}

impl FeeSummary {
    /// Assemble the summary from warehouse aggregates and the highest ranked asset.
    pub fn from_parts(totals: FeeSummaryTotalsRow, top: Option<TopAssetRow>) -> Self {
        Self::from_totals(totals.into(), top)
    }

    /// Assemble the summary from aggregate totals and the highest ranked asset,
    /// filling in the derived fields.
    pub fn from_totals(totals: FeeSummaryTotals, top: Option<TopAssetRow>) -> Self {
        let days_active = days_active(totals.first_transaction, totals.last_transaction);
        let (top_asset, top_asset_usd) = match top {
            Some(row) => (Some(row.asset), Some(row.total_usd)),
            None => (None, None),
        };

        Self {
            total_usd: totals.total_usd.map(round_usd),
            total_transactions: totals.total_transactions,
            distinct_assets: totals.distinct_assets,
            distinct_chains: totals.distinct_chains,
            first_transaction: totals.first_transaction,
            last_transaction: totals.last_transaction,
            latest_day: totals.latest_day,
            latest_day_usd: totals.latest_day_usd.map(round_usd),
            latest_day_transactions: totals.latest_day_transactions,
            top_asset,
            top_asset_usd,
            days_active,
            avg_daily_usd: avg_daily_usd(totals.total_usd, days_active),
        }
    }
}
