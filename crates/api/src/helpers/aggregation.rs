//! Chart aggregation over the daily & cumulative series

use std::collections::BTreeMap;

use api_types::{DailyTotalRow, DailyTotalsResponse};
use chrono::NaiveDate;
use clickhouse_lib::DailyCumulativeRow;
use rust_decimal::Decimal;

/// Number of spike days highlighted per metric.
pub const SPIKE_COUNT: usize = 3;

/// Collapse series rows into one row per day, in ascending date order.
pub fn aggregate_daily_totals(rows: &[DailyCumulativeRow]) -> Vec<DailyTotalRow> {
    let mut days: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();
    for row in rows {
        let (count, usd) = days.entry(row.date).or_default();
        *count += row.transaction_count;
        *usd += row.daily_usd_amount;
    }

    days.into_iter()
        .map(|(date, (transaction_count, usd_amount))| DailyTotalRow {
            date,
            transaction_count,
            usd_amount,
        })
        .collect()
}

/// The `n` days with the largest `key`, largest first. Ties keep the earlier day.
pub fn top_days<K, F>(days: &[DailyTotalRow], n: usize, key: F) -> Vec<DailyTotalRow>
where
    K: Ord,
    F: Fn(&DailyTotalRow) -> K,
{
    let mut ranked: Vec<&DailyTotalRow> = days.iter().collect();
    // Stable sort keeps ascending dates among equal keys.
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}

/// Build the chart feed for the dashboard: daily totals and spike days.
pub fn daily_totals_response(rows: &[DailyCumulativeRow]) -> DailyTotalsResponse {
    let days = aggregate_daily_totals(rows);
    let count_spikes = top_days(&days, SPIKE_COUNT, |d| d.transaction_count);
    let volume_spikes = top_days(&days, SPIKE_COUNT, |d| d.usd_amount);
    DailyTotalsResponse { days, count_spikes, volume_spikes }
}
