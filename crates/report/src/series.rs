//! Daily fee buckets with running totals per asset.
//!
//! Running totals are computed over date-ascending buckets first; the rows
//! are then re-sorted date-descending for presentation.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDate;
use clickhouse_lib::{DailyCumulativeRow, round_token, round_usd};
use rust_decimal::Decimal;

use crate::normalize::NormalizedFee;

#[derive(Debug, Default, Clone, Copy)]
struct Amounts {
    token: Decimal,
    usd: Decimal,
}

#[derive(Debug, Default)]
struct Bucket {
    daily: Amounts,
    count: u64,
}

#[derive(Debug)]
struct SeriesPoint<'a> {
    date: NaiveDate,
    asset: Option<&'a str>,
    source_chain: &'a str,
    daily: Amounts,
    cumulative: Amounts,
    count: u64,
}

/// Bucket fees by `(day, asset, source_chain)` and attach per-asset running totals.
///
/// Rows whose rounded daily and cumulative USD are both zero are dropped.
/// At most `limit` rows are returned when a limit is set.
pub fn compute_daily_cumulative(
    fees: &[NormalizedFee],
    limit: Option<u64>,
) -> Vec<DailyCumulativeRow> {
    // Keyed by asset, then date, so each asset partition is contiguous and date-ascending.
    let mut buckets: BTreeMap<(Option<&str>, NaiveDate, &str), Bucket> = BTreeMap::new();
    for fee in fees {
        let key = (fee.asset.as_deref(), fee.date, fee.source_chain.as_str());
        let bucket = buckets.entry(key).or_default();
        bucket.daily.token += fee.amount_token;
        bucket.daily.usd += fee.amount_usd;
        bucket.count += 1;
    }

    let mut points = running_totals(&buckets);
    points.retain(|p| !(round_usd(p.daily.usd).is_zero() && round_usd(p.cumulative.usd).is_zero()));
    points.sort_by(presentation_order);
    if let Some(limit) = limit {
        points.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    points
        .into_iter()
        .map(|p| DailyCumulativeRow {
            date: p.date,
            asset: p.asset.map(ToOwned::to_owned),
            source_chain: p.source_chain.to_owned(),
            daily_token_amount: round_token(p.daily.token),
            daily_usd_amount: round_usd(p.daily.usd),
            cumulative_token_amount: round_token(p.cumulative.token),
            cumulative_usd_amount: round_usd(p.cumulative.usd),
            transaction_count: p.count,
        })
        .collect()
}

/// Running totals per asset in ascending date order. All chains of an asset on
/// the same day share the total up to and including that day.
fn running_totals<'a>(
    buckets: &BTreeMap<(Option<&'a str>, NaiveDate, &'a str), Bucket>,
) -> Vec<SeriesPoint<'a>> {
    let mut points = Vec::with_capacity(buckets.len());
    let mut entries = buckets.iter().peekable();
    let mut partition: Option<Option<&str>> = None;
    let mut running = Amounts::default();

    while let Some(&(&(asset, date, _), _)) = entries.peek() {
        if partition != Some(asset) {
            partition = Some(asset);
            running = Amounts::default();
        }

        let mut same_day = Vec::new();
        while let Some(((a, d, chain), bucket)) =
            entries.next_if(|((a, d, _), _)| *a == asset && *d == date)
        {
            running.token += bucket.daily.token;
            running.usd += bucket.daily.usd;
            same_day.push((*a, *d, *chain, bucket));
        }

        points.extend(same_day.into_iter().map(|(asset, date, source_chain, bucket)| {
            SeriesPoint {
                date,
                asset,
                source_chain,
                daily: bucket.daily,
                cumulative: running,
                count: bucket.count,
            }
        }));
    }

    points
}

/// Date descending, daily USD descending, then asset (unknown last) and chain.
fn presentation_order(a: &SeriesPoint<'_>, b: &SeriesPoint<'_>) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.daily.usd.cmp(&a.daily.usd))
        .then_with(|| a.asset.is_none().cmp(&b.asset.is_none()))
        .then_with(|| a.asset.cmp(&b.asset))
        .then_with(|| a.source_chain.cmp(b.source_chain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn fee(asset: Option<&str>, chain: &str, token: &str, usd: &str, day: u32) -> NormalizedFee {
        let block_timestamp = Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap();
        NormalizedFee {
            asset: asset.map(ToOwned::to_owned),
            source_chain: chain.to_owned(),
            amount_token: Decimal::from_str(token).unwrap(),
            amount_usd: Decimal::from_str(usd).unwrap(),
            block_timestamp,
            date: block_timestamp.date_naive(),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn cumulative_follows_ascending_dates_while_output_is_descending() {
        let fees = vec![
            fee(Some("X"), "eth", "1", "10", 1),
            fee(Some("X"), "eth", "2", "5", 2),
            fee(Some("X"), "eth", "3", "1", 3),
        ];

        let rows = compute_daily_cumulative(&fees, None);

        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        let cumulative: Vec<_> = rows.iter().map(|r| r.cumulative_usd_amount).collect();
        assert_eq!(cumulative, vec![dec("16"), dec("15"), dec("10")]);
        assert_eq!(rows[0].cumulative_token_amount, dec("6"));
    }

    #[test]
    fn chains_on_the_same_day_share_the_running_total() {
        let fees = vec![
            fee(Some("X"), "eth", "1", "10", 1),
            fee(Some("X"), "sol", "1", "4", 2),
            fee(Some("X"), "eth", "1", "6", 2),
            fee(Some("X"), "eth", "1", "1", 2),
        ];

        let rows = compute_daily_cumulative(&fees, None);

        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].source_chain.as_str(), rows[0].daily_usd_amount), ("eth", dec("7")));
        assert_eq!(rows[0].transaction_count, 2);
        assert_eq!((rows[1].source_chain.as_str(), rows[1].daily_usd_amount), ("sol", dec("4")));
        assert_eq!(rows[0].cumulative_usd_amount, dec("21"));
        assert_eq!(rows[1].cumulative_usd_amount, dec("21"));
        assert_eq!(rows[2].cumulative_usd_amount, dec("10"));
    }

    #[test]
    fn partitions_are_independent_per_asset() {
        let fees = vec![
            fee(Some("X"), "eth", "1", "10", 1),
            fee(Some("Y"), "eth", "1", "3", 1),
            fee(Some("Y"), "eth", "1", "3", 2),
        ];

        let rows = compute_daily_cumulative(&fees, None);

        let y_last = rows.iter().find(|r| r.asset.as_deref() == Some("Y") && r.date == day(2));
        assert_eq!(y_last.unwrap().cumulative_usd_amount, dec("6"));
        let x = rows.iter().find(|r| r.asset.as_deref() == Some("X")).unwrap();
        assert_eq!(x.cumulative_usd_amount, dec("10"));
    }

    #[test]
    fn drops_rows_with_zero_daily_and_cumulative_usd() {
        let fees = vec![
            fee(Some("X"), "eth", "0", "10", 1),
            fee(Some("X"), "eth", "0", "5", 2),
            fee(Some("Y"), "eth", "0", "0", 1),
            fee(Some("Z"), "eth", "0", "0.004", 1),
        ];

        let rows = compute_daily_cumulative(&fees, None);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.asset.as_deref() == Some("X")));
    }

    #[test]
    fn keeps_zero_days_after_earlier_revenue() {
        let fees = vec![fee(Some("X"), "eth", "1", "10", 1), fee(Some("X"), "eth", "1", "0", 2)];

        let rows = compute_daily_cumulative(&fees, None);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].daily_usd_amount, Decimal::ZERO);
        assert_eq!(rows[0].cumulative_usd_amount, dec("10"));
    }

    #[test]
    fn same_day_rows_order_by_daily_usd_then_unknown_asset_last() {
        let fees = vec![
            fee(None, "eth", "1", "5", 1),
            fee(Some("A"), "eth", "1", "5", 1),
            fee(Some("B"), "eth", "1", "9", 1),
        ];

        let rows = compute_daily_cumulative(&fees, None);

        let assets: Vec<_> = rows.iter().map(|r| r.asset.as_deref()).collect();
        assert_eq!(assets, vec![Some("B"), Some("A"), None]);
    }

    #[test]
    fn rounds_amounts_for_presentation() {
        let fees = vec![fee(Some("X"), "eth", "1.2345678", "12.345", 1)];

        let rows = compute_daily_cumulative(&fees, None);

        assert_eq!(rows[0].daily_usd_amount.to_string(), "12.35");
        assert_eq!(rows[0].daily_token_amount.to_string(), "1.234568");
    }

    #[test]
    fn limit_caps_rows_after_sorting() {
        let fees: Vec<_> = (1..=10).map(|d| fee(Some("X"), "eth", "1", "1", d)).collect();

        let rows = compute_daily_cumulative(&fees, Some(3));

        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(10), day(9), day(8)]);
        assert_eq!(rows[0].cumulative_usd_amount, dec("10"));
    }
}
