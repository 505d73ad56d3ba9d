//! Single-row fee revenue snapshot.

use std::collections::BTreeSet;

use clickhouse_lib::{FeeSummary, FeeSummaryTotals};
use rust_decimal::Decimal;

use crate::{normalize::NormalizedFee, top_assets::compute_top_assets};

/// Summarize all fee transfers.
///
/// Sums, dates and derived fields are `None` when `fees` is empty; counts are 0.
pub fn compute_summary(fees: &[NormalizedFee]) -> FeeSummary {
    let latest_day = fees.iter().map(|f| f.date).max();
    let on_latest_day = || fees.iter().filter(move |f| Some(f.date) == latest_day);

    let totals = FeeSummaryTotals {
        total_usd: sum_usd(fees.iter()),
        total_transactions: fees.len() as u64,
        distinct_assets: count_distinct(fees.iter().filter_map(|f| f.asset.as_deref())),
        distinct_chains: count_distinct(fees.iter().map(|f| f.source_chain.as_str())),
        first_transaction: fees.iter().map(|f| f.block_timestamp).min(),
        last_transaction: fees.iter().map(|f| f.block_timestamp).max(),
        latest_day,
        latest_day_usd: sum_usd(on_latest_day()),
        latest_day_transactions: on_latest_day().count() as u64,
    };

    let top = compute_top_assets(fees, 1).into_iter().next();
    FeeSummary::from_totals(totals, top)
}

// `None` over no rows, like SQL `sum`.
fn sum_usd<'a>(fees: impl Iterator<Item = &'a NormalizedFee>) -> Option<Decimal> {
    fees.fold(None, |acc, f| Some(acc.unwrap_or_default() + f.amount_usd))
}

fn count_distinct<'a>(values: impl Iterator<Item = &'a str>) -> u64 {
    values.collect::<BTreeSet<_>>().len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn fee(asset: &str, chain: &str, usd: &str, day: u32, hour: u32) -> NormalizedFee {
        let block_timestamp = Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap();
        NormalizedFee {
            asset: Some(asset.to_owned()),
            source_chain: chain.to_owned(),
            amount_token: Decimal::ONE,
            amount_usd: Decimal::from_str(usd).unwrap(),
            block_timestamp,
            date: block_timestamp.date_naive(),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_input_yields_single_null_row() {
        let summary = compute_summary(&[]);

        assert_eq!(summary.total_usd, None);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.distinct_assets, 0);
        assert_eq!(summary.distinct_chains, 0);
        assert_eq!(summary.first_transaction, None);
        assert_eq!(summary.last_transaction, None);
        assert_eq!(summary.latest_day, None);
        assert_eq!(summary.latest_day_usd, None);
        assert_eq!(summary.latest_day_transactions, 0);
        assert_eq!(summary.top_asset, None);
        assert_eq!(summary.days_active, None);
        assert_eq!(summary.avg_daily_usd, None);
    }

    #[test]
    fn summarizes_totals_and_latest_day() {
        let fees = vec![
            fee("USDC", "eth", "10", 1, 9),
            fee("USDC", "sol", "20", 3, 9),
            fee("wNEAR", "near", "5.555", 4, 1),
            fee("USDC", "eth", "4.445", 4, 23),
        ];

        let summary = compute_summary(&fees);

        assert_eq!(summary.total_usd, Some(dec("40")));
        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.distinct_assets, 2);
        assert_eq!(summary.distinct_chains, 3);
        assert_eq!(
            summary.first_transaction,
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap())
        );
        assert_eq!(
            summary.last_transaction,
            Some(Utc.with_ymd_and_hms(2025, 4, 4, 23, 0, 0).unwrap())
        );
        assert_eq!(summary.latest_day, NaiveDate::from_ymd_opt(2025, 4, 4));
        assert_eq!(summary.latest_day_usd, Some(dec("10")));
        assert_eq!(summary.latest_day_transactions, 2);
        assert_eq!(summary.top_asset.as_deref(), Some("USDC"));
        assert_eq!(summary.top_asset_usd, Some(dec("34.45")));
        assert_eq!(summary.days_active, Some(4));
        assert_eq!(summary.avg_daily_usd, Some(dec("10")));
    }

    #[test]
    fn keeps_exact_timestamps() {
        let mut early = fee("USDC", "eth", "1", 1, 0);
        early.block_timestamp = Utc.with_ymd_and_hms(1969, 12, 31, 8, 0, 0).unwrap();
        early.date = early.block_timestamp.date_naive();
        let mut late = fee("USDC", "eth", "1", 1, 0);
        late.block_timestamp = Utc.timestamp_millis_opt(86_400_250).unwrap();
        late.date = late.block_timestamp.date_naive();

        let summary = compute_summary(&[early.clone(), late.clone()]);

        assert_eq!(summary.first_transaction, Some(early.block_timestamp));
        assert_eq!(summary.last_transaction, Some(late.block_timestamp));
        assert_eq!(summary.days_active, Some(3));
    }

    #[test]
    fn single_transfer_is_active_for_one_day() {
        let summary = compute_summary(&[fee("USDC", "eth", "3", 2, 12)]);

        assert_eq!(summary.days_active, Some(1));
        assert_eq!(summary.avg_daily_usd, Some(dec("3")));
    }
}
