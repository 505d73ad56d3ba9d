//! Per-asset fee totals ranked by USD volume.

use std::collections::{BTreeMap, BTreeSet};

use clickhouse_lib::{TopAssetRow, round_token, round_usd};
use rust_decimal::Decimal;

use crate::normalize::NormalizedFee;

#[derive(Default)]
struct AssetTotals<'a> {
    usd: Decimal,
    tokens: Decimal,
    txs: u64,
    chains: BTreeSet<&'a str>,
}

/// Rank assets by total USD, highest first, keeping at most `top_n`.
///
/// Transfers without an asset are skipped. Equal totals are ordered by asset
/// name so the ranking is stable.
pub fn compute_top_assets(fees: &[NormalizedFee], top_n: u64) -> Vec<TopAssetRow> {
    let mut groups: BTreeMap<&str, AssetTotals<'_>> = BTreeMap::new();
    for fee in fees {
        let Some(asset) = fee.asset.as_deref() else { continue };
        let totals = groups.entry(asset).or_default();
        totals.usd += fee.amount_usd;
        totals.tokens += fee.amount_token;
        totals.txs += 1;
        totals.chains.insert(&fee.source_chain);
    }

    let mut ranked: Vec<_> = groups.into_iter().collect();
    // Ranking uses unrounded totals.
    ranked.sort_by(|(a_name, a), (b_name, b)| b.usd.cmp(&a.usd).then_with(|| a_name.cmp(b_name)));
    ranked.truncate(usize::try_from(top_n).unwrap_or(usize::MAX));

    ranked
        .into_iter()
        .map(|(asset, totals)| TopAssetRow {
            asset: asset.to_owned(),
            total_usd: round_usd(totals.usd),
            total_tokens: round_token(totals.tokens),
            total_txs: totals.txs,
            num_chains: totals.chains.len() as u64,
        })
        .collect()
}
