//! Fee recipient filtering and per-row normalization.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::record::FeeTransaction;

/// How the asset of a transfer is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetResolution {
    /// Only the token symbol; transfers without one are dropped.
    SymbolOnly,
    /// The token symbol, falling back to the contract identifier.
    SymbolOrContract,
}

/// A fee transfer with nulls coalesced and its day bucket derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFee {
    pub asset: Option<String>,
    pub source_chain: String,
    pub amount_token: Decimal,
    pub amount_usd: Decimal,
    pub block_timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

/// Keep transfers to `recipient` made on or after `since` and normalize them.
pub fn normalize(
    rows: &[FeeTransaction],
    recipient: &str,
    since: Option<NaiveDate>,
    resolution: AssetResolution,
) -> Vec<NormalizedFee> {
    rows.iter()
        .filter(|row| row.recipient == recipient)
        .filter_map(|row| {
            let date = row.block_timestamp.date_naive();
            if since.is_some_and(|cutoff| date < cutoff) {
                return None;
            }
            let asset = match resolution {
                AssetResolution::SymbolOnly => Some(row.symbol.clone()?),
                AssetResolution::SymbolOrContract => {
                    row.symbol.clone().or_else(|| row.contract_address.clone())
                }
            };
            Some(NormalizedFee {
                asset,
                source_chain: row.source_chain.clone(),
                amount_token: row.amount_token.unwrap_or_default(),
                amount_usd: row.amount_usd.unwrap_or_default(),
                block_timestamp: row.block_timestamp,
                date,
            })
        })
        .collect()
}
