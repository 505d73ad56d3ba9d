//! Fee transfer records as stored in the source table.

use std::{fs::File, io, path::Path};

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A single transfer from the intents dataset.
///
/// CSV files use the field names as headers; timestamps are RFC 3339 and
/// empty cells are read as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTransaction {
    /// Token symbol, when known
    pub symbol: Option<String>,
    /// Raw contract or account identifier of the token
    pub contract_address: Option<String>,
    /// Originating blockchain
    pub source_chain: String,
    /// Amount in token units
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount_token: Option<Decimal>,
    /// Amount in USD
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount_usd: Option<Decimal>,
    /// Block time of the transfer
    pub block_timestamp: DateTime<Utc>,
    /// Receiving account
    pub recipient: String,
}

/// Read every record of a CSV file with a header row.
pub fn read_csv_file(path: &Path) -> Result<Vec<FeeTransaction>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("failed to open fee data file {}", path.display()))?;
    let rows = read_csv(file)
        .wrap_err_with(|| format!("failed to read fee data file {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "Loaded fee transfers");
    Ok(rows)
}

/// Read every record from CSV input with a header row.
pub fn read_csv<R: io::Read>(input: R) -> Result<Vec<FeeTransaction>> {
    let mut reader = csv::Reader::from_reader(input);
    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| record.wrap_err_with(|| format!("invalid fee record {}", i + 1)))
        .collect()
}
