//! Report rendering for stdout.

use std::io::Write;

use clap::ValueEnum;
use eyre::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Pretty printed JSON array
    Json,
    /// CSV with a header row
    Csv,
}

/// Write `rows` to `out` in the requested format.
pub(crate) fn write_rows<W: Write, T: Serialize>(
    mut out: W,
    format: OutputFormat,
    rows: &[T],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
