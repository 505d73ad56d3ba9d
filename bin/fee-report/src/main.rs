//! One-shot fee report CLI.

mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::{ReportOpts, SourceOpts};
use dotenvy::dotenv;
use output::{OutputFormat, write_rows};
use report::ReportParams;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

/// Print intents fee revenue reports.
#[derive(Debug, Parser)]
#[clap(name = "fee-report", version)]
struct Cli {
    /// Fee transaction source
    #[clap(flatten)]
    source: SourceOpts,

    /// Fee report configuration
    #[clap(flatten)]
    report: ReportOpts,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals, latest day activity and the top asset
    Summary,
    /// Assets ranked by USD fee volume
    TopAssets {
        /// Number of assets (at most the configured top N)
        #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },
    /// Daily buckets per asset and chain with running totals
    DailyCumulative {
        /// First day (UTC) to include
        #[clap(long)]
        since: Option<NaiveDate>,
        /// Row cap (0 = unbounded, defaults to the configured row limit)
        #[clap(long)]
        limit: Option<u64>,
    },
    /// Check that the fee source is reachable
    Check,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        dotenv().ok();
    }

    let cli = Cli::parse();
    // Logs go to stderr so stdout only carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let reports = report::open(&cli.source)?;
    let params = ReportParams::from(&cli.report);
    let stdout = std::io::stdout().lock();

    match cli.command {
        Command::Summary => {
            let summary = reports.summary(&params).await?;
            write_rows(stdout, cli.format, &[summary])?;
        }
        Command::TopAssets { limit } => {
            let params = ReportParams { top_n: top_assets_limit(limit, params.top_n), ..params };
            let rows = reports.top_assets(&params).await?;
            info!(count = rows.len(), "Fetched top assets");
            write_rows(stdout, cli.format, &rows)?;
        }
        Command::DailyCumulative { since, limit } => {
            let params = ReportParams {
                series_start: since.or(params.series_start),
                series_limit: match limit {
                    Some(0) => None,
                    Some(limit) => Some(limit),
                    None => params.series_limit,
                },
                ..params
            };
            let rows = reports.daily_cumulative(&params).await?;
            info!(count = rows.len(), "Fetched daily cumulative fees");
            write_rows(stdout, cli.format, &rows)?;
        }
        Command::Check => {
            let backend = reports.backend_info().await?;
            println!("OK: {backend}");
        }
    }
    Ok(())
}

// Same cap as the HTTP route: never more than the configured top N.
fn top_assets_limit(limit: Option<u64>, top_n: u64) -> u64 {
    limit.map_or(top_n, |limit| limit.min(top_n))
}
