//! API server binary

use std::net::SocketAddr;

use api::ApiState;
use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use report::ReportParams;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let reports = report::open(&opts.source)?;
    let params = ReportParams::from(&opts.report);
    info!(
        recipient = %params.fee_recipient,
        top_n = params.top_n,
        series_limit = ?params.series_limit,
        "Serving fee reports"
    );

    let state = ApiState::new(reports, params, opts.api.max_requests, opts.api.rate_period());
    let addr: SocketAddr = format!("{}:{}", opts.api.host, opts.api.port).parse()?;
    server::run(addr, state, opts.api.allowed_origins()).await
}
