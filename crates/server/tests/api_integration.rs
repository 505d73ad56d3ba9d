use std::{net::SocketAddr, sync::Arc, time::Duration};

use api::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
use axum::serve;
use chrono::{TimeZone, Utc};
use clickhouse::{
    Row,
    test::{Mock, handlers},
};
use clickhouse_lib::ClickhouseReader;
use report::{FeeReports, FeeTransaction, MemoryTable, ReportParams};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use server::{API_VERSION, router};
use tokio::{
    net::{TcpListener, TcpStream},
    time::{Instant, sleep},
};
use url::Url;

#[derive(Serialize, Row)]
struct TopRow {
    asset: String,
    total_usd: String,
    total_tokens: String,
    total_txs: u64,
    num_chains: u64,
}

#[derive(Serialize, Row)]
struct SeriesRow {
    date: String,
    asset: Option<String>,
    source_chain: String,
    daily_token_amount: String,
    daily_usd_amount: String,
    cumulative_token_amount: String,
    cumulative_usd_amount: String,
    transaction_count: u64,
}

fn params() -> ReportParams {
    ReportParams {
        fee_recipient: "fees.near".to_owned(),
        top_n: 20,
        series_start: None,
        series_limit: Some(1000),
    }
}

fn mock_reader(mock: &Mock) -> Arc<dyn FeeReports> {
    let url = Url::parse(mock.url()).unwrap();
    let client =
        ClickhouseReader::new(url, "test-db".to_owned(), "user".into(), "pass".into()).unwrap();
    Arc::new(client)
}

async fn spawn_server(reports: Arc<dyn FeeReports>) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let state = ApiState::new(reports, params(), DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD);
    let allowed = config::DEFAULT_ALLOWED_ORIGINS.split(',').map(|s| s.to_owned()).collect();
    let app = router(state, allowed);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
    });
    (addr, handle)
}

async fn wait_for_server(addr: SocketAddr) {
    let start = Instant::now();
    loop {
        if TcpStream::connect(addr).await.is_ok() {
            break;
        }
        if start.elapsed() > Duration::from_secs(5) {
            panic!("server did not start in time");
        }
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn top_assets_integration() {
    let mock = Mock::new();
    mock.add(handlers::provide(vec![TopRow {
        asset: "USDC".to_owned(),
        total_usd: "1500.25".to_owned(),
        total_tokens: "1500.25".to_owned(),
        total_txs: 12,
        num_chains: 3,
    }]));

    let (addr, server) = spawn_server(mock_reader(&mock)).await;
    wait_for_server(addr).await;

    let resp =
        reqwest::get(format!("http://{addr}/{API_VERSION}/fees/top-assets")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "assets": [
            { "asset": "USDC", "total_usd": "1500.25", "total_tokens": "1500.25", "total_txs": 12, "num_chains": 3 }
        ] })
    );

    server.abort();
}

#[tokio::test]
async fn daily_cumulative_integration() {
    let mock = Mock::new();
    mock.add(handlers::provide(vec![
        SeriesRow {
            date: "2025-01-02".to_owned(),
            asset: Some("USDC".to_owned()),
            source_chain: "eth".to_owned(),
            daily_token_amount: "5".to_owned(),
            daily_usd_amount: "5".to_owned(),
            cumulative_token_amount: "15".to_owned(),
            cumulative_usd_amount: "15".to_owned(),
            transaction_count: 1,
        },
        SeriesRow {
            date: "2025-01-01".to_owned(),
            asset: None,
            source_chain: "sol".to_owned(),
            daily_token_amount: "1".to_owned(),
            daily_usd_amount: "0.5".to_owned(),
            cumulative_token_amount: "1".to_owned(),
            cumulative_usd_amount: "0.5".to_owned(),
            transaction_count: 2,
        },
    ]));

    let (addr, server) = spawn_server(mock_reader(&mock)).await;
    wait_for_server(addr).await;

    let resp = reqwest::get(format!(
        "http://{addr}/{API_VERSION}/fees/daily-cumulative?since=2025-01-01&limit=10"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["rows"][0],
        json!({
            "date": "2025-01-02",
            "asset": "USDC",
            "source_chain": "eth",
            "daily_token_amount": "5",
            "daily_usd_amount": "5",
            "cumulative_token_amount": "15",
            "cumulative_usd_amount": "15",
            "transaction_count": 1
        })
    );
    assert_eq!(body["rows"][1]["asset"], Value::Null);

    server.abort();
}

#[tokio::test]
async fn database_error_integration() {
    let mock = Mock::new();
    mock.add(handlers::failure(clickhouse::test::status::INTERNAL_SERVER_ERROR));

    let (addr, server) = spawn_server(mock_reader(&mock)).await;
    wait_for_server(addr).await;

    let resp = reqwest::get(format!("http://{addr}/{API_VERSION}/fees/summary")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["type"], "database-error");

    server.abort();
}

#[tokio::test]
async fn csv_export_integration() {
    let table = MemoryTable::new(vec![FeeTransaction {
        symbol: Some("USDC".to_owned()),
        contract_address: None,
        source_chain: "eth".to_owned(),
        amount_token: Some(Decimal::new(12_345, 3)),
        amount_usd: Some(Decimal::new(12_345, 3)),
        block_timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        recipient: "fees.near".to_owned(),
    }]);

    let (addr, server) = spawn_server(Arc::new(table)).await;
    wait_for_server(addr).await;

    let resp = reqwest::get(format!("http://{addr}/{API_VERSION}/fees/top-assets?format=csv"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/csv; charset=utf-8");
    let text = resp.text().await.unwrap();
    assert_eq!(text, "asset,total_usd,total_tokens,total_txs,num_chains\nUSDC,12.35,12.345,1,1\n");

    let health = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    server.abort();
}
