//! `ClickHouse` reader functionality for API
//! Handles read-only fee analytics queries

use chrono::NaiveDate;
use clickhouse::{Client, Row};
use derive_more::Debug;
use eyre::{Context, Result};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error};
use url::Url;

use crate::models::{
    DailyCumulativeRow, FeeSummary, FeeSummaryTotalsRow, ServerInfoRow, TopAssetRow,
};

/// Table read when no other one is configured.
pub const DEFAULT_FEE_TABLE: &str = "intents_fee_transfers";

/// `ClickHouse` reader client for API (read-only operations)
#[derive(Clone, Debug)]
pub struct ClickhouseReader {
    /// Base client
    #[debug(skip)]
    base: Client,
    /// Database name
    db_name: String,
    /// Table holding the fee transfers
    table: String,
}

impl ClickhouseReader {
    /// Create a new `ClickHouse` reader client
    pub fn new(url: Url, db_name: String, username: String, password: String) -> Result<Self> {
        let client = Client::default()
            .with_url(url)
            .with_database(db_name.clone())
            .with_user(username)
            .with_password(password);

        Ok(Self { base: client, db_name, table: DEFAULT_FEE_TABLE.to_owned() })
    }

    /// Read fee transfers from `table` instead of [`DEFAULT_FEE_TABLE`].
    pub fn with_fee_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    async fn execute<R>(&self, query: &str, binds: &[&str]) -> Result<Vec<R>>
    where
        R: Row + for<'b> Deserialize<'b>,
    {
        let mut q = self.base.query(query);
        for value in binds {
            q = q.bind(*value);
        }
        let start = Instant::now();

        let result = q.fetch_all::<R>().await;

        let duration_ms = start.elapsed().as_millis();
        match &result {
            Ok(rows) => {
                debug!(query = %query, duration_ms, rows = rows.len(), "ClickHouse query executed")
            }
            Err(e) => error!(query = %query, duration_ms, error = %e, "ClickHouse query failed"),
        }
        result.map_err(Into::into)
    }

    fn source(&self) -> String {
        format!("{}.{}", self.db_name, self.table)
    }

    /// Get summary statistics over every fee transfer with a known symbol.
    pub async fn get_fee_summary(&self, recipient: &str) -> Result<FeeSummary> {
        let query = summary_query(&self.source());
        let totals = self
            .execute::<FeeSummaryTotalsRow>(&query, &[recipient, recipient])
            .await
            .context("fetching fee summary totals failed")?
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("fee summary query returned no row"))?;

        let top = self.get_top_assets(recipient, 1).await?.into_iter().next();
        Ok(FeeSummary::from_parts(totals, top))
    }

    /// Get the `limit` assets with the highest USD fee totals.
    ///
    /// Ties are ordered by asset name.
    pub async fn get_top_assets(&self, recipient: &str, limit: u64) -> Result<Vec<TopAssetRow>> {
        let query = top_assets_query(&self.source(), limit);
        self.execute(&query, &[recipient]).await.context("fetching top assets failed")
    }

    /// Get daily fee buckets per asset and chain with running totals per asset.
    ///
    /// Results are ordered by date descending, then by daily USD amount descending.
    pub async fn get_daily_cumulative(
        &self,
        recipient: &str,
        since: Option<NaiveDate>,
        limit: Option<u64>,
    ) -> Result<Vec<DailyCumulativeRow>> {
        let query = daily_cumulative_query(&self.source(), since.is_some(), limit);
        let since = since.map(|d| d.format("%Y-%m-%d").to_string());
        let mut binds = vec![recipient];
        if let Some(since) = since.as_deref() {
            binds.push(since);
        }
        self.execute(&query, &binds).await.context("fetching daily cumulative fees failed")
    }

    /// Get version, user and database of the connected server.
    pub async fn get_server_info(&self) -> Result<Option<ServerInfoRow>> {
        let query = "SELECT version() AS version, currentUser() AS user, \
                     currentDatabase() AS database";
        let rows = self.execute::<ServerInfoRow>(query, &[]).await?;
        Ok(rows.into_iter().next())
    }
}

fn summary_query(source: &str) -> String {
    format!(
        "WITH ( \
            SELECT max(toDate(block_timestamp)) \
            FROM {source} \
            WHERE recipient = ? AND symbol IS NOT NULL \
         ) AS latest \
         SELECT toString(sumOrNull(ifNull(amount_usd, 0))) AS total_usd, \
                count() AS total_transactions, \
                uniqExact(symbol) AS distinct_assets, \
                uniqExact(source_chain) AS distinct_chains, \
                toUInt64(toUnixTimestamp(minOrNull(block_timestamp))) AS first_ts, \
                toUInt64(toUnixTimestamp(maxOrNull(block_timestamp))) AS last_ts, \
                toString(maxOrNull(toDate(block_timestamp))) AS latest_day, \
                toString(sumIfOrNull(ifNull(amount_usd, 0), toDate(block_timestamp) = latest)) \
                    AS latest_day_usd, \
                countIf(toDate(block_timestamp) = latest) AS latest_day_transactions \
         FROM {source} \
         WHERE recipient = ? AND symbol IS NOT NULL"
    )
}

fn top_assets_query(source: &str, limit: u64) -> String {
    format!(
        "SELECT assumeNotNull(symbol) AS asset, \
                toString(round(sum(ifNull(amount_usd, 0)), 2)) AS total_usd, \
                toString(round(sum(ifNull(amount_token, 0)), 6)) AS total_tokens, \
                count() AS total_txs, \
                uniqExact(source_chain) AS num_chains \
         FROM {source} \
         WHERE recipient = ? AND symbol IS NOT NULL \
         GROUP BY asset \
         ORDER BY sum(ifNull(amount_usd, 0)) DESC, asset ASC \
         LIMIT {limit}"
    )
}

fn daily_cumulative_query(source: &str, with_cutoff: bool, limit: Option<u64>) -> String {
    let cutoff = if with_cutoff { " AND toDate(block_timestamp) >= toDate(?)" } else { "" };
    let limit = limit.map(|l| format!(" LIMIT {l}")).unwrap_or_default();
    format!(
        "SELECT toString(day) AS date, \
                asset, \
                source_chain, \
                toString(round(daily_token, 6)) AS daily_token_amount, \
                toString(round(daily_usd, 2)) AS daily_usd_amount, \
                toString(round(cumulative_token, 6)) AS cumulative_token_amount, \
                toString(round(cumulative_usd, 2)) AS cumulative_usd_amount, \
                transaction_count \
         FROM ( \
            SELECT day, asset, source_chain, daily_token, daily_usd, transaction_count, \
                   sum(daily_token) OVER (PARTITION BY asset ORDER BY day ASC) AS cumulative_token, \
                   sum(daily_usd) OVER (PARTITION BY asset ORDER BY day ASC) AS cumulative_usd \
            FROM ( \
                SELECT toDate(block_timestamp) AS day, \
                       coalesce(symbol, contract_address) AS asset, \
                       source_chain, \
                       sum(ifNull(amount_token, 0)) AS daily_token, \
                       sum(ifNull(amount_usd, 0)) AS daily_usd, \
                       count() AS transaction_count \
                FROM {source} \
                WHERE recipient = ?{cutoff} \
                GROUP BY day, asset, source_chain \
            ) \
         ) \
         WHERE NOT (round(daily_usd, 2) = 0 AND round(cumulative_usd, 2) = 0) \
         ORDER BY day DESC, daily_usd DESC, asset ASC, source_chain ASC{limit}"
    )
}
