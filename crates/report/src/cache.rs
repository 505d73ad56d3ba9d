//! Time based read-through cache over any report backend.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use clickhouse_lib::{DailyCumulativeRow, FeeSummary, TopAssetRow};
use eyre::Result;
use tracing::debug;

use crate::source::{FeeReports, ReportParams};

/// Upper bound on cached report results held at once.
pub const DEFAULT_MAX_CACHE_ENTRIES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ReportKind {
    Summary,
    TopAssets,
    DailyCumulative,
}

type CacheKey = (ReportKind, ReportParams);

#[derive(Debug, Clone)]
enum CachedValue {
    Summary(FeeSummary),
    TopAssets(Vec<TopAssetRow>),
    DailyCumulative(Vec<DailyCumulativeRow>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

/// Caches successful report results for a fixed time-to-live.
///
/// Failed lookups are never stored, so the next call retries the backend.
/// Once `max_entries` results are held the oldest one is evicted.
#[derive(Debug)]
pub struct CachedReports<S> {
    inner: S,
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl<S: FeeReports> CachedReports<S> {
    /// Cache results of `inner` for `ttl`.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            max_entries: DEFAULT_MAX_CACHE_ENTRIES,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Hold at most `max_entries` results (at least one).
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());
        match fresh {
            Some(_) => debug!(report = ?key.0, "Report cache hit"),
            None => {
                entries.remove(key);
            }
        }
        fresh
    }

    fn put(&self, key: CacheKey, value: CachedValue) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        while entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            debug!(report = ?oldest.0, "Evicting oldest report cache entry");
            entries.remove(&oldest);
        }
        entries.insert(key, CacheEntry { value, stored_at: Instant::now() });
    }
}

#[async_trait]
impl<S: FeeReports> FeeReports for CachedReports<S> {
    async fn summary(&self, params: &ReportParams) -> Result<FeeSummary> {
        let key = (ReportKind::Summary, params.clone());
        if let Some(CachedValue::Summary(summary)) = self.get(&key) {
            return Ok(summary);
        }
        let summary = self.inner.summary(params).await?;
        self.put(key, CachedValue::Summary(summary.clone()));
        Ok(summary)
    }

    async fn top_assets(&self, params: &ReportParams) -> Result<Vec<TopAssetRow>> {
        let key = (ReportKind::TopAssets, params.clone());
        if let Some(CachedValue::TopAssets(rows)) = self.get(&key) {
            return Ok(rows);
        }
        let rows = self.inner.top_assets(params).await?;
        self.put(key, CachedValue::TopAssets(rows.clone()));
        Ok(rows)
    }

    async fn daily_cumulative(&self, params: &ReportParams) -> Result<Vec<DailyCumulativeRow>> {
        let key = (ReportKind::DailyCumulative, params.clone());
        if let Some(CachedValue::DailyCumulative(rows)) = self.get(&key) {
            return Ok(rows);
        }
        let rows = self.inner.daily_cumulative(params).await?;
        self.put(key, CachedValue::DailyCumulative(rows.clone()));
        Ok(rows)
    }

    async fn backend_info(&self) -> Result<String> {
        self.inner.backend_info().await
    }
}
