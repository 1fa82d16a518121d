//! Market feed interface and the HTTP JSON feed implementation.

use crate::error::{EngineError, Result};
use crate::models::decimal::parse_number;
use crate::models::market::MarketObservation;
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Source of the day's per-symbol market snapshot
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Latest snapshot; an empty list means no data this cycle
    async fn fetch_live_market_data(&self) -> Result<Vec<MarketObservation>>;
}

/// Feed returning a fixed snapshot (dry runs, tests)
#[derive(Default)]
pub struct StaticMarketFeed {
    observations: Vec<MarketObservation>,
}

impl StaticMarketFeed {
    pub fn new(observations: Vec<MarketObservation>) -> Self {
        Self { observations }
    }
}

#[async_trait]
impl MarketFeed for StaticMarketFeed {
    async fn fetch_live_market_data(&self) -> Result<Vec<MarketObservation>> {
        Ok(self.observations.clone())
    }
}

/// Feed backed by an HTTP endpoint returning a JSON array of observations.
///
/// Responses are cached for `cache_ttl` so repeated triggers within a few
/// minutes do not hit the upstream again.
pub struct HttpMarketFeed {
    url: String,
    client: reqwest::Client,
    cache_ttl: Duration,
    cache: RwLock<Option<(Instant, Vec<MarketObservation>)>>,
}

impl HttpMarketFeed {
    pub fn new(url: impl Into<String>, timeout: Duration, cache_ttl: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Feed(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(url, client, cache_ttl))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client, cache_ttl: Duration) -> Self {
        Self {
            url: url.into(),
            client,
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    async fn cached(&self) -> Option<Vec<MarketObservation>> {
        let cache = self.cache.read().await;
        match cache.as_ref() {
            Some((fetched_at, data)) if !data.is_empty() && fetched_at.elapsed() < self.cache_ttl => {
                Some(data.clone())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl MarketFeed for HttpMarketFeed {
    async fn fetch_live_market_data(&self) -> Result<Vec<MarketObservation>> {
        if let Some(data) = self.cached().await {
            debug!(count = data.len(), "HttpMarketFeed: serving cached snapshot");
            return Ok(data);
        }

        let items: Vec<Value> = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| EngineError::Feed(format!("Request to {} failed: {}", self.url, e)))?
            .json()
            .await
            .map_err(|e| EngineError::Feed(format!("Invalid feed payload: {}", e)))?;

        let observations = items
            .iter()
            .map(observation_from_json)
            .collect::<Result<Vec<_>>>()?;

        info!(count = observations.len(), url = %self.url, "HttpMarketFeed: fetched market snapshot");
        *self.cache.write().await = Some((Instant::now(), observations.clone()));
        Ok(observations)
    }
}

fn json_text(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn json_number(item: &Value, key: &str) -> Result<Option<f64>> {
    match item.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| EngineError::malformed(key, &n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("nan") => {
            Ok(None)
        }
        Some(Value::String(s)) => parse_number(s)
            .map(Some)
            .ok_or_else(|| EngineError::malformed(key, s)),
        Some(other) => Err(EngineError::malformed(key, &other.to_string())),
    }
}

/// Parse one feed item; numbers may arrive as text with thousands separators
pub fn observation_from_json(item: &Value) -> Result<MarketObservation> {
    let symbol = json_text(item, "symbol");
    if symbol.is_empty() {
        return Err(EngineError::MissingField("symbol".to_string()));
    }
    let ltp = json_number(item, "ltp")?.ok_or_else(|| EngineError::MissingField("ltp".to_string()))?;

    Ok(MarketObservation {
        symbol,
        company_name: json_text(item, "companyName"),
        sector: json_text(item, "sector"),
        ltp,
        volume: json_number(item, "volume")?.unwrap_or(0.0),
        percent_change: json_number(item, "percentChange")?,
        transactions: json_number(item, "transactions")?
            .map(|n| n.max(0.0) as u64)
            .unwrap_or(0),
    })
}
