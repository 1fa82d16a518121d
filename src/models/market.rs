use crate::models::decimal::{self, fixed2};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One symbol on one trading day, as produced by the market feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketObservation {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub ltp: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    #[serde(default)]
    pub transactions: u64,
}

/// Observation read back from the raw daily table
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub observation: MarketObservation,
}

impl DailyObservation {
    pub fn history_point(&self) -> HistoryPoint {
        HistoryPoint {
            date: self.date,
            ltp: self.observation.ltp,
            volume: self.observation.volume,
            percent_change: self.observation.percent_change,
        }
    }
}

/// Price/volume point consumed by the feature extractors (oldest first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub ltp: f64,
    pub volume: f64,
    pub percent_change: Option<f64>,
}

/// Trailing-week performance of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAggregate {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub ltp: f64,
    pub volume: f64,
    /// Week-over-week change in percent, rounded to 2 decimals
    #[serde(with = "fixed2")]
    pub percent_change: f64,
    #[serde(default)]
    pub transactions: u64,
}

/// Latest realized price of a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualPrice {
    pub symbol: String,
    pub ltp: f64,
}

/// Mean weekly percent change per sector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorTrends(HashMap<String, f64>);

impl SectorTrends {
    pub fn from_aggregates(aggregates: &[WeeklyAggregate]) -> Self {
        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
        for aggregate in aggregates {
            let entry = sums.entry(aggregate.sector.clone()).or_insert((0.0, 0));
            entry.0 += aggregate.percent_change;
            entry.1 += 1;
        }
        Self(
            sums.into_iter()
                .map(|(sector, (sum, count))| (sector, sum / count as f64))
                .collect(),
        )
    }

    /// Trend for `sector`, 0 when the sector has no constituents this cycle
    pub fn get(&self, sector: &str) -> f64 {
        self.0.get(sector).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Daily per-sector roll-up written by the daily cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    pub sector: String,
    #[serde(with = "fixed2")]
    pub avg_change: f64,
    pub total_volume: f64,
}

impl SectorSummary {
    pub fn new(sector: String, avg_change: f64, total_volume: f64) -> Self {
        Self {
            sector,
            avg_change: decimal::round_to(avg_change, 2),
            total_volume,
        }
    }
}
