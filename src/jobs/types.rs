//! Cycle kinds and the reports they produce

use crate::models::evaluation::Evaluation;
use crate::models::market::{MarketObservation, SectorSummary, WeeklyAggregate};
use crate::models::prediction::{ModelWeights, Prediction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Daily,
    Weekly,
}

impl CycleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleKind::Daily => "daily",
            CycleKind::Weekly => "weekly",
        }
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CycleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(CycleKind::Daily),
            "weekly" => Ok(CycleKind::Weekly),
            other => Err(format!("unknown cycle '{}', expected 'daily' or 'weekly'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyReport {
    pub date: Option<NaiveDate>,
    pub observations: usize,
    pub top: Vec<MarketObservation>,
    pub sectors: Vec<SectorSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub date: NaiveDate,
    pub aggregates: Vec<WeeklyAggregate>,
    pub best: Vec<WeeklyAggregate>,
    pub worst: Vec<WeeklyAggregate>,
    pub evaluations: Vec<Evaluation>,
    pub predictions: Vec<Prediction>,
    pub weights: ModelWeights,
}

impl WeeklyReport {
    pub fn empty(date: NaiveDate, weights: ModelWeights) -> Self {
        Self {
            date,
            aggregates: Vec::new(),
            best: Vec::new(),
            worst: Vec::new(),
            evaluations: Vec::new(),
            predictions: Vec::new(),
            weights,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleReport {
    Daily(DailyReport),
    Weekly(WeeklyReport),
}
