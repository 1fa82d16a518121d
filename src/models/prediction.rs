use crate::models::decimal::{fixed1, fixed2};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction label of a weekly prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionLabel {
    Growth,
    Downfall,
    Neutral,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Growth => "Growth",
            PredictionLabel::Downfall => "Downfall",
            PredictionLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Ensemble weights; the only long-lived model state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub momentum: f64,
    pub volume: f64,
    pub sector: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            momentum: 0.4,
            volume: 0.3,
            sector: 0.3,
        }
    }
}

impl ModelWeights {
    pub const MOMENTUM: &'static str = "momentum";
    pub const VOLUME: &'static str = "volume";
    pub const SECTOR: &'static str = "sector";

    pub fn abs_sum(&self) -> f64 {
        self.momentum.abs() + self.volume.abs() + self.sector.abs()
    }

    /// Scale so the absolute values sum to 1; unchanged when they sum to 0
    pub fn normalized(self) -> Self {
        let total = self.abs_sum();
        if total > 0.0 {
            Self {
                momentum: self.momentum / total,
                volume: self.volume / total,
                sector: self.sector / total,
            }
        } else {
            self
        }
    }

    /// Set a component by its persisted parameter name; unknown names are ignored
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match name {
            Self::MOMENTUM => self.momentum = value,
            Self::VOLUME => self.volume = value,
            Self::SECTOR => self.sector = value,
            _ => return false,
        }
        true
    }

    pub fn components(&self) -> [(&'static str, f64); 3] {
        [
            (Self::MOMENTUM, self.momentum),
            (Self::VOLUME, self.volume),
            (Self::SECTOR, self.sector),
        ]
    }
}

/// Component scores and weights behind a prediction, kept for attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReason {
    #[serde(default, with = "fixed2")]
    pub momentum: f64,
    #[serde(default, with = "fixed2")]
    pub volume: f64,
    #[serde(default, with = "fixed2")]
    pub sector: f64,
    #[serde(default)]
    pub weights: ModelWeights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub holiday_effect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub symbol: String,
    pub company_name: String,
    pub sector: String,
    pub prediction: PredictionLabel,
    /// Percent, one decimal
    #[serde(with = "fixed1")]
    pub confidence: f64,
    #[serde(with = "fixed2")]
    pub predicted_price: f64,
    pub raw_score: f64,
    pub reason: PredictionReason,
}

/// Prediction read back from the store for evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct PastPrediction {
    pub date: NaiveDate,
    pub symbol: String,
    pub predicted_price: f64,
    pub reason: PredictionReason,
}

impl PastPrediction {
    pub fn from_prediction(date: NaiveDate, prediction: &Prediction) -> Self {
        Self {
            date,
            symbol: prediction.symbol.clone(),
            predicted_price: prediction.predicted_price,
            reason: prediction.reason.clone(),
        }
    }
}
