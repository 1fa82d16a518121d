use crate::models::prediction::ModelWeights;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PENDING_BATCH_UPDATE: &str = "Pending Batch Update";

/// Audit record of one matured prediction scored against the realized price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub date: NaiveDate,
    pub symbol: String,
    pub actual_outcome: f64,
    /// Absolute error in percent, e.g. "9.09%"
    pub error_metric: String,
    pub adjustment: String,
}

/// Result of one learning pass
#[derive(Debug, Clone, PartialEq)]
pub struct LearningOutcome {
    pub evaluations: Vec<Evaluation>,
    pub weights: ModelWeights,
    pub mean_absolute_error: Option<f64>,
    pub learning_rate: f64,
}

impl LearningOutcome {
    pub fn unchanged(weights: ModelWeights) -> Self {
        Self {
            evaluations: Vec::new(),
            weights,
            mean_absolute_error: None,
            learning_rate: 0.0,
        }
    }

    pub fn matched(&self) -> usize {
        self.evaluations.len()
    }
}
