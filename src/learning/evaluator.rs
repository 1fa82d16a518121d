//! Scores matured predictions against realized prices and nudges the weights.

use crate::calendar;
use crate::config::EngineConfig;
use crate::db::rows::{evaluation_row, weight_rows};
use crate::db::{Table, TableStore};
use crate::error::Result;
use crate::learning::state::ModelState;
use crate::models::decimal::to_fixed;
use crate::models::evaluation::{Evaluation, LearningOutcome, PENDING_BATCH_UPDATE};
use crate::models::market::ActualPrice;
use crate::models::prediction::{ModelWeights, PastPrediction};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

/// Accumulated attribution of one evaluation batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchAdjustment {
    pub momentum: f64,
    pub volume: f64,
    pub sector: f64,
    pub matched: usize,
    pub total_abs_error: f64,
}

impl BatchAdjustment {
    pub fn mean_absolute_error(&self) -> Option<f64> {
        (self.matched > 0).then(|| self.total_abs_error / self.matched as f64)
    }
}

/// Signed relative error; positive when the realized price beat the prediction
pub fn prediction_error(predicted_price: f64, actual_price: f64) -> f64 {
    (actual_price - predicted_price) / actual_price
}

/// Score each prediction that has a realized price and accumulate the attribution.
///
/// Predictions without a matching symbol (or with a zero realized price) are skipped.
pub fn score_predictions(
    past: &[PastPrediction],
    actuals: &[ActualPrice],
    today: NaiveDate,
) -> (Vec<Evaluation>, BatchAdjustment) {
    let mut adjustment = BatchAdjustment::default();
    let mut evaluations = Vec::new();

    for prediction in past {
        let Some(actual) = actuals.iter().find(|a| a.symbol == prediction.symbol) else {
            debug!(symbol = %prediction.symbol, "no realized price, skipping evaluation");
            continue;
        };
        if actual.ltp == 0.0 || !actual.ltp.is_finite() {
            warn!(symbol = %prediction.symbol, ltp = actual.ltp, "unusable realized price, skipping evaluation");
            continue;
        }

        let error = prediction_error(prediction.predicted_price, actual.ltp);
        let abs_error = error.abs();
        adjustment.total_abs_error += abs_error;
        adjustment.matched += 1;

        adjustment.momentum += error * prediction.reason.momentum;
        adjustment.volume += error * prediction.reason.volume;
        adjustment.sector += error * prediction.reason.sector;

        evaluations.push(Evaluation {
            date: today,
            symbol: prediction.symbol.clone(),
            actual_outcome: actual.ltp,
            error_metric: format!("{}%", to_fixed(abs_error * 100.0, 2)),
            adjustment: PENDING_BATCH_UPDATE.to_string(),
        });
    }

    (evaluations, adjustment)
}

/// Apply the averaged batch adjustment (before renormalization)
pub fn apply_adjustment(weights: ModelWeights, adjustment: &BatchAdjustment, learning_rate: f64) -> ModelWeights {
    if adjustment.matched == 0 {
        return weights;
    }
    let count = adjustment.matched as f64;
    ModelWeights {
        momentum: weights.momentum + (adjustment.momentum / count) * learning_rate,
        volume: weights.volume + (adjustment.volume / count) * learning_rate,
        sector: weights.sector + (adjustment.sector / count) * learning_rate,
    }
}

pub struct ModelEvaluator {
    config: EngineConfig,
}

impl ModelEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Learning rate for a batch evaluated on `today`; halved when the week the
    /// predictions covered was interrupted by holidays
    pub fn effective_learning_rate(&self, today: NaiveDate) -> f64 {
        let period_start = today - Duration::days(7);
        if calendar::holiday_context(period_start).has_holiday {
            info!("Evaluation period was a holiday week, reducing learning rate");
            self.config.learning_rate * self.config.holiday_learning_factor
        } else {
            self.config.learning_rate
        }
    }

    /// Evaluate matured predictions, update and persist the weights.
    ///
    /// The weight read-modify-write and both persistence calls run under the
    /// exclusive weight lock. Weights are written before the evaluation ledger
    /// and the in-memory weights change only after the store accepted them.
    /// A batch already stored for `today` is not learned again; a run that
    /// stored the weights but failed on the ledger is completed by the next run.
    /// No match means no mutation and no store call.
    pub async fn evaluate_and_learn(
        &self,
        state: &ModelState,
        store: &dyn TableStore,
        past: &[PastPrediction],
        actuals: &[ActualPrice],
        today: NaiveDate,
    ) -> Result<LearningOutcome> {
        let (evaluations, adjustment) = score_predictions(past, actuals, today);
        if adjustment.matched == 0 {
            debug!(candidates = past.len(), "no predictions matched a realized price");
            return Ok(LearningOutcome::unchanged(state.snapshot().await));
        }

        let mut weights = state.lock_for_update().await;
        let mean_absolute_error = adjustment.mean_absolute_error();

        let weights_stored = store.has_batch(Table::ModelParams, today).await?;
        let ledger_stored = store.has_batch(Table::WeeklyEvaluation, today).await?;
        if weights_stored && ledger_stored {
            warn!(date = %today, "evaluation batch already recorded for this date, weights left unchanged");
            return Ok(LearningOutcome {
                evaluations,
                weights: *weights,
                mean_absolute_error,
                learning_rate: 0.0,
            });
        }

        let learning_rate = if weights_stored {
            warn!(date = %today, "weights already stored for this date, completing the evaluation ledger");
            0.0
        } else {
            let learning_rate = self.effective_learning_rate(today);
            let updated = apply_adjustment(*weights, &adjustment, learning_rate).normalized();
            store
                .append(Table::ModelParams, today, weight_rows(today, &updated))
                .await?;
            *weights = updated;
            learning_rate
        };

        let ledger = evaluations.iter().map(evaluation_row).collect();
        store.append(Table::WeeklyEvaluation, today, ledger).await?;

        let current = *weights;
        info!(
            matched = adjustment.matched,
            mean_error_pct = mean_absolute_error.unwrap_or(0.0) * 100.0,
            learning_rate,
            momentum = current.momentum,
            volume = current.volume,
            sector = current.sector,
            "Model evaluated, weights updated"
        );

        Ok(LearningOutcome {
            evaluations,
            weights: current,
            mean_absolute_error,
            learning_rate,
        })
    }
}

impl Default for ModelEvaluator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
