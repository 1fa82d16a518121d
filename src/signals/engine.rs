//! Weekly prediction engine: feature scores, sector beta and holiday dampening
//! combined into an ensemble score, a direction label and a projected price.

use crate::calendar;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::indicators::{calculate_momentum_with, calculate_volume_score_with};
use crate::models::decimal::round_to;
use crate::models::market::{HistoryPoint, WeeklyAggregate};
use crate::models::prediction::{ModelWeights, Prediction, PredictionReason};
use crate::signals::scoring::{calculate_confidence, classify, normalize_sector_trend};
use chrono::NaiveDate;

/// Component scores before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub momentum: f64,
    pub volume: f64,
    pub sector: f64,
}

pub struct PredictionEngine {
    config: EngineConfig,
}

impl PredictionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn component_scores(&self, history: &[HistoryPoint], sector_trend: f64) -> ComponentScores {
        ComponentScores {
            momentum: calculate_momentum_with(
                history,
                self.config.feature_window,
                self.config.momentum_scale,
            ),
            volume: calculate_volume_score_with(
                history,
                self.config.feature_window,
                self.config.volume_step,
            ),
            sector: normalize_sector_trend(sector_trend, self.config.sector_scale),
        }
    }

    /// Weighted ensemble of the component scores
    pub fn ensemble_score(
        &self,
        scores: &ComponentScores,
        weights: &ModelWeights,
        sector_beta: f64,
        holiday_dampener: f64,
    ) -> f64 {
        scores.momentum * weights.momentum * sector_beta
            + scores.volume * weights.volume * holiday_dampener
            + scores.sector * weights.sector
    }

    /// Predict next-week direction and price for one symbol.
    ///
    /// `today` drives the holiday context; identical inputs give identical output.
    pub fn predict(
        &self,
        stock: &WeeklyAggregate,
        history: &[HistoryPoint],
        sector_trend: f64,
        weights: &ModelWeights,
        today: NaiveDate,
    ) -> Result<Prediction> {
        validate_inputs(stock, history, sector_trend)?;

        let scores = self.component_scores(history, sector_trend);
        let sector_beta = self.config.sector_betas.get(&stock.sector);

        let holiday = calendar::holiday_context(today);
        let (holiday_dampener, holiday_note) = if holiday.has_holiday {
            (self.config.holiday_dampener, holiday.note.clone())
        } else {
            (1.0, None)
        };

        let raw_score = self.ensemble_score(&scores, weights, sector_beta, holiday_dampener);
        let prediction = classify(raw_score, self.config.classification_threshold);

        let confidence_factor = if holiday.has_holiday {
            self.config.holiday_confidence_factor
        } else {
            1.0
        };
        let confidence = calculate_confidence(raw_score, confidence_factor);

        let projected_change = raw_score * self.config.max_projected_move * holiday_dampener;
        let predicted_price = stock.ltp * (1.0 + projected_change);

        Ok(Prediction {
            symbol: stock.symbol.clone(),
            company_name: stock.company_name.clone(),
            sector: stock.sector.clone(),
            prediction,
            confidence: round_to(confidence * 100.0, 1),
            predicted_price: round_to(predicted_price, 2),
            raw_score,
            reason: PredictionReason {
                momentum: round_to(scores.momentum, 2),
                volume: round_to(scores.volume, 2),
                sector: round_to(scores.sector, 2),
                weights: *weights,
                note: holiday_note.map(|note| format!("Market: ({})", note)),
                holiday_effect: holiday.has_holiday,
            },
        })
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn validate_inputs(stock: &WeeklyAggregate, history: &[HistoryPoint], sector_trend: f64) -> Result<()> {
    ensure_finite("ltp", stock.ltp)?;
    ensure_finite("sectorTrend", sector_trend)?;
    for point in history {
        ensure_finite("ltp", point.ltp)?;
        ensure_finite("volume", point.volume)?;
        if let Some(change) = point.percent_change {
            ensure_finite("percentChange", change)?;
        }
    }
    Ok(())
}

fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::malformed(field, &value.to_string()))
    }
}
