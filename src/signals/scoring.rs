//! Score normalization and classification

use crate::models::prediction::PredictionLabel;

/// Clamp a score to the -1 (bearish) .. +1 (bullish) range
pub fn clamp_score(value: f64) -> f64 {
    value.max(-1.0).min(1.0)
}

/// Normalize a sector trend in percent: a 5% sector move saturates the score
pub fn normalize_sector_trend(trend_pct: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }
    clamp_score(trend_pct / scale)
}

/// Strict threshold test; a score exactly on the threshold is Neutral
pub fn classify(raw_score: f64, threshold: f64) -> PredictionLabel {
    if raw_score > threshold {
        PredictionLabel::Growth
    } else if raw_score < -threshold {
        PredictionLabel::Downfall
    } else {
        PredictionLabel::Neutral
    }
}

/// Confidence is the magnitude of the ensemble score, optionally dampened
pub fn calculate_confidence(raw_score: f64, dampening: f64) -> f64 {
    raw_score.abs() * dampening
}
