//! Unit tests for score normalization and classification

use nepse_pulse::models::prediction::PredictionLabel;
use nepse_pulse::signals::scoring::{
    calculate_confidence, clamp_score, classify, normalize_sector_trend,
};

#[test]
fn clamp_keeps_scores_in_range() {
    assert_eq!(clamp_score(1.5), 1.0);
    assert_eq!(clamp_score(-3.0), -1.0);
    assert_eq!(clamp_score(0.42), 0.42);
}

#[test]
fn sector_trend_saturates_at_five_percent() {
    assert_eq!(normalize_sector_trend(2.5, 5.0), 0.5);
    assert_eq!(normalize_sector_trend(12.0, 5.0), 1.0);
    assert_eq!(normalize_sector_trend(-7.5, 5.0), -1.0);
    assert_eq!(normalize_sector_trend(3.0, 0.0), 0.0);
}

#[test]
fn threshold_is_strict() {
    assert_eq!(classify(0.2, 0.2), PredictionLabel::Neutral);
    assert_eq!(classify(-0.2, 0.2), PredictionLabel::Neutral);
    assert_eq!(classify(0.0, 0.2), PredictionLabel::Neutral);
    assert_eq!(classify(0.21, 0.2), PredictionLabel::Growth);
    assert_eq!(classify(-0.21, 0.2), PredictionLabel::Downfall);
}

#[test]
fn confidence_is_dampened_magnitude() {
    assert_eq!(calculate_confidence(-0.5, 1.0), 0.5);
    assert!((calculate_confidence(0.5, 0.8) - 0.4).abs() < 1e-12);
}
