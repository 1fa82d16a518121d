//! Volume-confirmation score

use crate::config::EngineConfig;
use crate::models::market::HistoryPoint;
use crate::signals::scoring::clamp_score;

/// Volume-weighted direction score over the trailing window, in [-1, 1]
///
/// Each day contributes `step * volume / mean_volume`, positive on up days and
/// negative on down days; flat or unknown days contribute nothing. The sum is
/// averaged over the window and clamped.
pub fn calculate_volume_score_with(history: &[HistoryPoint], window: usize, step: f64) -> f64 {
    if window == 0 || history.len() < window {
        return 0.0;
    }

    let recent = &history[history.len() - window..];
    let avg_volume = recent.iter().map(|p| p.volume).sum::<f64>() / recent.len() as f64;
    if avg_volume == 0.0 {
        return 0.0;
    }

    let mut score = 0.0;
    for point in recent {
        let vol_ratio = point.volume / avg_volume;
        match point.percent_change {
            Some(change) if change > 0.0 => score += vol_ratio * step,
            Some(change) if change < 0.0 => score -= vol_ratio * step,
            _ => {}
        }
    }

    clamp_score(score / recent.len() as f64)
}

/// Volume score with the default 5-point window and 0.5 step
pub fn calculate_volume_score(history: &[HistoryPoint]) -> f64 {
    let config = EngineConfig::default();
    calculate_volume_score_with(history, config.feature_window, config.volume_step)
}
