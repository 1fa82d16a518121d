//! Momentum score

use crate::config::EngineConfig;
use crate::models::market::HistoryPoint;
use crate::signals::scoring::clamp_score;

/// Momentum over the trailing window, in [-1, 1]
///
/// score = clamp((last.ltp - first.ltp) / first.ltp * scale)
///
/// Returns 0 when the history is shorter than the window.
pub fn calculate_momentum_with(history: &[HistoryPoint], window: usize, scale: f64) -> f64 {
    if window == 0 || history.len() < window {
        return 0.0;
    }

    let recent = &history[history.len() - window..];
    let start = recent[0].ltp;
    let end = recent[recent.len() - 1].ltp;
    if start == 0.0 {
        return 0.0;
    }

    let change = (end - start) / start;
    clamp_score(change * scale)
}

/// Momentum with the default 5-point window and 10x scale
pub fn calculate_momentum(history: &[HistoryPoint]) -> f64 {
    let config = EngineConfig::default();
    calculate_momentum_with(history, config.feature_window, config.momentum_scale)
}
