//! Unit tests for configuration defaults

use nepse_pulse::config::{CycleConfig, EngineConfig, SectorBetas, WorkerConfig};

#[test]
fn sector_betas_lookup() {
    let betas = SectorBetas::default();
    assert_eq!(betas.get("Hydropower"), 1.2);
    assert_eq!(betas.get("Commercial Bank"), 0.8);
    assert_eq!(betas.get("Life Insurance"), 0.9);
    assert_eq!(betas.get("Manufacturing"), 1.0);
    assert_eq!(betas.get(""), 1.0);
}

#[test]
fn engine_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.feature_window, 5);
    assert_eq!(config.classification_threshold, 0.2);
    assert_eq!(config.holiday_dampener, 0.6);
    assert_eq!(config.holiday_confidence_factor, 0.8);
    assert_eq!(config.max_projected_move, 0.10);
    assert_eq!(config.learning_rate, 0.05);
}

#[test]
fn cycle_defaults() {
    let cycle = CycleConfig::default();
    assert_eq!(cycle.history_days, 14);
    assert_eq!(cycle.week_days, 7);
    assert_eq!(cycle.min_weekly_points, 2);
    assert_eq!((cycle.maturation_min_days, cycle.maturation_max_days), (5, 10));
    assert_eq!(cycle.top_list_size, 50);
}

#[test]
fn worker_defaults_schedule_after_market_close() {
    let config = WorkerConfig::default();
    assert_eq!(config.daily_cron, "0 20 9 * * Sun,Mon,Tue,Wed,Thu");
    assert_eq!(config.weekly_cron, "0 0 10 * * Fri");
    assert!(config.market_feed_url.is_none());
    assert_eq!(config.feed_cache_ttl.as_secs(), 300);
}
