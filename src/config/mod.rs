//! Environment-driven configuration and model constants

use crate::error::{EngineError, Result};
use std::env;
use std::time::Duration;

/// Deployment environment (`production`, `prod`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL")
        .unwrap_or_else(|_| "host=localhost port=8812 user=admin password=quest dbname=qdb".to_string())
}

/// Sector sensitivity applied to the momentum term only
#[derive(Debug, Clone, PartialEq)]
pub struct SectorBetas {
    pub hydropower: f64,
    pub commercial_bank: f64,
    pub life_insurance: f64,
    pub default: f64,
}

impl SectorBetas {
    pub const HYDROPOWER: &'static str = "Hydropower";
    pub const COMMERCIAL_BANK: &'static str = "Commercial Bank";
    pub const LIFE_INSURANCE: &'static str = "Life Insurance";

    pub fn get(&self, sector: &str) -> f64 {
        match sector {
            Self::HYDROPOWER => self.hydropower,
            Self::COMMERCIAL_BANK => self.commercial_bank,
            Self::LIFE_INSURANCE => self.life_insurance,
            _ => self.default,
        }
    }
}

impl Default for SectorBetas {
    fn default() -> Self {
        Self {
            hydropower: 1.2,
            commercial_bank: 0.8,
            life_insurance: 0.9,
            default: 1.0,
        }
    }
}

/// Tunable constants of the prediction and learning engines
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Trailing window used by the momentum and volume extractors
    pub feature_window: usize,
    /// Relative price change multiplier; 0.1 move saturates momentum
    pub momentum_scale: f64,
    pub volume_step: f64,
    /// Sector trend (percent) divisor before clamping
    pub sector_scale: f64,
    pub classification_threshold: f64,
    pub holiday_dampener: f64,
    pub holiday_confidence_factor: f64,
    pub max_projected_move: f64,
    pub learning_rate: f64,
    pub holiday_learning_factor: f64,
    pub sector_betas: SectorBetas,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feature_window: 5,
            momentum_scale: 10.0,
            volume_step: 0.5,
            sector_scale: 5.0,
            classification_threshold: 0.2,
            holiday_dampener: 0.6,
            holiday_confidence_factor: 0.8,
            max_projected_move: 0.10,
            learning_rate: 0.05,
            holiday_learning_factor: 0.5,
            sector_betas: SectorBetas::default(),
        }
    }
}

/// Windows and limits used by the daily and weekly cycles
#[derive(Debug, Clone, PartialEq)]
pub struct CycleConfig {
    pub history_days: i64,
    pub week_days: i64,
    pub min_weekly_points: usize,
    pub maturation_min_days: i64,
    pub maturation_max_days: i64,
    pub top_list_size: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            history_days: 14,
            week_days: 7,
            min_weekly_points: 2,
            maturation_min_days: 5,
            maturation_max_days: 10,
            top_list_size: 50,
        }
    }
}

/// Worker process configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub daily_cron: String,
    pub weekly_cron: String,
    pub market_feed_url: Option<String>,
    pub store_timeout: Duration,
    pub feed_timeout: Duration,
    pub feed_cache_ttl: Duration,
    pub cycle: CycleConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            // 15:05 Asia/Kathmandu, Sunday to Thursday
            daily_cron: "0 20 9 * * Sun,Mon,Tue,Wed,Thu".to_string(),
            weekly_cron: "0 0 10 * * Fri".to_string(),
            market_feed_url: None,
            store_timeout: Duration::from_secs(30),
            feed_timeout: Duration::from_secs(60),
            feed_cache_ttl: Duration::from_secs(300),
            cycle: CycleConfig::default(),
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let mut cycle = defaults.cycle.clone();
        if let Some(size) = parse_env::<usize>("TOP_LIST_SIZE")? {
            cycle.top_list_size = size;
        }

        Ok(Self {
            daily_cron: env::var("DAILY_CRON").unwrap_or(defaults.daily_cron),
            weekly_cron: env::var("WEEKLY_CRON").unwrap_or(defaults.weekly_cron),
            market_feed_url: env::var("MARKET_FEED_URL").ok().filter(|u| !u.is_empty()),
            store_timeout: parse_env::<u64>("STORE_TIMEOUT_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.store_timeout),
            feed_timeout: parse_env::<u64>("FEED_TIMEOUT_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.feed_timeout),
            feed_cache_ttl: parse_env::<u64>("FEED_CACHE_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.feed_cache_ttl),
            cycle,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
