//! NEPSE weekly prediction engine: calendar, feature scoring, ensemble prediction,
//! self-correcting weights and the daily/weekly cycles that drive them.

pub mod calendar;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod learning;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{EngineError, Result};
