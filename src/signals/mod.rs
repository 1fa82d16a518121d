//! Prediction engine and its scoring primitives.

pub mod engine;
pub mod scoring;

pub use engine::{ComponentScores, PredictionEngine};
pub use scoring::*;
