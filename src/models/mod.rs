//! Shared data models spanning the engine layers.

pub mod decimal;
pub mod evaluation;
pub mod market;
pub mod prediction;

pub use evaluation::{Evaluation, LearningOutcome};
pub use market::{
    ActualPrice, DailyObservation, HistoryPoint, MarketObservation, SectorSummary, SectorTrends,
    WeeklyAggregate,
};
pub use prediction::{ModelWeights, PastPrediction, Prediction, PredictionLabel, PredictionReason};
