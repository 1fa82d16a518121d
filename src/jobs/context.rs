//! Job context for dependency injection

use crate::calendar::Clock;
use crate::config::{CycleConfig, EngineConfig};
use crate::db::TableStore;
use crate::learning::{ModelEvaluator, ModelState};
use crate::metrics::Metrics;
use crate::services::market_data::MarketFeed;
use crate::signals::PredictionEngine;
use std::sync::Arc;

/// Everything a cycle needs, shared by scheduled and manual triggers
///
/// The model state is loaded before the context is built; cycles never
/// initialize it lazily.
pub struct JobContext {
    pub store: Arc<dyn TableStore>,
    pub feed: Arc<dyn MarketFeed>,
    pub clock: Arc<dyn Clock>,
    pub model: Arc<ModelState>,
    pub engine: PredictionEngine,
    pub evaluator: ModelEvaluator,
    pub cycle: CycleConfig,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(
        store: Arc<dyn TableStore>,
        feed: Arc<dyn MarketFeed>,
        clock: Arc<dyn Clock>,
        model: Arc<ModelState>,
    ) -> Self {
        Self {
            store,
            feed,
            clock,
            model,
            engine: PredictionEngine::default(),
            evaluator: ModelEvaluator::default(),
            cycle: CycleConfig::default(),
            metrics: None,
        }
    }

    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine = PredictionEngine::new(config.clone());
        self.evaluator = ModelEvaluator::new(config);
        self
    }

    pub fn with_cycle_config(mut self, cycle: CycleConfig) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}
