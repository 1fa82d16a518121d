//! Owned model state: the ensemble weights shared by prediction and learning

use crate::db::rows::parse_weights;
use crate::db::{Table, TableStore};
use crate::error::Result;
use crate::models::prediction::ModelWeights;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::info;

/// Weights loaded once at startup and mutated only by the learning pass
#[derive(Debug)]
pub struct ModelState {
    weights: RwLock<ModelWeights>,
}

impl ModelState {
    pub fn new(weights: ModelWeights) -> Self {
        Self {
            weights: RwLock::new(weights),
        }
    }

    /// Load the latest persisted weights, falling back to the defaults
    pub async fn load(store: &dyn TableStore) -> Result<Self> {
        let rows = store.read(Table::ModelParams).await?;
        let weights = match parse_weights(&rows)? {
            Some(weights) => {
                info!(
                    momentum = weights.momentum,
                    volume = weights.volume,
                    sector = weights.sector,
                    "Loaded model weights"
                );
                weights
            }
            None => {
                let weights = ModelWeights::default();
                info!(
                    momentum = weights.momentum,
                    volume = weights.volume,
                    sector = weights.sector,
                    "No persisted model parameters, using defaults"
                );
                weights
            }
        };
        Ok(Self::new(weights))
    }

    pub async fn snapshot(&self) -> ModelWeights {
        *self.weights.read().await
    }

    /// Exclusive access for the read-modify-write of a learning pass
    pub(crate) async fn lock_for_update(&self) -> RwLockWriteGuard<'_, ModelWeights> {
        self.weights.write().await
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new(ModelWeights::default())
    }
}
