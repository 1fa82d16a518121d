//! Self-correction loop: evaluation of matured predictions and weight updates.

pub mod evaluator;
pub mod state;

pub use evaluator::{
    apply_adjustment, prediction_error, score_predictions, BatchAdjustment, ModelEvaluator,
};
pub use state::ModelState;
