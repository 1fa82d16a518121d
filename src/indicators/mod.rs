//! Feature extractors over a short trailing window of daily history.

pub mod momentum;
pub mod volume;

pub use momentum::{calculate_momentum, calculate_momentum_with};
pub use volume::{calculate_volume_score, calculate_volume_score_with};
