//! Daily and weekly cycles of the prediction engine

pub mod aggregation;
pub mod context;
pub mod daily;
pub mod types;
pub mod weekly;

pub use context::JobContext;
pub use daily::run_daily_cycle;
pub use types::{CycleKind, CycleReport, DailyReport, WeeklyReport};
pub use weekly::run_weekly_cycle;
