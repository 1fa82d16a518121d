//! Cycle runtime shared by the scheduler and manual triggers

use crate::error::Result;
use crate::jobs::context::JobContext;
use crate::jobs::types::{CycleKind, CycleReport};
use crate::jobs::{run_daily_cycle, run_weekly_cycle};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Runs cycles against one job context, one activation per cycle kind at a time
pub struct CycleRuntime {
    context: Arc<JobContext>,
    daily: Mutex<()>,
    weekly: Mutex<()>,
}

impl CycleRuntime {
    pub fn new(context: Arc<JobContext>) -> Self {
        Self {
            context,
            daily: Mutex::new(()),
            weekly: Mutex::new(()),
        }
    }

    pub fn context(&self) -> &Arc<JobContext> {
        &self.context
    }

    /// Run one cycle, waiting for any in-flight activation of the same kind.
    ///
    /// A failed cycle is logged and returned; nothing it computed is kept.
    pub async fn run(&self, kind: CycleKind) -> Result<CycleReport> {
        let _guard = match kind {
            CycleKind::Daily => self.daily.lock().await,
            CycleKind::Weekly => self.weekly.lock().await,
        };

        info!(cycle = %kind, "CycleRuntime: starting {} cycle", kind);
        let started = Instant::now();
        let result = match kind {
            CycleKind::Daily => run_daily_cycle(&self.context).await.map(CycleReport::Daily),
            CycleKind::Weekly => run_weekly_cycle(&self.context).await.map(CycleReport::Weekly),
        };
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => {
                info!(
                    cycle = %kind,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "CycleRuntime: {} cycle completed",
                    kind
                );
                "success"
            }
            Err(e) => {
                error!(
                    cycle = %kind,
                    error = %e,
                    store_failure = e.is_store_failure(),
                    "CycleRuntime: {} cycle aborted, will retry at the next slot",
                    kind
                );
                "failure"
            }
        };

        if let Some(ref metrics) = self.context.metrics {
            metrics
                .cycles_total
                .with_label_values(&[kind.as_str(), outcome])
                .inc();
            metrics
                .cycle_duration_seconds
                .with_label_values(&[kind.as_str()])
                .observe(elapsed.as_secs_f64());
        }

        result
    }
}
