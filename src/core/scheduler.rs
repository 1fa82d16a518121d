//! Cron-based scheduler that triggers cycles on the runtime

use crate::core::runtime::CycleRuntime;
use crate::error::{EngineError, Result};
use crate::jobs::types::CycleKind;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Fires one cycle kind on every tick of a cron schedule
pub struct CycleScheduler {
    runtime: Arc<CycleRuntime>,
    kind: CycleKind,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl CycleScheduler {
    /// Create a scheduler from a six-field cron expression (UTC)
    pub fn new(runtime: Arc<CycleRuntime>, kind: CycleKind, cron_expr: &str) -> Result<Self> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            EngineError::Config(format!("Invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            cycle = %kind,
            cron = %cron_expr,
            "CycleScheduler: created {} schedule (cron: {})",
            kind,
            cron_expr
        );

        Ok(Self {
            runtime,
            kind,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Next fire time after now, if the schedule has one
    pub fn next_tick(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.schedule.upcoming(chrono::Utc).next()
    }

    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();
        let kind = self.kind;

        let handle = tokio::spawn(async move {
            info!(cycle = %kind, "CycleScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!(cycle = %kind, "CycleScheduler: cron tick, running {} cycle", kind);
                // Failures are logged by the runtime; the next tick retries
                if runtime.run(kind).await.is_err() {
                    warn!(cycle = %kind, "CycleScheduler: {} cycle failed", kind);
                }
            }
        });

        *self.handle.write().await = Some(handle);
        info!(cycle = %kind, "CycleScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!(cycle = %self.kind, "CycleScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
