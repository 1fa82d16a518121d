//! NEPSE Pulse Worker
//!
//! Runs the daily snapshot and the weekly prediction cycles on their cron
//! schedules until interrupted.

use dotenvy::dotenv;
use nepse_pulse::calendar::SystemClock;
use nepse_pulse::config::{self, WorkerConfig};
use nepse_pulse::core::runtime::CycleRuntime;
use nepse_pulse::core::scheduler::CycleScheduler;
use nepse_pulse::db::{QuestTableStore, TableStore, TimeoutStore};
use nepse_pulse::jobs::context::JobContext;
use nepse_pulse::jobs::types::CycleKind;
use nepse_pulse::learning::ModelState;
use nepse_pulse::logging;
use nepse_pulse::metrics::Metrics;
use nepse_pulse::services::market_data::{HttpMarketFeed, MarketFeed, StaticMarketFeed};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

const STORE_CONNECT_ATTEMPTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting NEPSE Pulse Worker");
    info!(environment = %env, "Environment");

    let worker_config = WorkerConfig::from_env()?;
    let metrics = Arc::new(Metrics::new()?);

    info!("Initializing QuestDB connection...");
    let quest = QuestTableStore::connect_with_retry(&config::get_questdb_url(), STORE_CONNECT_ATTEMPTS)
        .await
        .map_err(|e| format!("QuestDB connection required for worker: {}", e))?;
    info!("QuestDB connected");
    let store: Arc<dyn TableStore> = Arc::new(TimeoutStore::new(
        Arc::new(quest),
        worker_config.store_timeout,
    ));

    let feed: Arc<dyn MarketFeed> = match worker_config.market_feed_url {
        Some(ref url) => {
            info!(url = %url, "Using HTTP market feed");
            Arc::new(HttpMarketFeed::new(
                url.clone(),
                worker_config.feed_timeout,
                worker_config.feed_cache_ttl,
            )?)
        }
        None => {
            warn!("MARKET_FEED_URL not set - daily cycle will find no market data");
            Arc::new(StaticMarketFeed::new(Vec::new()))
        }
    };

    // Weights are loaded once, before any cycle can run
    let model = Arc::new(ModelState::load(store.as_ref()).await?);
    let weights = model.snapshot().await;
    metrics.record_weights(weights.momentum, weights.volume, weights.sector);

    let context = JobContext::new(store, feed, Arc::new(SystemClock), model)
        .with_cycle_config(worker_config.cycle.clone())
        .with_metrics(metrics.clone());
    let runtime = Arc::new(CycleRuntime::new(Arc::new(context)));

    info!("Starting cycle schedulers...");
    let daily = CycleScheduler::new(runtime.clone(), CycleKind::Daily, &worker_config.daily_cron)?;
    let weekly = CycleScheduler::new(runtime.clone(), CycleKind::Weekly, &worker_config.weekly_cron)?;
    daily.start().await;
    weekly.start().await;

    if let (Some(d), Some(w)) = (daily.next_tick(), weekly.next_tick()) {
        info!(next_daily = %d, next_weekly = %w, "Worker started, waiting for shutdown signal...");
    }

    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    daily.stop().await;
    weekly.stop().await;
    // No scrape endpoint; the registry is exported once on the way out
    match metrics.export() {
        Ok(exposition) => info!(metrics = %exposition, "Final cycle metrics"),
        Err(e) => warn!(error = %e, "Failed to export metrics"),
    }
    info!("Worker stopped");

    Ok(())
}
