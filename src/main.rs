//! Manual cycle trigger: `nepse-pulse daily` or `nepse-pulse weekly`

use dotenvy::dotenv;
use nepse_pulse::calendar::SystemClock;
use nepse_pulse::config::{self, WorkerConfig};
use nepse_pulse::core::runtime::CycleRuntime;
use nepse_pulse::db::{QuestTableStore, TableStore, TimeoutStore};
use nepse_pulse::jobs::context::JobContext;
use nepse_pulse::jobs::types::{CycleKind, CycleReport};
use nepse_pulse::learning::ModelState;
use nepse_pulse::logging;
use nepse_pulse::services::market_data::{HttpMarketFeed, MarketFeed, StaticMarketFeed};
use std::env;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let kind: CycleKind = env::args()
        .nth(1)
        .ok_or("usage: nepse-pulse <daily|weekly>")?
        .parse()?;

    let worker_config = WorkerConfig::from_env()?;
    let quest = QuestTableStore::connect(&config::get_questdb_url()).await?;
    let store: Arc<dyn TableStore> = Arc::new(TimeoutStore::new(
        Arc::new(quest),
        worker_config.store_timeout,
    ));
    let feed: Arc<dyn MarketFeed> = match worker_config.market_feed_url {
        Some(ref url) => Arc::new(HttpMarketFeed::new(
            url.clone(),
            worker_config.feed_timeout,
            worker_config.feed_cache_ttl,
        )?),
        None => Arc::new(StaticMarketFeed::new(Vec::new())),
    };

    let model = Arc::new(ModelState::load(store.as_ref()).await?);
    let context = JobContext::new(store, feed, Arc::new(SystemClock), model)
        .with_cycle_config(worker_config.cycle.clone());
    let runtime = CycleRuntime::new(Arc::new(context));

    match runtime.run(kind).await? {
        CycleReport::Daily(report) => {
            println!("Daily cycle: {} observations stored", report.observations);
            for sector in &report.sectors {
                println!(
                    "  {:<28} avg {:>7.2}%  volume {:.0}",
                    sector.sector, sector.avg_change, sector.total_volume
                );
            }
        }
        CycleReport::Weekly(report) => {
            println!(
                "Weekly cycle {}: {} predictions, {} evaluations",
                report.date,
                report.predictions.len(),
                report.evaluations.len()
            );
            println!(
                "  Weights: momentum {:.4}, volume {:.4}, sector {:.4}",
                report.weights.momentum, report.weights.volume, report.weights.sector
            );
            for prediction in report.predictions.iter().take(10) {
                println!(
                    "  {:<10} {:<8} {:>5.1}%  -> {:.2}",
                    prediction.symbol,
                    prediction.prediction,
                    prediction.confidence,
                    prediction.predicted_price
                );
            }
        }
    }

    info!(cycle = %kind, "Manual run finished");
    Ok(())
}
