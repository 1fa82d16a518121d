//! Cycle runtime, scheduler, store timeouts and metrics

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use nepse_pulse::core::runtime::CycleRuntime;
use nepse_pulse::core::scheduler::CycleScheduler;
use nepse_pulse::db::{AppendOutcome, MemoryTableStore, Row, Table, TableStore, TimeoutStore};
use nepse_pulse::error::StoreError;
use nepse_pulse::jobs::types::{CycleKind, CycleReport};
use nepse_pulse::metrics::Metrics;
use nepse_pulse::models::market::MarketObservation;
use nepse_pulse::services::market_data::MarketFeed;
use nepse_pulse::{EngineError, Result};

use crate::test_utils::{context, context_without_feed, seed};

/// Feed that records how many fetches overlap
struct SlowFeed {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowFeed {
    fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MarketFeed for SlowFeed {
    async fn fetch_live_market_data(&self) -> Result<Vec<MarketObservation>> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![MarketObservation {
            symbol: "NHPC".to_string(),
            company_name: "National Hydro Power".to_string(),
            sector: "Hydropower".to_string(),
            ltp: 210.0,
            volume: 100.0,
            percent_change: Some(1.0),
            transactions: 1,
        }])
    }
}

/// Store whose calls never complete
struct StalledStore;

#[async_trait]
impl TableStore for StalledStore {
    async fn read(&self, _table: Table) -> std::result::Result<Vec<Row>, StoreError> {
        std::future::pending().await
    }

    async fn append(
        &self,
        _table: Table,
        _date: NaiveDate,
        _rows: Vec<Row>,
    ) -> std::result::Result<AppendOutcome, StoreError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn runtime_runs_weekly_and_records_metrics() {
    let store = Arc::new(MemoryTableStore::new());
    seed(&store).await;
    let metrics = Arc::new(Metrics::new().unwrap());
    let ctx = context_without_feed(store).with_metrics(metrics.clone());
    let runtime = CycleRuntime::new(Arc::new(ctx));

    let report = runtime.run(CycleKind::Weekly).await.unwrap();
    match report {
        CycleReport::Weekly(weekly) => assert_eq!(weekly.predictions.len(), 2),
        other => panic!("unexpected report {:?}", other),
    }

    let exported = metrics.export().unwrap();
    assert!(exported.contains(r#"cycles_total{cycle="weekly",outcome="success"} 1"#));
    assert!(exported.contains("predictions_generated_total 2"));
    assert!(exported.contains(r#"model_weight{component="momentum"} 0.4"#));
    assert!(exported.contains("cycle_duration_seconds"));
}

#[tokio::test]
async fn runtime_counts_failures() {
    let store = Arc::new(MemoryTableStore::new());
    store.fail_on(Table::DailyRawData).await;
    let metrics = Arc::new(Metrics::new().unwrap());
    let ctx = context_without_feed(store).with_metrics(metrics.clone());
    let runtime = CycleRuntime::new(Arc::new(ctx));

    let err = runtime.run(CycleKind::Weekly).await.unwrap_err();
    assert!(err.is_store_failure());

    let exported = metrics.export().unwrap();
    assert!(exported.contains(r#"cycles_total{cycle="weekly",outcome="failure"} 1"#));
}

#[tokio::test]
async fn overlapping_triggers_of_one_cycle_are_serialized() {
    let store = Arc::new(MemoryTableStore::new());
    let feed = Arc::new(SlowFeed::new());
    let ctx = context(store.clone(), feed.clone());
    let runtime = Arc::new(CycleRuntime::new(Arc::new(ctx)));

    let (first, second) = tokio::join!(
        runtime.run(CycleKind::Daily),
        runtime.run(CycleKind::Daily)
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    assert_eq!(feed.peak.load(Ordering::SeqCst), 1);
    // Second activation hit the same-day guard
    assert_eq!(store.rows(Table::DailyRawData).await.len(), 1);
}

#[tokio::test]
async fn timeout_store_bounds_stalled_calls() {
    let store = TimeoutStore::new(Arc::new(StalledStore), Duration::from_millis(20));

    let err = store.read(Table::Predictions).await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout { ref table, .. } if table == "predictions"));

    let err = store
        .append(Table::ModelParams, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Timeout { .. }));

    let err = store
        .has_batch(Table::WeeklyEvaluation, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Timeout { ref table, .. } if table == "weekly_evaluation"));
}

#[tokio::test]
async fn timed_out_store_aborts_cycle_as_store_failure() {
    let store: Arc<dyn TableStore> =
        Arc::new(TimeoutStore::new(Arc::new(StalledStore), Duration::from_millis(20)));
    let ctx = nepse_pulse::jobs::context::JobContext::new(
        store,
        Arc::new(SlowFeed::new()),
        Arc::new(nepse_pulse::calendar::FixedClock(crate::test_utils::cycle_date())),
        Arc::new(nepse_pulse::learning::ModelState::default()),
    );

    let err = nepse_pulse::jobs::run_weekly_cycle(&ctx).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Timeout { .. })));
}

#[tokio::test]
async fn scheduler_lifecycle() {
    let store = Arc::new(MemoryTableStore::new());
    let runtime = Arc::new(CycleRuntime::new(Arc::new(context_without_feed(store))));

    let invalid = CycleScheduler::new(runtime.clone(), CycleKind::Daily, "every day at noon");
    assert!(matches!(invalid, Err(EngineError::Config(_))));

    let scheduler = CycleScheduler::new(runtime, CycleKind::Weekly, "0 0 10 * * Fri").unwrap();
    assert!(scheduler.next_tick().is_some());
    assert!(!scheduler.is_running().await);

    scheduler.start().await;
    assert!(scheduler.is_running().await);

    scheduler.stop().await;
    assert!(!scheduler.is_running().await);
}
