//! Unit tests for the in-memory table store

use chrono::NaiveDate;
use nepse_pulse::db::{AppendOutcome, MemoryTableStore, Row, Table, TableStore};
use nepse_pulse::error::StoreError;

fn dated(date: &str, symbol: &str) -> Row {
    let mut row = Row::new();
    row.insert("Date".to_string(), date.to_string());
    row.insert("Symbol".to_string(), symbol.to_string());
    row
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[tokio::test]
async fn guarded_table_rejects_second_batch_for_date() {
    let store = MemoryTableStore::new();
    let first = store
        .append(Table::Predictions, day(14), vec![dated("2024-06-14", "NHPC")])
        .await
        .unwrap();
    let second = store
        .append(Table::Predictions, day(14), vec![dated("2024-06-14", "NABIL")])
        .await
        .unwrap();

    assert_eq!(first, AppendOutcome::Appended(1));
    assert_eq!(second, AppendOutcome::SkippedDuplicate);
    assert_eq!(store.rows(Table::Predictions).await.len(), 1);
    assert_eq!(store.appends().await, vec![(Table::Predictions, day(14), 1)]);
}

#[tokio::test]
async fn unguarded_tables_accept_repeats() {
    let store = MemoryTableStore::new();
    for _ in 0..2 {
        store
            .append(Table::WeeklyBest50, day(14), vec![dated("2024-06-14", "NHPC")])
            .await
            .unwrap();
    }
    assert_eq!(store.rows(Table::WeeklyBest50).await.len(), 2);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let store = MemoryTableStore::new();
    let outcome = store.append(Table::DailyRawData, day(14), Vec::new()).await.unwrap();
    assert_eq!(outcome, AppendOutcome::Empty);
    assert!(store.appends().await.is_empty());
}

#[tokio::test]
async fn reads_preserve_insertion_order() {
    let store = MemoryTableStore::new();
    store
        .seed(Table::DailyRawData, vec![dated("2024-06-13", "B"), dated("2024-06-12", "A")])
        .await;
    let rows = store.read(Table::DailyRawData).await.unwrap();
    assert_eq!(rows[0]["Symbol"], "B");
    assert_eq!(rows[1]["Symbol"], "A");
}

#[tokio::test]
async fn injected_failure_surfaces_as_query_error() {
    let store = MemoryTableStore::new();
    store.fail_on(Table::SectorSummary).await;
    let err = store.read(Table::SectorSummary).await.unwrap_err();
    assert!(matches!(err, StoreError::Query { ref table, .. } if table == "sector_summary"));
    assert!(store.read(Table::DailyTop50).await.is_ok());
}

#[test]
fn table_metadata() {
    assert_eq!(Table::ALL.len(), 8);
    assert_eq!(Table::DailyTop50.name(), "daily_top_50");
    assert_eq!(Table::ModelParams.headers(), &["Date", "Param Name", "Value"]);
    assert!(Table::WeeklyEvaluation.is_date_guarded());
    assert!(Table::ModelParams.is_date_guarded());
    assert!(!Table::WeeklyWorst50.is_date_guarded());
}

#[tokio::test]
async fn has_batch_looks_up_the_date_column() {
    let store = MemoryTableStore::new();
    store
        .append(Table::ModelParams, day(14), vec![dated("2024-06-14", "momentum")])
        .await
        .unwrap();

    assert!(store.has_batch(Table::ModelParams, day(14)).await.unwrap());
    assert!(!store.has_batch(Table::ModelParams, day(7)).await.unwrap());
    assert!(!store.has_batch(Table::WeeklyEvaluation, day(14)).await.unwrap());
}

#[tokio::test]
async fn one_shot_failure_clears_after_first_append() {
    let store = MemoryTableStore::new();
    store.fail_next_append(Table::ModelParams).await;

    // Reads are unaffected
    assert!(store.read(Table::ModelParams).await.is_ok());
    let err = store
        .append(Table::ModelParams, day(14), vec![dated("2024-06-14", "momentum")])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Query { .. }));

    let outcome = store
        .append(Table::ModelParams, day(14), vec![dated("2024-06-14", "momentum")])
        .await
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Appended(1));
}
