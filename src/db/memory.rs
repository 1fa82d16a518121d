//! In-process table store for tests and dry runs

use crate::calendar::format_date;
use crate::db::{AppendOutcome, Row, Table, TableStore, DATE_COLUMN};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    appends: RwLock<Vec<(Table, NaiveDate, usize)>>,
    failing: RwLock<HashSet<Table>>,
    failing_once: RwLock<HashSet<Table>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows without the duplicate guard or the append log
    pub async fn seed(&self, table: Table, rows: Vec<Row>) {
        self.tables.write().await.entry(table).or_default().extend(rows);
    }

    /// Make every subsequent call touching `table` fail
    pub async fn fail_on(&self, table: Table) {
        self.failing.write().await.insert(table);
    }

    /// Make only the next append to `table` fail
    pub async fn fail_next_append(&self, table: Table) {
        self.failing_once.write().await.insert(table);
    }

    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables.read().await.get(&table).cloned().unwrap_or_default()
    }

    /// Successful appends as (table, batch date, row count)
    pub async fn appends(&self) -> Vec<(Table, NaiveDate, usize)> {
        self.appends.read().await.clone()
    }

    async fn check_failure(&self, table: Table) -> Result<(), StoreError> {
        if self.failing.read().await.contains(&table) {
            return Err(injected_failure(table));
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn read(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        self.check_failure(table).await?;
        Ok(self.rows(table).await)
    }

    async fn append(
        &self,
        table: Table,
        date: NaiveDate,
        rows: Vec<Row>,
    ) -> Result<AppendOutcome, StoreError> {
        self.check_failure(table).await?;
        if self.failing_once.write().await.remove(&table) {
            return Err(injected_failure(table));
        }
        if rows.is_empty() {
            return Ok(AppendOutcome::Empty);
        }

        let mut tables = self.tables.write().await;
        let existing = tables.entry(table).or_default();
        if table.is_date_guarded() {
            let day = format_date(date);
            if existing
                .iter()
                .any(|row| row.get(DATE_COLUMN).map(String::as_str) == Some(day.as_str()))
            {
                return Ok(AppendOutcome::SkippedDuplicate);
            }
        }

        let count = rows.len();
        existing.extend(rows);
        self.appends.write().await.push((table, date, count));
        Ok(AppendOutcome::Appended(count))
    }
}

fn injected_failure(table: Table) -> StoreError {
    StoreError::Query {
        table: table.name().to_string(),
        message: "injected failure".to_string(),
    }
}
