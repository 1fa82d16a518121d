//! Deadline decorator for any table store

use crate::db::{AppendOutcome, Row, Table, TableStore};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Bounds every store call so a stalled backend cannot hang a cycle
pub struct TimeoutStore {
    inner: Arc<dyn TableStore>,
    limit: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn TableStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn elapsed(&self, table: Table) -> StoreError {
        StoreError::Timeout {
            table: table.name().to_string(),
            seconds: self.limit.as_secs(),
        }
    }
}

#[async_trait]
impl TableStore for TimeoutStore {
    async fn read(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        timeout(self.limit, self.inner.read(table))
            .await
            .map_err(|_| self.elapsed(table))?
    }

    async fn append(
        &self,
        table: Table,
        date: NaiveDate,
        rows: Vec<Row>,
    ) -> Result<AppendOutcome, StoreError> {
        timeout(self.limit, self.inner.append(table, date, rows))
            .await
            .map_err(|_| self.elapsed(table))?
    }

    async fn has_batch(&self, table: Table, date: NaiveDate) -> Result<bool, StoreError> {
        timeout(self.limit, self.inner.has_batch(table, date))
            .await
            .map_err(|_| self.elapsed(table))?
    }
}
