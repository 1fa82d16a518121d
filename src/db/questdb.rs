//! QuestDB-backed table store
//!
//! Every logical table lives in one time-series table keyed by `table_name`; rows
//! are kept as JSON payloads so the column layout of each logical table stays
//! owned by the row codecs in `db::rows`.

use crate::calendar::format_date;
use crate::config;
use crate::db::{AppendOutcome, Row, Table, TableStore};
use crate::error::StoreError;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, warn};

pub struct QuestTableStore {
    client: Arc<RwLock<Option<Client>>>,
}

impl QuestTableStore {
    /// Connect using `QUESTDB_URL`
    pub async fn new() -> Result<Self, StoreError> {
        Self::connect(&config::get_questdb_url()).await
    }

    pub async fn connect(questdb_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(questdb_url, NoTls)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to QuestDB: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "QuestDB connection error");
            }
        });

        let store = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Connect with exponential backoff; used at process start only
    pub async fn connect_with_retry(questdb_url: &str, max_attempts: usize) -> Result<Self, StoreError> {
        (|| Self::connect(questdb_url))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_times(max_attempts),
            )
            .notify(|err: &StoreError, delay: Duration| {
                warn!(error = %err, delay_ms = delay.as_millis() as u64, "QuestDB not ready, retrying");
            })
            .await
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            c.execute(
                "CREATE TABLE IF NOT EXISTS store_rows (
                    timestamp TIMESTAMP,
                    table_name SYMBOL,
                    batch_date STRING,
                    seq LONG,
                    payload STRING
                ) TIMESTAMP(timestamp) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| query_error("store_rows", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for QuestTableStore {
    async fn read(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Ok(Vec::new());
        };

        let rows = c
            .query(
                "SELECT payload FROM store_rows WHERE table_name = $1 ORDER BY timestamp, seq",
                &[&table.name()],
            )
            .await
            .map_err(|e| query_error(table.name(), e))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: String = row.get(0);
            result.push(serde_json::from_str::<Row>(&payload)?);
        }
        debug!(table = %table, count = result.len(), "QuestTableStore: read {} rows from {}", result.len(), table);
        Ok(result)
    }

    async fn append(
        &self,
        table: Table,
        date: NaiveDate,
        rows: Vec<Row>,
    ) -> Result<AppendOutcome, StoreError> {
        if rows.is_empty() {
            return Ok(AppendOutcome::Empty);
        }

        let day = format_date(date);
        let payloads = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;

        let mut client = self.client.write().await;
        let Some(ref mut c) = *client else {
            return Err(StoreError::Connection("QuestDB client not initialized".to_string()));
        };

        // Checked under the write lock so concurrent appends cannot both pass the guard
        if table.is_date_guarded() && batch_exists(c, table, &day).await? {
            return Ok(AppendOutcome::SkippedDuplicate);
        }

        let timestamp = Utc::now().naive_utc();
        let tx = c.transaction().await.map_err(|e| query_error(table.name(), e))?;
        for (seq, payload) in payloads.iter().enumerate() {
            tx.execute(
                "INSERT INTO store_rows (timestamp, table_name, batch_date, seq, payload)
                 VALUES ($1, $2, $3, $4, $5)",
                &[&timestamp, &table.name(), &day, &(seq as i64), payload],
            )
            .await
            .map_err(|e| query_error(table.name(), e))?;
        }
        tx.commit().await.map_err(|e| query_error(table.name(), e))?;

        Ok(AppendOutcome::Appended(payloads.len()))
    }

    async fn has_batch(&self, table: Table, date: NaiveDate) -> Result<bool, StoreError> {
        let client = self.client.read().await;
        match *client {
            Some(ref c) => batch_exists(c, table, &format_date(date)).await,
            None => Ok(false),
        }
    }
}

async fn batch_exists(client: &Client, table: Table, day: &str) -> Result<bool, StoreError> {
    let row = client
        .query_one(
            "SELECT count() FROM store_rows WHERE table_name = $1 AND batch_date = $2",
            &[&table.name(), &day],
        )
        .await
        .map_err(|e| query_error(table.name(), e))?;
    let count: i64 = row.get(0);
    Ok(count > 0)
}

fn query_error(table: &str, e: tokio_postgres::Error) -> StoreError {
    StoreError::Query {
        table: table.to_string(),
        message: e.to_string(),
    }
}
