//! Append-only table store seam and its backends

pub mod memory;
pub mod questdb;
pub mod rows;
pub mod timeout;

pub use memory::MemoryTableStore;
pub use questdb::QuestTableStore;
pub use timeout::TimeoutStore;

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Column name → cell text
pub type Row = BTreeMap<String, String>;

pub const DATE_COLUMN: &str = "Date";

const OBSERVATION_HEADERS: &[&str] = &[
    "Date",
    "Symbol",
    "Company Name",
    "Sector",
    "LTP",
    "Trade Quantity",
    "Num Trades",
    "% Change",
];

/// Tables written and read by the cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    DailyRawData,
    DailyTop50,
    SectorSummary,
    WeeklyBest50,
    WeeklyWorst50,
    Predictions,
    ModelParams,
    WeeklyEvaluation,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::DailyRawData,
        Table::DailyTop50,
        Table::SectorSummary,
        Table::WeeklyBest50,
        Table::WeeklyWorst50,
        Table::Predictions,
        Table::ModelParams,
        Table::WeeklyEvaluation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::DailyRawData => "daily_raw_data",
            Table::DailyTop50 => "daily_top_50",
            Table::SectorSummary => "sector_summary",
            Table::WeeklyBest50 => "weekly_best_50",
            Table::WeeklyWorst50 => "weekly_worst_50",
            Table::Predictions => "predictions",
            Table::ModelParams => "model_params",
            Table::WeeklyEvaluation => "weekly_evaluation",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Table::DailyRawData | Table::DailyTop50 | Table::WeeklyBest50 | Table::WeeklyWorst50 => {
                OBSERVATION_HEADERS
            }
            Table::SectorSummary => &["Date", "Sector", "Avg Change", "Total Volume"],
            Table::Predictions => &[
                "Date",
                "Symbol",
                "Company Name",
                "Sector",
                "Prediction",
                "Confidence",
                "Predicted Price",
                "Reason",
            ],
            Table::ModelParams => &["Date", "Param Name", "Value"],
            Table::WeeklyEvaluation => {
                &["Date", "Symbol", "Actual Outcome", "Error Metric", "Adjustment"]
            }
        }
    }

    /// Tables holding one batch per date; a second batch for the same date is rejected
    pub fn is_date_guarded(&self) -> bool {
        matches!(
            self,
            Table::DailyRawData
                | Table::DailyTop50
                | Table::SectorSummary
                | Table::Predictions
                | Table::ModelParams
                | Table::WeeklyEvaluation
        )
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(usize),
    /// A batch for this date already exists
    SkippedDuplicate,
    Empty,
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// All rows of `table` in insertion order
    async fn read(&self, table: Table) -> Result<Vec<Row>, StoreError>;

    /// Append one logical batch dated `date`
    async fn append(
        &self,
        table: Table,
        date: NaiveDate,
        rows: Vec<Row>,
    ) -> Result<AppendOutcome, StoreError>;

    /// Whether a batch dated `date` is already stored in `table`
    async fn has_batch(&self, table: Table, date: NaiveDate) -> Result<bool, StoreError> {
        let day = crate::calendar::format_date(date);
        Ok(self
            .read(table)
            .await?
            .iter()
            .any(|row| row.get(DATE_COLUMN).map(String::as_str) == Some(day.as_str())))
    }
}
