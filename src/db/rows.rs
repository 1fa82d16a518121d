//! Typed boundary between store rows (text cells) and engine records.
//!
//! Everything read from the store is parsed here once; the engines only see
//! numeric values. Malformed numbers surface as `EngineError::MalformedNumber`.

use crate::calendar::{format_date, parse_date};
use crate::db::{Row, DATE_COLUMN};
use crate::error::{EngineError, Result};
use crate::models::decimal::{parse_number, to_fixed};
use crate::models::evaluation::Evaluation;
use crate::models::market::{DailyObservation, MarketObservation, SectorSummary, WeeklyAggregate};
use crate::models::prediction::{ModelWeights, PastPrediction, Prediction, PredictionReason};
use chrono::NaiveDate;
use tracing::debug;

pub fn row_date(row: &Row) -> Result<NaiveDate> {
    parse_date(field(row, DATE_COLUMN)?)
}

fn field<'a>(row: &'a Row, name: &str) -> Result<&'a str> {
    row.get(name)
        .map(String::as_str)
        .ok_or_else(|| EngineError::MissingField(name.to_string()))
}

fn text(row: &Row, name: &str) -> String {
    row.get(name).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn required_number(row: &Row, name: &str) -> Result<f64> {
    let raw = field(row, name)?;
    parse_number(raw).ok_or_else(|| EngineError::malformed(name, raw))
}

/// Absent, empty or `NaN` cells are `None`; any other non-numeric text is an error
fn optional_number(row: &Row, name: &str) -> Result<Option<f64>> {
    match row.get(name).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("nan") => Ok(None),
        Some(raw) => parse_number(raw)
            .map(Some)
            .ok_or_else(|| EngineError::malformed(name, raw)),
    }
}

fn number_cell(value: f64) -> String {
    value.to_string()
}

#[allow(clippy::too_many_arguments)]
fn observation_cells(
    row: &mut Row,
    symbol: &str,
    company_name: &str,
    sector: &str,
    ltp: f64,
    volume: f64,
    transactions: u64,
    percent_change: String,
) {
    row.insert("Symbol".to_string(), symbol.to_string());
    row.insert("Company Name".to_string(), company_name.to_string());
    row.insert("Sector".to_string(), sector.to_string());
    row.insert("LTP".to_string(), number_cell(ltp));
    row.insert("Trade Quantity".to_string(), number_cell(volume));
    row.insert("Num Trades".to_string(), transactions.to_string());
    row.insert("% Change".to_string(), percent_change);
}

fn dated_row(date: NaiveDate) -> Row {
    let mut row = Row::new();
    row.insert(DATE_COLUMN.to_string(), format_date(date));
    row
}

pub fn observation_row(date: NaiveDate, observation: &MarketObservation) -> Row {
    let mut row = dated_row(date);
    observation_cells(
        &mut row,
        &observation.symbol,
        &observation.company_name,
        &observation.sector,
        observation.ltp,
        observation.volume,
        observation.transactions,
        observation
            .percent_change
            .map(number_cell)
            .unwrap_or_default(),
    );
    row
}

pub fn aggregate_row(date: NaiveDate, aggregate: &WeeklyAggregate) -> Row {
    let mut row = dated_row(date);
    observation_cells(
        &mut row,
        &aggregate.symbol,
        &aggregate.company_name,
        &aggregate.sector,
        aggregate.ltp,
        aggregate.volume,
        aggregate.transactions,
        to_fixed(aggregate.percent_change, 2),
    );
    row
}

pub fn sector_summary_row(date: NaiveDate, summary: &SectorSummary) -> Row {
    let mut row = dated_row(date);
    row.insert("Sector".to_string(), summary.sector.clone());
    row.insert("Avg Change".to_string(), to_fixed(summary.avg_change, 2));
    row.insert("Total Volume".to_string(), number_cell(summary.total_volume));
    row
}

pub fn prediction_row(date: NaiveDate, prediction: &Prediction) -> Result<Row> {
    let mut row = dated_row(date);
    row.insert("Symbol".to_string(), prediction.symbol.clone());
    row.insert("Company Name".to_string(), prediction.company_name.clone());
    row.insert("Sector".to_string(), prediction.sector.clone());
    row.insert("Prediction".to_string(), prediction.prediction.to_string());
    row.insert("Confidence".to_string(), to_fixed(prediction.confidence, 1));
    row.insert("Predicted Price".to_string(), to_fixed(prediction.predicted_price, 2));
    row.insert("Reason".to_string(), serde_json::to_string(&prediction.reason)?);
    Ok(row)
}

pub fn evaluation_row(evaluation: &Evaluation) -> Row {
    let mut row = dated_row(evaluation.date);
    row.insert("Symbol".to_string(), evaluation.symbol.clone());
    row.insert("Actual Outcome".to_string(), number_cell(evaluation.actual_outcome));
    row.insert("Error Metric".to_string(), evaluation.error_metric.clone());
    row.insert("Adjustment".to_string(), evaluation.adjustment.clone());
    row
}

/// One dated parameter row per weight component
pub fn weight_rows(date: NaiveDate, weights: &ModelWeights) -> Vec<Row> {
    weights
        .components()
        .iter()
        .map(|(name, value)| {
            let mut row = dated_row(date);
            row.insert("Param Name".to_string(), name.to_string());
            row.insert("Value".to_string(), number_cell(*value));
            row
        })
        .collect()
}

pub fn parse_daily_observation(row: &Row) -> Result<DailyObservation> {
    let date = row_date(row)?;
    let symbol = text(row, "Symbol");
    if symbol.is_empty() {
        return Err(EngineError::MissingField("Symbol".to_string()));
    }

    Ok(DailyObservation {
        date,
        observation: MarketObservation {
            symbol,
            company_name: text(row, "Company Name"),
            sector: text(row, "Sector"),
            ltp: required_number(row, "LTP")?,
            volume: optional_number(row, "Trade Quantity")?.unwrap_or(0.0),
            percent_change: optional_number(row, "% Change")?,
            transactions: optional_number(row, "Num Trades")?
                .map(|n| n.max(0.0) as u64)
                .unwrap_or(0),
        },
    })
}

pub fn parse_past_prediction(row: &Row) -> Result<PastPrediction> {
    let reason: PredictionReason = serde_json::from_str(field(row, "Reason")?)?;
    Ok(PastPrediction {
        date: row_date(row)?,
        symbol: text(row, "Symbol"),
        predicted_price: required_number(row, "Predicted Price")?,
        reason,
    })
}

/// Weights from the most recent parameter date, over the defaults.
///
/// Returns `None` when no parameters were ever persisted.
pub fn parse_weights(rows: &[Row]) -> Result<Option<ModelWeights>> {
    let mut latest: Option<NaiveDate> = None;
    let mut dated = Vec::with_capacity(rows.len());
    for row in rows {
        let date = row_date(row)?;
        latest = Some(latest.map_or(date, |current| current.max(date)));
        dated.push((date, row));
    }

    let Some(latest) = latest else {
        return Ok(None);
    };

    let mut weights = ModelWeights::default();
    for (date, row) in dated {
        if date != latest {
            continue;
        }
        let name = text(row, "Param Name");
        let value = required_number(row, "Value")?;
        if !weights.set(&name, value) {
            debug!(param = %name, "ignoring unknown model parameter");
        }
    }
    Ok(Some(weights))
}
