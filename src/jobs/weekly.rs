//! Weekly cycle: aggregate the trailing week, evaluate matured predictions,
//! predict the coming week.

use crate::db::rows::{aggregate_row, parse_daily_observation, parse_past_prediction, prediction_row, row_date};
use crate::db::{AppendOutcome, Row, Table};
use crate::error::Result;
use crate::jobs::aggregation::{
    is_matured, rank_best, rank_worst, symbol_infos, weekly_aggregates, HistoryBook,
};
use crate::jobs::context::JobContext;
use crate::jobs::types::WeeklyReport;
use crate::models::evaluation::Evaluation;
use crate::models::market::{ActualPrice, SectorTrends};
use crate::models::prediction::{ModelWeights, Prediction};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

pub async fn run_weekly_cycle(ctx: &JobContext) -> Result<WeeklyReport> {
    let today = ctx.clock.today();
    info!(date = %today, "WeeklyCycle: starting analysis and prediction");

    let raw_rows = ctx.store.read(Table::DailyRawData).await?;
    if raw_rows.is_empty() {
        info!("WeeklyCycle: no historical data to process");
        return Ok(WeeklyReport::empty(today, ctx.model.snapshot().await));
    }

    // Weekly performance
    let history_start = today - Duration::days(ctx.cycle.history_days);
    let week_start = today - Duration::days(ctx.cycle.week_days);

    let mut observations = Vec::new();
    for row in &raw_rows {
        if row_date(row)? > history_start {
            observations.push(parse_daily_observation(row)?);
        }
    }
    let book = HistoryBook::from_observations(&observations);
    let infos = symbol_infos(&raw_rows);
    let aggregates = weekly_aggregates(&book, &infos, week_start, ctx.cycle.min_weekly_points);
    let best = rank_best(&aggregates, ctx.cycle.top_list_size);
    let worst = rank_worst(&aggregates, ctx.cycle.top_list_size);

    info!(
        symbols = book.len(),
        aggregated = aggregates.len(),
        "WeeklyCycle: aggregated {} of {} symbols",
        aggregates.len(),
        book.len()
    );

    // Self-correction on last week's predictions
    let evaluations = evaluate_matured(ctx, today, &book.latest_prices()).await?;

    // New predictions
    let sector_trends = SectorTrends::from_aggregates(&aggregates);
    let weights = ctx.model.snapshot().await;
    let mut predictions = Vec::with_capacity(aggregates.len());
    for stock in &aggregates {
        let prediction = ctx.engine.predict(
            stock,
            book.history(&stock.symbol),
            sector_trends.get(&stock.sector),
            &weights,
            today,
        )?;
        predictions.push(prediction);
    }

    // Persist
    append_logged(ctx, Table::WeeklyBest50, today, best.iter().map(|a| aggregate_row(today, a)).collect()).await?;
    append_logged(ctx, Table::WeeklyWorst50, today, worst.iter().map(|a| aggregate_row(today, a)).collect()).await?;
    if !predictions.is_empty() {
        let rows = predictions
            .iter()
            .map(|p| prediction_row(today, p))
            .collect::<Result<Vec<_>>>()?;
        append_logged(ctx, Table::Predictions, today, rows).await?;
    }

    let weights = ctx.model.snapshot().await;
    record_metrics(ctx, &predictions, &weights);
    info!(
        predictions = predictions.len(),
        evaluations = evaluations.len(),
        "WeeklyCycle: generated {} predictions",
        predictions.len()
    );

    Ok(WeeklyReport {
        date: today,
        aggregates,
        best,
        worst,
        evaluations,
        predictions,
        weights,
    })
}

async fn evaluate_matured(
    ctx: &JobContext,
    today: NaiveDate,
    actuals: &[ActualPrice],
) -> Result<Vec<Evaluation>> {
    let prediction_rows = ctx.store.read(Table::Predictions).await?;
    if prediction_rows.is_empty() {
        debug!("WeeklyCycle: no past predictions stored");
        return Ok(Vec::new());
    }

    let mut matured = Vec::new();
    for row in &prediction_rows {
        let date = row_date(row)?;
        if is_matured(date, today, ctx.cycle.maturation_min_days, ctx.cycle.maturation_max_days) {
            matured.push(parse_past_prediction(row)?);
        }
    }

    if matured.is_empty() {
        info!("WeeklyCycle: no matured predictions to evaluate");
        return Ok(Vec::new());
    }

    info!(count = matured.len(), "WeeklyCycle: evaluating {} matured predictions", matured.len());
    let outcome = ctx
        .evaluator
        .evaluate_and_learn(&ctx.model, ctx.store.as_ref(), &matured, actuals, today)
        .await?;

    if let Some(ref metrics) = ctx.metrics {
        metrics.evaluations_recorded_total.inc_by(outcome.matched() as u64);
        if let Some(mae) = outcome.mean_absolute_error {
            metrics.mean_absolute_error.set(mae);
        }
    }
    Ok(outcome.evaluations)
}

pub(crate) async fn append_logged(ctx: &JobContext, table: Table, date: NaiveDate, rows: Vec<Row>) -> Result<()> {
    match ctx.store.append(table, date, rows).await? {
        AppendOutcome::Appended(count) => {
            debug!(table = %table, count, "appended {} rows to {}", count, table)
        }
        AppendOutcome::SkippedDuplicate => {
            warn!(table = %table, date = %date, "batch for {} already exists in {}, skipped", date, table)
        }
        AppendOutcome::Empty => debug!(table = %table, "nothing to append to {}", table),
    }
    Ok(())
}

fn record_metrics(ctx: &JobContext, predictions: &[Prediction], weights: &ModelWeights) {
    if let Some(ref metrics) = ctx.metrics {
        metrics.predictions_generated_total.inc_by(predictions.len() as u64);
        metrics.record_weights(weights.momentum, weights.volume, weights.sector);
    }
}
