//! Daily cycle: snapshot the live market, rank the day, summarize sectors

use crate::db::rows::{observation_row, sector_summary_row};
use crate::db::Table;
use crate::error::Result;
use crate::jobs::aggregation::{daily_top, sector_summaries};
use crate::jobs::context::JobContext;
use crate::jobs::types::DailyReport;
use crate::jobs::weekly::append_logged;
use tracing::info;

pub async fn run_daily_cycle(ctx: &JobContext) -> Result<DailyReport> {
    let today = ctx.clock.today();
    info!(date = %today, "DailyCycle: fetching live market data");

    let observations = ctx.feed.fetch_live_market_data().await?;
    if observations.is_empty() {
        info!("DailyCycle: market feed returned no data, skipping");
        return Ok(DailyReport::default());
    }

    let raw = observations.iter().map(|o| observation_row(today, o)).collect();
    append_logged(ctx, Table::DailyRawData, today, raw).await?;

    let top = daily_top(&observations, ctx.cycle.top_list_size);
    let top_rows = top.iter().map(|o| observation_row(today, o)).collect();
    append_logged(ctx, Table::DailyTop50, today, top_rows).await?;

    let sectors = sector_summaries(&observations);
    let sector_rows = sectors.iter().map(|s| sector_summary_row(today, s)).collect();
    append_logged(ctx, Table::SectorSummary, today, sector_rows).await?;

    info!(
        observations = observations.len(),
        sectors = sectors.len(),
        "DailyCycle: stored {} observations across {} sectors",
        observations.len(),
        sectors.len()
    );

    Ok(DailyReport {
        date: Some(today),
        observations: observations.len(),
        top,
        sectors,
    })
}
