//! Pure aggregation steps of the daily and weekly cycles

use crate::db::Row;
use crate::models::decimal::round_to;
use crate::models::market::{
    ActualPrice, DailyObservation, HistoryPoint, MarketObservation, SectorSummary, WeeklyAggregate,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

const OTHERS_SECTOR: &str = "Others";

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub company_name: String,
    pub sector: String,
}

/// Company name and sector of each symbol, from its first row in the raw table
pub fn symbol_infos(rows: &[Row]) -> HashMap<String, SymbolInfo> {
    let mut infos = HashMap::new();
    for row in rows {
        let Some(symbol) = row.get("Symbol").map(|s| s.trim()).filter(|s| !s.is_empty()) else {
            continue;
        };
        infos.entry(symbol.to_string()).or_insert_with(|| SymbolInfo {
            company_name: row.get("Company Name").cloned().unwrap_or_default(),
            sector: row.get("Sector").cloned().unwrap_or_default(),
        });
    }
    infos
}

/// Per-symbol daily history in first-seen symbol order, each sorted oldest first
#[derive(Debug, Clone, Default)]
pub struct HistoryBook {
    entries: Vec<(String, Vec<HistoryPoint>)>,
    index: HashMap<String, usize>,
}

impl HistoryBook {
    pub fn from_observations(observations: &[DailyObservation]) -> Self {
        let mut book = Self::default();
        for daily in observations {
            let symbol = &daily.observation.symbol;
            let slot = match book.index.get(symbol) {
                Some(&slot) => slot,
                None => {
                    book.entries.push((symbol.clone(), Vec::new()));
                    book.index.insert(symbol.clone(), book.entries.len() - 1);
                    book.entries.len() - 1
                }
            };
            book.entries[slot].1.push(daily.history_point());
        }
        for (_, points) in book.entries.iter_mut() {
            points.sort_by_key(|p| p.date);
        }
        book
    }

    pub fn history(&self, symbol: &str) -> &[HistoryPoint] {
        self.index
            .get(symbol)
            .map(|&slot| self.entries[slot].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HistoryPoint])> {
        self.entries.iter().map(|(s, p)| (s.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest known price of every symbol in the book
    pub fn latest_prices(&self) -> Vec<ActualPrice> {
        self.iter()
            .filter_map(|(symbol, points)| {
                points.last().map(|p| ActualPrice {
                    symbol: symbol.to_string(),
                    ltp: p.ltp,
                })
            })
            .collect()
    }
}

/// Aggregate the points dated after `week_start`; `None` with fewer than `min_points`
pub fn weekly_aggregate(
    symbol: &str,
    info: Option<&SymbolInfo>,
    points: &[HistoryPoint],
    week_start: NaiveDate,
    min_points: usize,
) -> Option<WeeklyAggregate> {
    let in_week: Vec<&HistoryPoint> = points.iter().filter(|p| p.date > week_start).collect();
    if in_week.len() < min_points.max(1) {
        return None;
    }

    let start = in_week[0];
    let end = in_week[in_week.len() - 1];
    if start.ltp == 0.0 {
        debug!(symbol = %symbol, "zero opening price, dropping from weekly aggregate");
        return None;
    }

    let percent_change = (end.ltp - start.ltp) / start.ltp * 100.0;
    Some(WeeklyAggregate {
        symbol: symbol.to_string(),
        company_name: info.map(|i| i.company_name.clone()).unwrap_or_default(),
        sector: info.map(|i| i.sector.clone()).unwrap_or_default(),
        ltp: end.ltp,
        volume: in_week.iter().map(|p| p.volume).sum(),
        percent_change: round_to(percent_change, 2),
        transactions: 0,
    })
}

pub fn weekly_aggregates(
    book: &HistoryBook,
    infos: &HashMap<String, SymbolInfo>,
    week_start: NaiveDate,
    min_points: usize,
) -> Vec<WeeklyAggregate> {
    book.iter()
        .filter_map(|(symbol, points)| {
            weekly_aggregate(symbol, infos.get(symbol), points, week_start, min_points)
        })
        .collect()
}

/// Top `limit` by weekly change, highest first; ties keep input order
pub fn rank_best(aggregates: &[WeeklyAggregate], limit: usize) -> Vec<WeeklyAggregate> {
    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));
    ranked.truncate(limit);
    ranked
}

/// Bottom `limit` by weekly change, lowest first; ties keep input order
pub fn rank_worst(aggregates: &[WeeklyAggregate], limit: usize) -> Vec<WeeklyAggregate> {
    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|a, b| a.percent_change.total_cmp(&b.percent_change));
    ranked.truncate(limit);
    ranked
}

/// A prediction is ready for evaluation when its age is within `[min_days, max_days]`
pub fn is_matured(prediction_date: NaiveDate, today: NaiveDate, min_days: i64, max_days: i64) -> bool {
    let age = (today - prediction_date).num_days().abs();
    (min_days..=max_days).contains(&age)
}

/// Daily best performers: change descending (unknown as 0), then volume descending
pub fn daily_top(observations: &[MarketObservation], limit: usize) -> Vec<MarketObservation> {
    let mut ranked = observations.to_vec();
    ranked.sort_by(|a, b| {
        let change_a = a.percent_change.unwrap_or(0.0);
        let change_b = b.percent_change.unwrap_or(0.0);
        change_b
            .total_cmp(&change_a)
            .then_with(|| b.volume.total_cmp(&a.volume))
    });
    ranked.truncate(limit);
    ranked
}

/// Per-sector average change and total volume, sectors in first-seen order
pub fn sector_summaries(observations: &[MarketObservation]) -> Vec<SectorSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (f64, f64, usize)> = HashMap::new();

    for observation in observations {
        let sector = if observation.sector.trim().is_empty() {
            OTHERS_SECTOR.to_string()
        } else {
            observation.sector.clone()
        };
        let entry = totals.entry(sector.clone()).or_insert_with(|| {
            order.push(sector.clone());
            (0.0, 0.0, 0)
        });
        entry.0 += observation.percent_change.unwrap_or(0.0);
        entry.1 += observation.volume;
        entry.2 += 1;
    }

    order
        .into_iter()
        .filter_map(|sector| {
            totals.get(&sector).map(|&(change, volume, count)| {
                SectorSummary::new(sector.clone(), change / count as f64, volume)
            })
        })
        .collect()
}
