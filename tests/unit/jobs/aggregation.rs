//! Unit tests for weekly and daily aggregation steps

use chrono::{Duration, NaiveDate};
use nepse_pulse::db::Row;
use nepse_pulse::jobs::aggregation::{
    daily_top, is_matured, rank_best, rank_worst, sector_summaries, symbol_infos,
    weekly_aggregate, HistoryBook, SymbolInfo,
};
use nepse_pulse::models::market::{DailyObservation, HistoryPoint, MarketObservation, WeeklyAggregate};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn point(d: u32, ltp: f64, volume: f64) -> HistoryPoint {
    HistoryPoint {
        date: date(d),
        ltp,
        volume,
        percent_change: Some(0.0),
    }
}

fn observation(symbol: &str, sector: &str, volume: f64, change: Option<f64>) -> MarketObservation {
    MarketObservation {
        symbol: symbol.to_string(),
        company_name: format!("{} Ltd.", symbol),
        sector: sector.to_string(),
        ltp: 100.0,
        volume,
        percent_change: change,
        transactions: 0,
    }
}

fn aggregate(symbol: &str, change: f64) -> WeeklyAggregate {
    WeeklyAggregate {
        symbol: symbol.to_string(),
        company_name: String::new(),
        sector: String::new(),
        ltp: 100.0,
        volume: 0.0,
        percent_change: change,
        transactions: 0,
    }
}

#[test]
fn weekly_aggregate_uses_points_inside_week() {
    let info = SymbolInfo {
        company_name: "National Hydro".to_string(),
        sector: "Hydropower".to_string(),
    };
    let points = [
        point(5, 90.0, 999.0),
        point(9, 105.0, 100.0),
        point(11, 107.0, 200.0),
        point(13, 110.0, 300.0),
    ];
    let week = weekly_aggregate("NHPC", Some(&info), &points, date(7), 2).unwrap();

    assert_eq!(week.ltp, 110.0);
    assert_eq!(week.volume, 600.0);
    assert_eq!(week.percent_change, 4.76);
    assert_eq!(week.sector, "Hydropower");
    assert_eq!(week.company_name, "National Hydro");
}

#[test]
fn weekly_aggregate_needs_two_points() {
    let points = [point(5, 90.0, 1.0), point(12, 100.0, 1.0)];
    assert!(weekly_aggregate("X", None, &points, date(7), 2).is_none());
}

#[test]
fn weekly_aggregate_drops_zero_opening_price() {
    let points = [point(9, 0.0, 1.0), point(12, 100.0, 1.0)];
    assert!(weekly_aggregate("X", None, &points, date(7), 2).is_none());
}

#[test]
fn history_book_sorts_and_keeps_first_seen_order() {
    let daily = |d: u32, symbol: &str, ltp: f64| DailyObservation {
        date: date(d),
        observation: MarketObservation {
            ltp,
            ..observation(symbol, "Hydropower", 1.0, None)
        },
    };
    let book = HistoryBook::from_observations(&[
        daily(12, "B", 20.0),
        daily(10, "A", 10.0),
        daily(9, "B", 19.0),
        daily(11, "A", 11.0),
    ]);

    let symbols: Vec<&str> = book.iter().map(|(s, _)| s).collect();
    assert_eq!(symbols, vec!["B", "A"]);
    assert_eq!(book.history("B")[0].date, date(9));
    assert!(book.history("C").is_empty());

    let latest = book.latest_prices();
    assert_eq!(latest[0].symbol, "B");
    assert_eq!(latest[0].ltp, 20.0);
    assert_eq!(latest[1].ltp, 11.0);
}

#[test]
fn symbol_info_comes_from_first_row() {
    let row = |name: &str, sector: &str| -> Row {
        [("Symbol", "NHPC"), ("Company Name", name), ("Sector", sector)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };
    let infos = symbol_infos(&[row("Old Name", "Hydropower"), row("New Name", "Others")]);
    assert_eq!(infos["NHPC"].company_name, "Old Name");
    assert_eq!(infos["NHPC"].sector, "Hydropower");
}

#[test]
fn ranking_is_stable() {
    let aggregates = [
        aggregate("A", 1.0),
        aggregate("B", 3.0),
        aggregate("C", 1.0),
        aggregate("D", -2.0),
    ];

    let best: Vec<String> = rank_best(&aggregates, 50).into_iter().map(|a| a.symbol).collect();
    assert_eq!(best, vec!["B", "A", "C", "D"]);

    let worst: Vec<String> = rank_worst(&aggregates, 3).into_iter().map(|a| a.symbol).collect();
    assert_eq!(worst, vec!["D", "A", "C"]);
}

#[test]
fn maturation_window_is_inclusive() {
    let today = date(14);
    assert!(!is_matured(today - Duration::days(4), today, 5, 10));
    assert!(is_matured(today - Duration::days(5), today, 5, 10));
    assert!(is_matured(today - Duration::days(7), today, 5, 10));
    assert!(is_matured(today - Duration::days(10), today, 5, 10));
    assert!(!is_matured(today - Duration::days(11), today, 5, 10));
}

#[test]
fn daily_top_orders_by_change_then_volume() {
    let ranked = daily_top(
        &[
            observation("FLAT", "", 500.0, None),
            observation("UP", "", 10.0, Some(4.0)),
            observation("ZERO", "", 900.0, Some(0.0)),
            observation("DOWN", "", 10_000.0, Some(-1.0)),
        ],
        3,
    );
    let symbols: Vec<&str> = ranked.iter().map(|o| o.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["UP", "ZERO", "FLAT"]);
}

#[test]
fn sector_summary_groups_missing_sector_as_others() {
    let summaries = sector_summaries(&[
        observation("A", "Hydropower", 100.0, Some(1.0)),
        observation("B", "", 50.0, Some(3.0)),
        observation("C", "Hydropower", 300.0, Some(2.0)),
        observation("D", "  ", 25.0, None),
    ]);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].sector, "Hydropower");
    assert_eq!(summaries[0].avg_change, 1.5);
    assert_eq!(summaries[0].total_volume, 400.0);
    assert_eq!(summaries[1].sector, "Others");
    assert_eq!(summaries[1].avg_change, 1.5);
    assert_eq!(summaries[1].total_volume, 75.0);
}
