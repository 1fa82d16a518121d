//! Unit tests for the trading calendar

use chrono::NaiveDate;
use nepse_pulse::calendar::{
    format_date, holiday_context, holiday_on, is_trading_day, is_weekend, parse_date, Clock,
    FixedClock, FESTIVAL_SEASON_NOTE, SHORT_WEEK_NOTE,
};
use nepse_pulse::EngineError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn friday_and_saturday_are_weekends() {
    assert!(is_weekend(date(2024, 6, 14))); // Friday
    assert!(is_weekend(date(2024, 6, 15))); // Saturday
    assert!(!is_weekend(date(2024, 6, 16))); // Sunday
    assert!(!is_weekend(date(2024, 6, 13))); // Thursday
}

#[test]
fn holidays_are_not_trading_days() {
    assert!(holiday_on(date(2024, 10, 13)).is_some());
    assert!(!is_trading_day(date(2024, 10, 13)));
    assert!(is_trading_day(date(2024, 6, 16)));
}

#[test]
fn single_holiday_next_day_is_short_week() {
    let context = holiday_context(date(2024, 1, 14));
    assert!(context.has_holiday);
    assert_eq!(context.count, 1);
    assert_eq!(context.note.as_deref(), Some(SHORT_WEEK_NOTE));
}

#[test]
fn clustered_october_holidays_get_festival_label() {
    let context = holiday_context(date(2024, 10, 9));
    assert!(context.has_holiday);
    assert!(context.count >= 3);
    assert_eq!(context.note.as_deref(), Some(FESTIVAL_SEASON_NOTE));
}

#[test]
fn reference_day_itself_is_not_scanned() {
    // 2024-01-15 is a holiday, but only the following seven days count
    let context = holiday_context(date(2024, 1, 15));
    assert!(!context.has_holiday);
    assert_eq!(context.count, 0);
    assert_eq!(context.note, None);
}

#[test]
fn quiet_week_has_no_context() {
    let context = holiday_context(date(2024, 6, 14));
    assert_eq!(context, nepse_pulse::calendar::HolidayContext::none());
}

#[test]
fn parse_date_accepts_plain_and_timestamp_forms() {
    assert_eq!(parse_date("2024-06-14").unwrap(), date(2024, 6, 14));
    assert_eq!(parse_date(" 2024-06-14 ").unwrap(), date(2024, 6, 14));
    assert_eq!(
        parse_date("2024-06-14T09:20:00Z").unwrap(),
        date(2024, 6, 14)
    );
    assert_eq!(format_date(date(2024, 6, 4)), "2024-06-04");
}

#[test]
fn parse_date_rejects_garbage() {
    let err = parse_date("last tuesday").unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate { .. }));
}

#[test]
fn fixed_clock_returns_its_date() {
    let clock = FixedClock(date(2024, 6, 14));
    assert_eq!(clock.today(), date(2024, 6, 14));
}
