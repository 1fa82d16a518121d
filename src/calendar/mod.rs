//! NEPSE trading calendar: weekends, holidays and the holiday context of the
//! week following a reference date.
//!
//! The exchange trades Sunday through Thursday; Friday and Saturday are weekends.

pub mod clock;
pub mod holidays;

pub use clock::{Clock, FixedClock, SystemClock};
pub use holidays::{holiday_on, Holiday, HOLIDAYS};

use crate::error::{EngineError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const SHORT_WEEK_NOTE: &str = "Short Trading Week";
pub const INTERRUPTED_WEEK_NOTE: &str = "Trading Week interrupted by Holidays";
pub const FESTIVAL_SEASON_NOTE: &str = "Festival Season (Dashain/Tihar)";
pub const SPRING_HOLIDAYS_NOTE: &str = "Spring Holidays";

/// Days scanned after the reference date
const LOOKAHEAD_DAYS: i64 = 7;

/// Holiday classification of the week after a reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayContext {
    pub has_holiday: bool,
    pub count: usize,
    pub note: Option<String>,
}

impl HolidayContext {
    pub fn none() -> Self {
        Self {
            has_holiday: false,
            count: 0,
            note: None,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat)
}

pub fn is_trading_day(date: NaiveDate) -> bool {
    !is_weekend(date) && holiday_on(date).is_none()
}

/// Count holidays in the 7 days strictly after `reference` and classify the week
pub fn holiday_context(reference: NaiveDate) -> HolidayContext {
    let mut count = 0;
    let mut seasonal: Option<&'static str> = None;

    for offset in 1..=LOOKAHEAD_DAYS {
        let day = reference + Duration::days(offset);
        if holiday_on(day).is_none() {
            continue;
        }
        count += 1;
        match day.month() {
            10 | 11 => seasonal = Some(FESTIVAL_SEASON_NOTE),
            3 | 4 => seasonal = Some(SPRING_HOLIDAYS_NOTE),
            _ => {}
        }
    }

    match count {
        0 => HolidayContext::none(),
        1 => HolidayContext {
            has_holiday: true,
            count: 1,
            note: Some(SHORT_WEEK_NOTE.to_string()),
        },
        _ => HolidayContext {
            has_holiday: true,
            count,
            note: Some(seasonal.unwrap_or(INTERRUPTED_WEEK_NOTE).to_string()),
        },
    }
}

/// Parse a calendar date as written by the store (`YYYY-MM-DD` or an RFC 3339 timestamp)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|e| EngineError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
