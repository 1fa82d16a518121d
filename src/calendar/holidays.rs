//! Fixed NEPSE holiday table

use chrono::{Datelike, NaiveDate};

/// Market holiday (year, month, day, name)
pub struct Holiday {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub name: &'static str,
}

const fn holiday(year: i32, month: u32, day: u32, name: &'static str) -> Holiday {
    Holiday {
        year,
        month,
        day,
        name,
    }
}

pub const HOLIDAYS: &[Holiday] = &[
    holiday(2024, 1, 15, "Maghe Sankranti"),
    holiday(2024, 1, 30, "Martyrs Day"),
    holiday(2024, 3, 8, "Maha Shivaratri"),
    holiday(2024, 3, 24, "Fagu Purnima"),
    holiday(2024, 4, 13, "New Year 2081"),
    holiday(2024, 5, 23, "Buddha Jayanti"),
    holiday(2024, 10, 3, "Ghatasthapana"),
    holiday(2024, 10, 10, "Fulpati"),
    holiday(2024, 10, 11, "Maha Ashtami"),
    holiday(2024, 10, 12, "Maha Nawami"),
    holiday(2024, 10, 13, "Vijaya Dashami"),
    holiday(2024, 10, 14, "Ekadashi"),
    holiday(2024, 10, 30, "Laxmi Puja"),
    holiday(2024, 11, 1, "Govardhan Puja"),
    holiday(2024, 11, 2, "Bhai Tika"),
    holiday(2025, 1, 14, "Maghe Sankranti"),
    holiday(2025, 10, 1, "Dashain"),
];

/// Holiday falling on `date`, if any
pub fn holiday_on(date: NaiveDate) -> Option<&'static Holiday> {
    HOLIDAYS
        .iter()
        .find(|h| h.year == date.year() && h.month == date.month() && h.day == date.day())
}
