//! Calendar feature extraction.
//!
//! Derives time-of-day and calendar scalars from the raw `Time`
//! ("HH:MM:SS") and `Date` ("YYYY-MM-DD") columns. Pure functions of the
//! input row; malformed strings yield `None` markers that the numeric
//! assembly converts to 0.0.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::table::Table;

/// Raw time column name.
pub const TIME_COLUMN: &str = "Time";

/// Raw calendar-date column name.
pub const DATE_COLUMN: &str = "Date";

/// Derived scalar features for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalendarRow {
    pub hour: Option<f64>,
    pub minute: Option<f64>,
    pub second: Option<f64>,
    pub seconds_since_midnight: Option<f64>,
    pub year: Option<f64>,
    pub month: Option<f64>,
    pub day: Option<f64>,
    pub weekday: Option<f64>,
    pub dayofyear: Option<f64>,
}

impl CalendarRow {
    /// Derived feature by column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "hour" => self.hour,
            "minute" => self.minute,
            "second" => self.second,
            "seconds_since_midnight" => self.seconds_since_midnight,
            "year" => self.year,
            "month" => self.month,
            "day" => self.day,
            "weekday" => self.weekday,
            "dayofyear" => self.dayofyear,
            _ => None,
        }
    }
}

/// Extracts calendar rows for a whole table, reading `Time` and `Date`.
pub fn extract(table: &Table) -> Vec<CalendarRow> {
    (0..table.len())
        .map(|i| extract_row(table.value(i, TIME_COLUMN), table.value(i, DATE_COLUMN)))
        .collect()
}

/// Extracts one row. Time and date degrade independently.
pub fn extract_row(time: Option<&str>, date: Option<&str>) -> CalendarRow {
    let mut row = CalendarRow::default();

    if let Some(t) = time.and_then(|s| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").ok()) {
        let (h, m, s) = (t.hour() as f64, t.minute() as f64, t.second() as f64);
        row.hour = Some(h);
        row.minute = Some(m);
        row.second = Some(s);
        row.seconds_since_midnight = Some(h * 3600.0 + m * 60.0 + s);
    }

    if let Some(d) = date.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()) {
        row.year = Some(d.year() as f64);
        row.month = Some(d.month() as f64);
        row.day = Some(d.day() as f64);
        // Monday = 0, matching the training convention
        row.weekday = Some(d.weekday().num_days_from_monday() as f64);
        row.dayofyear = Some(d.ordinal() as f64);
    }

    row
}
