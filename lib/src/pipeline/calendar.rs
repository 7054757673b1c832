//! Date helpers shared by the cleaning and feature engineering stages.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Month abbreviations used by the promo-interval column. September is
/// `Sept`, as written in the store metadata.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a sale date. Accepts `YYYY-MM-DD`, a naive datetime with `T` or a
/// space separator, or an RFC 3339 timestamp; only the date part is kept.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Abbreviated month name of `date`.
pub fn month_abbreviation(date: NaiveDate) -> &'static str {
    MONTH_ABBREVIATIONS[date.month0() as usize]
}

/// `%Y-%W`: year and Monday-first week number, zero padded.
pub fn year_week(date: NaiveDate) -> String {
    date.format("%Y-%W").to_string()
}

/// Monday of week `week` of `year` under `%W` numbering.
///
/// Week 0 is the partial week before the year's first Monday, so its Monday
/// usually falls in December of the previous year. Returns `None` for a week
/// outside `0..=53` or a year chrono cannot represent.
pub fn monday_of_w_week(year: i32, week: u32) -> Option<NaiveDate> {
    if week > 53 {
        return None;
    }
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_weekday = i64::from(jan1.weekday().num_days_from_monday());
    let offset = if week == 0 {
        -first_weekday
    } else {
        let week_0_length = (7 - first_weekday) % 7;
        week_0_length + 7 * (i64::from(week) - 1)
    };
    jan1.checked_add_signed(Duration::days(offset))
}

/// Render a date the way the response carries it: `YYYY-MM-DDT00:00:00.000Z`.
pub fn iso_timestamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00.000Z").to_string()
}
