//! Cleaning stage: required-field checks, type fixing and imputation.

use chrono::{Datelike, NaiveDate};

use crate::dataset::RawRecord;
use crate::error::PipelineError;
use crate::pipeline::calendar::{month_abbreviation, parse_date};

/// Distance assigned to stores with no recorded competitor. Far beyond any
/// observed distance, so "no competitor" reads as "very distant competitor".
pub const DEFAULT_COMPETITION_DISTANCE: f64 = 200_000.0;

/// Promo interval of stores not taking part in a promo season.
pub const NO_PROMO_INTERVAL: &str = "0";

/// A record with snake_case fields, a parsed date and no missing values.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanRecord {
    /// Position of the record in the request.
    pub row: usize,
    pub store: f64,
    pub day_of_week: f64,
    pub date: NaiveDate,
    pub open: f64,
    pub promo: f64,
    pub state_holiday: String,
    pub school_holiday: f64,
    pub store_type: String,
    pub assortment: String,
    pub competition_distance: f64,
    pub competition_open_since_month: i64,
    pub competition_open_since_year: i64,
    pub promo2: f64,
    pub promo2_since_week: i64,
    pub promo2_since_year: i64,
    pub promo_interval: String,
    pub month_map: &'static str,
    pub is_promo: f64,
}

fn require<T>(value: Option<T>, row: usize, field: &'static str) -> Result<T, PipelineError> {
    value.ok_or(PipelineError::MissingField { row, field })
}

/// Whether `month` is one of the comma-separated months of `promo_interval`.
pub fn is_promo(promo_interval: &str, month: &str) -> bool {
    promo_interval != NO_PROMO_INTERVAL && promo_interval.split(',').any(|m| m == month)
}

/// Clean the record at position `row`.
pub fn clean_record(row: usize, raw: &RawRecord) -> Result<CleanRecord, PipelineError> {
    let date_text = require(raw.date.as_deref(), row, "date")?;
    let date = parse_date(date_text).ok_or_else(|| PipelineError::InvalidDate {
        row,
        value: date_text.to_string(),
    })?;

    let month_map = month_abbreviation(date);
    let promo_interval = raw
        .promo_interval
        .clone()
        .unwrap_or_else(|| NO_PROMO_INTERVAL.to_string());
    let is_promo = if is_promo(&promo_interval, month_map) { 1.0 } else { 0.0 };

    let year = i64::from(date.year());
    Ok(CleanRecord {
        row,
        store: require(raw.store, row, "store")?,
        day_of_week: require(raw.day_of_week, row, "day_of_week")?,
        date,
        open: require(raw.open, row, "open")?,
        promo: require(raw.promo, row, "promo")?,
        state_holiday: require(raw.state_holiday.clone(), row, "state_holiday")?,
        school_holiday: require(raw.school_holiday, row, "school_holiday")?,
        store_type: require(raw.store_type.clone(), row, "store_type")?,
        assortment: require(raw.assortment.clone(), row, "assortment")?,
        competition_distance: raw
            .competition_distance
            .unwrap_or(DEFAULT_COMPETITION_DISTANCE),
        competition_open_since_month: raw
            .competition_open_since_month
            .map_or(i64::from(date.month()), truncate),
        competition_open_since_year: raw.competition_open_since_year.map_or(year, truncate),
        promo2: require(raw.promo2, row, "promo2")?,
        promo2_since_week: raw
            .promo2_since_week
            .map_or(i64::from(date.iso_week().week()), truncate),
        promo2_since_year: raw.promo2_since_year.map_or(year, truncate),
        promo_interval,
        month_map,
        is_promo,
    })
}

/// Clean every record, stopping at the first invalid one.
pub fn clean_records<'a, I>(raws: I) -> Result<Vec<CleanRecord>, PipelineError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    raws.into_iter()
        .enumerate()
        .map(|(row, raw)| clean_record(row, raw))
        .collect()
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
