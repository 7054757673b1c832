//! Feature engineering stage: calendar features, elapsed competition and
//! promotion time, categorical recoding and the closed-store filter.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::PipelineError;
use crate::pipeline::calendar::{monday_of_w_week, year_week};
use crate::pipeline::cleaning::CleanRecord;

/// Product-range tier of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Assortment {
    Basic,
    Extra,
    Extended,
}

impl Assortment {
    /// Recode a raw assortment code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(Assortment::Basic),
            "b" => Some(Assortment::Extra),
            "c" => Some(Assortment::Extended),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Assortment::Basic => "basic",
            Assortment::Extra => "extra",
            Assortment::Extended => "extended",
        }
    }
}

/// Kind of state holiday on the sale date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateHoliday {
    PublicHoliday,
    EasterHoliday,
    Christmas,
    RegularDay,
}

impl StateHoliday {
    /// Recode a raw state-holiday code. Anything but `a`, `b` or `c` is a
    /// regular day.
    pub fn from_code(code: &str) -> Self {
        match code {
            "a" => StateHoliday::PublicHoliday,
            "b" => StateHoliday::EasterHoliday,
            "c" => StateHoliday::Christmas,
            _ => StateHoliday::RegularDay,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateHoliday::PublicHoliday => "public_holiday",
            StateHoliday::EasterHoliday => "easter_holiday",
            StateHoliday::Christmas => "christmas",
            StateHoliday::RegularDay => "regular_day",
        }
    }
}

/// A cleaned record with derived features. `open`, `promo_interval` and
/// `month_map` have been dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineeredRecord {
    pub row: usize,
    pub store: f64,
    pub day_of_week: f64,
    pub date: NaiveDate,
    pub promo: f64,
    pub state_holiday: StateHoliday,
    pub school_holiday: f64,
    pub store_type: String,
    pub assortment: Assortment,
    pub competition_distance: f64,
    pub competition_open_since_month: i64,
    pub competition_open_since_year: i64,
    pub promo2: f64,
    pub promo2_since_week: i64,
    pub promo2_since_year: i64,
    pub is_promo: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub week_of_year: u32,
    pub year_week: String,
    pub competition_since: NaiveDate,
    pub competition_time_month: i64,
    pub promo_since: NaiveDate,
    pub promo_time_week: i64,
}

/// First day of the month the nearest competitor opened.
fn competition_since(record: &CleanRecord) -> Result<NaiveDate, PipelineError> {
    let invalid = |field: &'static str, value: i64| PipelineError::InvalidField {
        row: record.row,
        field,
        value: value.to_string(),
    };
    let year = i32::try_from(record.competition_open_since_year)
        .map_err(|_| invalid("competition_open_since_year", record.competition_open_since_year))?;
    let month = u32::try_from(record.competition_open_since_month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| {
            invalid(
                "competition_open_since_month",
                record.competition_open_since_month,
            )
        })?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| invalid("competition_open_since_year", record.competition_open_since_year))
}

/// Monday one week before the start of the promo2 week.
fn promo_since(record: &CleanRecord) -> Result<NaiveDate, PipelineError> {
    let invalid = |field: &'static str, value: i64| PipelineError::InvalidField {
        row: record.row,
        field,
        value: value.to_string(),
    };
    let year = i32::try_from(record.promo2_since_year)
        .map_err(|_| invalid("promo2_since_year", record.promo2_since_year))?;
    let week = u32::try_from(record.promo2_since_week)
        .map_err(|_| invalid("promo2_since_week", record.promo2_since_week))?;
    monday_of_w_week(year, week)
        .and_then(|monday| monday.checked_sub_signed(Duration::days(7)))
        .ok_or_else(|| invalid("promo2_since_week", record.promo2_since_week))
}

/// Derive features for one cleaned record.
pub fn engineer_record(record: CleanRecord) -> Result<EngineeredRecord, PipelineError> {
    let assortment =
        Assortment::from_code(&record.assortment).ok_or_else(|| PipelineError::UnknownCategory {
            row: record.row,
            field: "assortment",
            value: record.assortment.clone(),
        })?;
    let competition_since = competition_since(&record)?;
    let promo_since = promo_since(&record)?;
    let date = record.date;

    // Month and week lengths are approximated as 30 and 7 days.
    let competition_time_month = (date - competition_since).num_days().div_euclid(30);
    let promo_time_week = (date - promo_since).num_days().div_euclid(7);

    Ok(EngineeredRecord {
        row: record.row,
        store: record.store,
        day_of_week: record.day_of_week,
        date,
        promo: record.promo,
        state_holiday: StateHoliday::from_code(&record.state_holiday),
        school_holiday: record.school_holiday,
        store_type: record.store_type,
        assortment,
        competition_distance: record.competition_distance,
        competition_open_since_month: record.competition_open_since_month,
        competition_open_since_year: record.competition_open_since_year,
        promo2: record.promo2,
        promo2_since_week: record.promo2_since_week,
        promo2_since_year: record.promo2_since_year,
        is_promo: record.is_promo,
        year: date.year(),
        month: date.month(),
        day: date.day(),
        week_of_year: date.iso_week().week(),
        year_week: year_week(date),
        competition_since,
        competition_time_month,
        promo_since,
        promo_time_week,
    })
}

/// Derive features for every record and drop closed store-days.
///
/// Every record is validated, closed ones included; the survivors keep their
/// request order.
pub fn engineer_records(records: Vec<CleanRecord>) -> Result<Vec<EngineeredRecord>, PipelineError> {
    let mut engineered = Vec::with_capacity(records.len());
    for record in records {
        let open = record.open;
        let record = engineer_record(record)?;
        if open != 0.0 {
            engineered.push(record);
        }
    }
    Ok(engineered)
}
