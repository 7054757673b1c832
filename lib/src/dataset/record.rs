//! Raw store-day records as they arrive in a request.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PipelineError;

/// Field names of a raw record, in the order the upstream exports them.
pub const RAW_FIELDS: [&str; 16] = [
    "Store",
    "DayOfWeek",
    "Date",
    "Open",
    "Promo",
    "StateHoliday",
    "SchoolHoliday",
    "StoreType",
    "Assortment",
    "CompetitionDistance",
    "CompetitionOpenSinceMonth",
    "CompetitionOpenSinceYear",
    "Promo2",
    "Promo2SinceWeek",
    "Promo2SinceYear",
    "PromoInterval",
];

/// Normalize a column name to snake_case (`Promo2SinceWeek` -> `promo2_since_week`).
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch == '-' || ch == ' ' {
            out.push('_');
        } else if ch.is_ascii_uppercase() {
            if matches!(prev, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    out
}

/// Whether `key` names one of the raw record fields, in either spelling.
pub fn is_raw_field(key: &str) -> bool {
    let key = normalize_column_name(key);
    RAW_FIELDS.iter().any(|f| normalize_column_name(f) == key)
}

/// One store-day observation, exactly as received.
///
/// Every field is optional here; which ones are required, and how missing
/// values are filled, is decided by the cleaning stage. Fields are accepted
/// under their upstream name (`CompetitionDistance`) or their normalized name
/// (`competition_distance`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    #[serde(default, alias = "store", deserialize_with = "lenient_number")]
    pub store: Option<f64>,
    #[serde(default, alias = "day_of_week", deserialize_with = "lenient_number")]
    pub day_of_week: Option<f64>,
    #[serde(default, alias = "date", deserialize_with = "lenient_code")]
    pub date: Option<String>,
    #[serde(default, alias = "open", deserialize_with = "lenient_number")]
    pub open: Option<f64>,
    #[serde(default, alias = "promo", deserialize_with = "lenient_number")]
    pub promo: Option<f64>,
    #[serde(default, alias = "state_holiday", deserialize_with = "lenient_code")]
    pub state_holiday: Option<String>,
    #[serde(default, alias = "school_holiday", deserialize_with = "lenient_number")]
    pub school_holiday: Option<f64>,
    #[serde(default, alias = "store_type", deserialize_with = "lenient_code")]
    pub store_type: Option<String>,
    #[serde(default, alias = "assortment", deserialize_with = "lenient_code")]
    pub assortment: Option<String>,
    #[serde(default, alias = "competition_distance", deserialize_with = "lenient_number")]
    pub competition_distance: Option<f64>,
    #[serde(
        default,
        alias = "competition_open_since_month",
        deserialize_with = "lenient_number"
    )]
    pub competition_open_since_month: Option<f64>,
    #[serde(
        default,
        alias = "competition_open_since_year",
        deserialize_with = "lenient_number"
    )]
    pub competition_open_since_year: Option<f64>,
    #[serde(default, alias = "promo2", deserialize_with = "lenient_number")]
    pub promo2: Option<f64>,
    #[serde(default, alias = "promo2_since_week", deserialize_with = "lenient_number")]
    pub promo2_since_week: Option<f64>,
    #[serde(default, alias = "promo2_since_year", deserialize_with = "lenient_number")]
    pub promo2_since_year: Option<f64>,
    #[serde(default, alias = "promo_interval", deserialize_with = "lenient_code")]
    pub promo_interval: Option<String>,
}

/// A decoded record together with the object it was decoded from.
///
/// The original object is what the response echoes back, so fields the
/// pipeline ignores (an `Id`, say) survive the round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct InputRecord {
    pub raw: RawRecord,
    pub original: Map<String, Value>,
}

impl InputRecord {
    /// Decode the record at position `row` from a JSON object.
    pub fn from_map(row: usize, original: Map<String, Value>) -> Result<Self, PipelineError> {
        let raw = RawRecord::deserialize(Value::Object(original.clone()))
            .map_err(|e| PipelineError::MalformedInput(format!("record {}: {}", row, e)))?;
        Ok(Self { raw, original })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept a number, a numeric string, or null. NaN and empty strings are missing.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LooseScalar>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(LooseScalar::Bool(b)) => f64::from(u8::from(b)),
        Some(LooseScalar::Int(i)) => i as f64,
        Some(LooseScalar::Float(f)) => f,
        Some(LooseScalar::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s)))?
        }
    };
    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Accept a string or a number as a categorical code. `0` and `0.0` both
/// become `"0"`.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        None => None,
        Some(LooseScalar::Bool(b)) => Some(b.to_string()),
        Some(LooseScalar::Int(i)) => Some(i.to_string()),
        Some(LooseScalar::Float(f)) if f.is_nan() => None,
        Some(LooseScalar::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
            Some((f as i64).to_string())
        }
        Some(LooseScalar::Float(f)) => Some(f.to_string()),
        Some(LooseScalar::Text(s)) => Some(s),
    })
}
