//! Decoding request bodies into records.
//!
//! A body may hold one record, an array of records, records keyed by row
//! label, or a column-oriented table keyed by field name. All four decode to
//! the same ordered list of [`InputRecord`]s.

use std::io::Read;

use serde_json::{Map, Number, Value};

use crate::dataset::record::{is_raw_field, InputRecord, RawRecord};
use crate::error::PipelineError;

/// A decoded request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Nothing was sent (blank body, `null`, `{}` or `[]`).
    Empty,
    /// One or more records, in request order.
    Records(Vec<InputRecord>),
}

impl RequestBody {
    /// Number of decoded records.
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Records(records) => records.len(),
        }
    }

    /// Whether no records were decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a JSON request body.
pub fn decode_json(body: &str) -> Result<RequestBody, PipelineError> {
    if body.trim().is_empty() {
        return Ok(RequestBody::Empty);
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| PipelineError::MalformedInput(e.to_string()))?;
    decode_value(value)
}

/// Decode an already-parsed JSON value.
pub fn decode_value(value: Value) -> Result<RequestBody, PipelineError> {
    match value {
        Value::Null => Ok(RequestBody::Empty),
        Value::Array(items) if items.is_empty() => Ok(RequestBody::Empty),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(row, item)| record_from_value(row, item))
            .collect::<Result<Vec<_>, _>>()
            .map(RequestBody::Records),
        Value::Object(map) if map.is_empty() => Ok(RequestBody::Empty),
        Value::Object(map) => {
            if !map.values().all(Value::is_object) {
                return Ok(RequestBody::Records(vec![InputRecord::from_map(0, map)?]));
            }
            if map.keys().any(|k| is_raw_field(k)) {
                decode_columns(map)
            } else {
                map.into_iter()
                    .enumerate()
                    .map(|(row, (_, item))| record_from_value(row, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(RequestBody::Records)
            }
        }
        other => Err(PipelineError::MalformedInput(format!(
            "expected a record object or a collection of records, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode CSV with a header row of field names. Empty cells are missing values.
pub fn decode_csv<R: Read>(reader: R) -> Result<RequestBody, PipelineError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| PipelineError::MalformedInput(e.to_string()))?
        .clone();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let fields = result.map_err(|e| PipelineError::MalformedInput(e.to_string()))?;
        let raw: RawRecord = fields
            .deserialize(Some(&headers))
            .map_err(|e| PipelineError::MalformedInput(format!("record {}: {}", row, e)))?;
        let original = headers
            .iter()
            .zip(fields.iter())
            .map(|(name, cell)| (name.to_string(), csv_cell_value(cell)))
            .collect();
        records.push(InputRecord { raw, original });
    }

    if records.is_empty() {
        Ok(RequestBody::Empty)
    } else {
        Ok(RequestBody::Records(records))
    }
}

fn record_from_value(row: usize, value: Value) -> Result<InputRecord, PipelineError> {
    match value {
        Value::Object(map) => InputRecord::from_map(row, map),
        other => Err(PipelineError::MalformedInput(format!(
            "record {} is {}, expected an object",
            row,
            json_kind(&other)
        ))),
    }
}

/// `{"Store": {"0": 1, "1": 2}, "Date": {"0": ..., "1": ...}}`
///
/// Every column must carry the same row labels.
fn decode_columns(columns: Map<String, Value>) -> Result<RequestBody, PipelineError> {
    let labels: Vec<String> = match columns.values().next() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };
    for (name, column) in &columns {
        let matches = match column {
            Value::Object(cells) => {
                cells.len() == labels.len() && labels.iter().all(|l| cells.contains_key(l))
            }
            _ => false,
        };
        if !matches {
            return Err(PipelineError::MalformedInput(format!(
                "column '{}' does not carry the same row labels as the other columns",
                name
            )));
        }
    }
    if labels.is_empty() {
        return Ok(RequestBody::Empty);
    }

    let mut records = Vec::with_capacity(labels.len());
    for (row, label) in labels.iter().enumerate() {
        let original: Map<String, Value> = columns
            .iter()
            .map(|(name, column)| (name.clone(), column[label.as_str()].clone()))
            .collect();
        records.push(InputRecord::from_map(row, original)?);
    }
    Ok(RequestBody::Records(records))
}

fn csv_cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
