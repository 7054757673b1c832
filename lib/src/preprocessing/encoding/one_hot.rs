//! One-hot (dummy) encoding of a categorical text column.
//!
//! Produces one indicator column per category present in the batch, named
//! `<prefix>_<category>` and ordered by category name. Nothing is fitted: a
//! batch without christmas rows simply has no `state_holiday_christmas`
//! column, and the schema projection drops whatever the model does not use.

use std::collections::BTreeSet;

/// One-hot encoder for a single text column.
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    prefix: String,
}

impl OneHotEncoder {
    /// Create an encoder whose output columns start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Encode `values` into named indicator columns.
    pub fn encode<S: AsRef<str>>(&self, values: &[S]) -> Vec<(String, Vec<f64>)> {
        let categories: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();

        categories
            .into_iter()
            .map(|category| {
                let column = values
                    .iter()
                    .map(|v| if v.as_ref() == category { 1.0 } else { 0.0 })
                    .collect();
                (format!("{}_{}", self.prefix, category), column)
            })
            .collect()
    }
}
