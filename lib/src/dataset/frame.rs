//! Named numeric columns and the schema-checked model input built from them.

use ndarray::Array2;

use crate::dataset::schema::FEATURE_COLUMNS;
use crate::error::PipelineError;

/// A table of named `f64` columns, all of the same length.
///
/// Column order is insertion order. Inserting an existing name replaces the
/// column in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureFrame {
    n_rows: usize,
    columns: Vec<(String, Vec<f64>)>,
}

impl FeatureFrame {
    /// An empty frame with `n_rows` rows and no columns.
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            n_rows,
            columns: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Insert or replace a column.
    ///
    /// # Errors
    /// Returns [`PipelineError::FeatureMismatch`] if the column length differs
    /// from the frame's row count.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), PipelineError> {
        if values.len() != self.n_rows {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.n_rows,
                got_features: values.len(),
            });
        }
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, column)) => *column = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Select `schema` columns, in order, into a row-major matrix.
    ///
    /// Columns not named by `schema` are dropped.
    pub fn select(&self, schema: &[&str]) -> Result<Array2<f64>, PipelineError> {
        let mut matrix = Array2::zeros((self.n_rows, schema.len()));
        for (j, name) in schema.iter().enumerate() {
            let column = self
                .column(name)
                .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))?;
            for (i, &value) in column.iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        Ok(matrix)
    }

    /// Project onto the model input schema.
    pub fn project(&self) -> Result<ModelFeatures, PipelineError> {
        ModelFeatures::new(self.select(&FEATURE_COLUMNS)?)
    }
}

/// A feature matrix whose columns are exactly [`FEATURE_COLUMNS`], in order.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFeatures {
    matrix: Array2<f64>,
}

impl ModelFeatures {
    /// Wrap a matrix already laid out in schema order.
    ///
    /// # Errors
    /// Returns [`PipelineError::FeatureMismatch`] if the width is wrong.
    pub fn new(matrix: Array2<f64>) -> Result<Self, PipelineError> {
        if matrix.ncols() != FEATURE_COLUMNS.len() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: FEATURE_COLUMNS.len(),
                got_features: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Value of a named feature in row `row`.
    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        let col = crate::dataset::schema::feature_index(name)?;
        self.matrix.get([row, col]).copied()
    }

    pub fn into_matrix(self) -> Array2<f64> {
        self.matrix
    }
}
