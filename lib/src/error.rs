//! Error types for the inference pipeline.

use std::io;

use thiserror::Error;

/// Error type for every stage of the inference pipeline.
///
/// Row indices refer to the position of the record in the decoded request,
/// counting from zero.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input field is absent or null.
    #[error("record {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
    /// The sale date could not be parsed.
    #[error("record {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },
    /// A calendar-valued field is outside its valid range.
    #[error("record {row}: field '{field}' has out-of-range value {value}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
    /// A categorical code is outside the known set.
    #[error("record {row}: unknown {field} code '{value}'")]
    UnknownCategory {
        row: usize,
        field: &'static str,
        value: String,
    },
    /// The request body is not shaped like a set of records.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// The feature table lacks a column the model requires.
    #[error("feature table is missing required column '{0}'")]
    MissingColumn(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Invalid fitted parameter or artifact contents.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Numerical computation error (overflow, non-finite output).
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

impl PipelineError {
    /// Whether the error was caused by the request contents rather than by the
    /// service's own artifacts.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingField { .. }
                | PipelineError::InvalidDate { .. }
                | PipelineError::InvalidField { .. }
                | PipelineError::UnknownCategory { .. }
                | PipelineError::MalformedInput(_)
        )
    }
}
