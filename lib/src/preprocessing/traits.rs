//! Core trait for fitted preprocessing transformers.
//!
//! Transformers in this crate are only ever *applied*: their statistics come
//! from the training run and are loaded from artifacts. Refitting at inference
//! time would shift the feature distribution the model was trained on.

use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineError;
use crate::serialization::{load_artifact, save_artifact};

/// Trait for fitted transformers ready for inference.
///
/// A fitted transformer holds learned parameters (e.g. `data_min_` and
/// `data_max_` for a min-max scaler) and transforms column-major feature
/// matrices of shape `(n_samples, n_features)`.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` accept `.json` and `.bin` paths.
pub trait FittedTransformer: Sized {
    /// Serializable representation of learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PipelineError::FeatureMismatch`] if the number of columns
    /// differs from the number of features seen during fit.
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PipelineError>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PipelineError> {
        save_artifact(path, &self.extract_params())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PipelineError> {
        let params: Self::Params = load_artifact(path)?;
        Self::from_params(params)
    }

    /// Transform a single feature column.
    fn transform_column(&self, column: &[f64]) -> Result<Vec<f64>, PipelineError> {
        let data = Array2::from_shape_vec((column.len(), 1), column.to_vec())
            .map_err(|e| PipelineError::InvalidParameter(e.to_string()))?;
        Ok(self.transform(&data)?.column(0).to_vec())
    }
}

/// Check a matrix width against the fitted feature count.
pub(crate) fn check_features(data: &Array2<f64>, expected: usize) -> Result<(), PipelineError> {
    let got = data.ncols();
    if got != expected {
        return Err(PipelineError::FeatureMismatch {
            expected_features: expected,
            got_features: got,
        });
    }
    Ok(())
}

/// Replace zero scale factors by one, so constant training features map to a
/// constant instead of dividing by zero.
pub(crate) fn handle_zeros_in_scale(scale: &[f64]) -> Vec<f64> {
    scale
        .iter()
        .map(|&s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
        .collect()
}
