//! Linear regression on the prepared feature row.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::dataset::N_FEATURES;
use crate::error::PipelineError;
use crate::model::InferenceModel;

/// Serializable parameters of a linear model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// One weight per model input column, in schema order.
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Fitted linear model: `w · x + b`.
#[derive(Clone, Debug)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearModel {
    pub fn from_params(params: LinearParams) -> Result<Self, PipelineError> {
        if params.weights.len() != N_FEATURES {
            return Err(PipelineError::FeatureMismatch {
                expected_features: N_FEATURES,
                got_features: params.weights.len(),
            });
        }
        if !params.bias.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(PipelineError::InvalidParameter(
                "linear model has non-finite coefficients".to_string(),
            ));
        }
        Ok(Self {
            weights: Array1::from(params.weights),
            bias: params.bias,
        })
    }

    pub fn extract_params(&self) -> LinearParams {
        LinearParams {
            weights: self.weights.to_vec(),
            bias: self.bias,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl InferenceModel for LinearModel {
    fn n_features_in(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&row) + self.bias
    }
}
