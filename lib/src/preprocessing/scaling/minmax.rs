//! Min-Max Scaler.
//!
//! Scales each feature to a target range (default [0, 1]) using the minimum and
//! maximum observed during training.
//!
//! The transformation is given by:
//! ```text
//! X_scaled = X * scale_ + min_
//! scale_   = (max - min) / (data_max_ - data_min_)
//! min_     = min - data_min_ * scale_
//! ```
//!
//! # Example
//! ```ignore
//! use rossmann_rs::preprocessing::{FittedMinMaxScaler, FittedTransformer, MinMaxScalerParams};
//!
//! let scaler = FittedMinMaxScaler::from_params(MinMaxScalerParams {
//!     config: Default::default(),
//!     data_min_: vec![2013.0],
//!     data_max_: vec![2015.0],
//! })?;
//! let scaled = scaler.transform_column(&[2014.0])?;
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::traits::{check_features, handle_zeros_in_scale, FittedTransformer};

/// Target range of a min-max scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Minimum value of the target range.
    pub min: f64,
    /// Maximum value of the target range.
    pub max: f64,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Target range.
    #[serde(default)]
    pub config: MinMaxScalerConfig,
    /// Minimum of each feature seen during fit.
    pub data_min_: Vec<f64>,
    /// Maximum of each feature seen during fit.
    pub data_max_: Vec<f64>,
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler {
    config: MinMaxScalerConfig,
    data_min_: Vec<f64>,
    data_max_: Vec<f64>,
    scale_: Vec<f64>,
    min_: Vec<f64>,
}

impl FittedTransformer for FittedMinMaxScaler {
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.data_min_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (scale, offset) = (self.scale_[j], self.min_[j]);
            col.mapv_inplace(|x| x * scale + offset);
        }
        Ok(out)
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.data_min_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (scale, offset) = (self.scale_[j], self.min_[j]);
            col.mapv_inplace(|x| (x - offset) / scale);
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            config: self.config.clone(),
            data_min_: self.data_min_.clone(),
            data_max_: self.data_max_.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        if params.data_min_.len() != params.data_max_.len() {
            return Err(PipelineError::InvalidParameter(format!(
                "MinMaxScaler has {} minima but {} maxima",
                params.data_min_.len(),
                params.data_max_.len()
            )));
        }
        if params.config.max <= params.config.min {
            return Err(PipelineError::InvalidParameter(
                "MinMaxScaler target max must be greater than min".to_string(),
            ));
        }

        let target_range = params.config.max - params.config.min;
        let data_range: Vec<f64> = params
            .data_max_
            .iter()
            .zip(&params.data_min_)
            .map(|(max, min)| max - min)
            .collect();
        let scale_: Vec<f64> = handle_zeros_in_scale(&data_range)
            .iter()
            .map(|range| target_range / range)
            .collect();
        let min_ = params
            .data_min_
            .iter()
            .zip(&scale_)
            .map(|(data_min, scale)| params.config.min - data_min * scale)
            .collect();

        Ok(Self {
            config: params.config,
            data_min_: params.data_min_,
            data_max_: params.data_max_,
            scale_,
            min_,
        })
    }

    fn n_features_in(&self) -> usize {
        self.data_min_.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted() -> FittedMinMaxScaler {
        // Two features: [0, 1] and [1, 3]
        FittedMinMaxScaler::from_params(MinMaxScalerParams {
            config: MinMaxScalerConfig::default(),
            data_min_: vec![0.0, 1.0],
            data_max_: vec![1.0, 3.0],
        })
        .unwrap()
    }

    #[test]
    fn test_minmax_scaler_transform() {
        let data = array![[0.0, 1.0], [0.5, 2.0], [1.0, 3.0]];
        let transformed = fitted().transform(&data).unwrap();
        assert_eq!(transformed, array![[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]]);
    }

    #[test]
    fn test_minmax_scaler_out_of_range_extrapolates() {
        let data = array![[2.0, 5.0]];
        let transformed = fitted().transform(&data).unwrap();
        assert!((transformed[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((transformed[[0, 1]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_minmax_scaler_inverse_transform() {
        let scaler = fitted();
        let data = array![[0.25, 1.5], [0.75, 2.5]];
        let recovered = scaler
            .inverse_transform(&scaler.transform(&data).unwrap())
            .unwrap();
        for (o, r) in data.iter().zip(recovered.iter()) {
            assert!((o - r).abs() < 1e-12, "Expected {}, got {}", o, r);
        }
    }

    #[test]
    fn test_minmax_scaler_custom_range() {
        let scaler = FittedMinMaxScaler::from_params(MinMaxScalerParams {
            config: MinMaxScalerConfig { min: -1.0, max: 1.0 },
            data_min_: vec![0.0],
            data_max_: vec![10.0],
        })
        .unwrap();
        let out = scaler.transform_column(&[0.0, 5.0, 10.0]).unwrap();
        for (got, want) in out.iter().zip([-1.0, 0.0, 1.0]) {
            assert!((got - want).abs() < 1e-12, "Expected {}, got {}", want, got);
        }
    }

    #[test]
    fn test_minmax_scaler_zero_range() {
        let scaler = FittedMinMaxScaler::from_params(MinMaxScalerParams {
            config: MinMaxScalerConfig::default(),
            data_min_: vec![5.0],
            data_max_: vec![5.0],
        })
        .unwrap();
        // Constant feature: scale 1, so the training value maps to target min.
        assert_eq!(scaler.transform_column(&[5.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_minmax_scaler_feature_mismatch() {
        let wrong_data = array![[1.0, 2.0, 3.0]];
        let result = fitted().transform(&wrong_data);
        assert!(matches!(
            result,
            Err(PipelineError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_minmax_scaler_rejects_ragged_params() {
        let result = FittedMinMaxScaler::from_params(MinMaxScalerParams {
            config: MinMaxScalerConfig::default(),
            data_min_: vec![0.0, 1.0],
            data_max_: vec![1.0],
        });
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_minmax_scaler_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("year_scaler.bin");
        let scaler = fitted();
        scaler.save_to_file(&path).unwrap();

        let loaded = FittedMinMaxScaler::load_from_file(&path).unwrap();
        assert_eq!(loaded.n_features_in(), 2);
        assert_eq!(loaded.extract_params(), scaler.extract_params());
    }
}
