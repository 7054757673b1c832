//! Standard Scaler.
//!
//! Z-score normalization with the mean and standard deviation observed during
//! training.
//!
//! ```text
//! X_scaled = (X - mean_) / scale_
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::traits::{check_features, handle_zeros_in_scale, FittedTransformer};

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Mean of each feature.
    pub mean_: Vec<f64>,
    /// Standard deviation of each feature.
    pub scale_: Vec<f64>,
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    mean_: Vec<f64>,
    scale_: Vec<f64>,
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.mean_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (mean, scale) = (self.mean_[j], self.scale_[j]);
            col.mapv_inplace(|x| (x - mean) / scale);
        }
        Ok(out)
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.mean_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (mean, scale) = (self.mean_[j], self.scale_[j]);
            col.mapv_inplace(|x| x * scale + mean);
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            mean_: self.mean_.clone(),
            scale_: self.scale_.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        if params.mean_.len() != params.scale_.len() {
            return Err(PipelineError::InvalidParameter(format!(
                "StandardScaler has {} means but {} scales",
                params.mean_.len(),
                params.scale_.len()
            )));
        }
        Ok(Self {
            scale_: handle_zeros_in_scale(&params.scale_),
            mean_: params.mean_,
        })
    }

    fn n_features_in(&self) -> usize {
        self.mean_.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_transform() {
        let scaler = FittedStandardScaler::from_params(StandardScalerParams {
            mean_: vec![5.0],
            scale_: vec![2.0],
        })
        .unwrap();
        assert_eq!(
            scaler.transform_column(&[5.0, 9.0, 1.0]).unwrap(),
            vec![0.0, 2.0, -2.0]
        );
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let scaler = FittedStandardScaler::from_params(StandardScalerParams {
            mean_: vec![0.0],
            scale_: vec![1.0],
        })
        .unwrap();
        let result = scaler.transform(&ndarray::array![[1.0, 2.0]]);
        assert!(matches!(result, Err(PipelineError::FeatureMismatch { .. })));
    }
}
