//! Robust Scaler.
//!
//! Scales features using statistics that are robust to outliers: the median
//! and the interquartile range observed during training.
//!
//! ```text
//! X_scaled = (X - center_) / scale_
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocessing::traits::{check_features, handle_zeros_in_scale, FittedTransformer};

/// Serializable parameters for a fitted RobustScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobustScalerParams {
    /// Center (median) for each feature.
    pub center_: Vec<f64>,
    /// Scale (IQR) for each feature.
    pub scale_: Vec<f64>,
}

/// Fitted RobustScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedRobustScaler {
    center_: Vec<f64>,
    scale_: Vec<f64>,
}

impl FittedTransformer for FittedRobustScaler {
    type Params = RobustScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.center_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (center, scale) = (self.center_[j], self.scale_[j]);
            col.mapv_inplace(|x| (x - center) / scale);
        }
        Ok(out)
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_features(data, self.center_.len())?;

        let mut out = data.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (center, scale) = (self.center_[j], self.scale_[j]);
            col.mapv_inplace(|x| x * scale + center);
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        RobustScalerParams {
            center_: self.center_.clone(),
            scale_: self.scale_.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        if params.center_.len() != params.scale_.len() {
            return Err(PipelineError::InvalidParameter(format!(
                "RobustScaler has {} centers but {} scales",
                params.center_.len(),
                params.scale_.len()
            )));
        }
        Ok(Self {
            scale_: handle_zeros_in_scale(&params.scale_),
            center_: params.center_,
        })
    }

    fn n_features_in(&self) -> usize {
        self.center_.len()
    }
}
