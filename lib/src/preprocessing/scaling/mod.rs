//! Fitted scalers for continuous features.
//!
//! | Scaler | Stored statistics | Transformation |
//! |--------|-------------------|----------------|
//! | [`FittedMinMaxScaler`] | `data_min_`, `data_max_` | map to target range |
//! | [`FittedRobustScaler`] | `center_`, `scale_` | subtract median, divide by IQR |
//! | [`FittedStandardScaler`] | `mean_`, `scale_` | z-score |
//!
//! The parameter store does not know in advance which kind of scaler the
//! training run chose for a feature, so artifacts are read through the
//! [`ScalerParams`] enum, tagged by kind:
//!
//! ```json
//! {"robust": {"center_": [2330.0], "scale_": [5980.0]}}
//! ```

pub mod minmax;
pub mod robust;
pub mod standard;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use minmax::{FittedMinMaxScaler, MinMaxScalerConfig, MinMaxScalerParams};
pub use robust::{FittedRobustScaler, RobustScalerParams};
pub use standard::{FittedStandardScaler, StandardScalerParams};

use crate::error::PipelineError;
use crate::preprocessing::traits::FittedTransformer;

/// Serialized parameters of any supported scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerParams {
    MinMax(MinMaxScalerParams),
    Robust(RobustScalerParams),
    Standard(StandardScalerParams),
}

/// A fitted scaler of any supported kind.
#[derive(Clone, Debug)]
pub enum Scaler {
    MinMax(FittedMinMaxScaler),
    Robust(FittedRobustScaler),
    Standard(FittedStandardScaler),
}

impl Scaler {
    /// Short name of the scaler kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::MinMax(_) => "min_max",
            Scaler::Robust(_) => "robust",
            Scaler::Standard(_) => "standard",
        }
    }
}

impl FittedTransformer for Scaler {
    type Params = ScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        match self {
            Scaler::MinMax(s) => s.transform(data),
            Scaler::Robust(s) => s.transform(data),
            Scaler::Standard(s) => s.transform(data),
        }
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        match self {
            Scaler::MinMax(s) => s.inverse_transform(data),
            Scaler::Robust(s) => s.inverse_transform(data),
            Scaler::Standard(s) => s.inverse_transform(data),
        }
    }

    fn extract_params(&self) -> Self::Params {
        match self {
            Scaler::MinMax(s) => ScalerParams::MinMax(s.extract_params()),
            Scaler::Robust(s) => ScalerParams::Robust(s.extract_params()),
            Scaler::Standard(s) => ScalerParams::Standard(s.extract_params()),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PipelineError> {
        Ok(match params {
            ScalerParams::MinMax(p) => Scaler::MinMax(FittedMinMaxScaler::from_params(p)?),
            ScalerParams::Robust(p) => Scaler::Robust(FittedRobustScaler::from_params(p)?),
            ScalerParams::Standard(p) => Scaler::Standard(FittedStandardScaler::from_params(p)?),
        })
    }

    fn n_features_in(&self) -> usize {
        match self {
            Scaler::MinMax(s) => s.n_features_in(),
            Scaler::Robust(s) => s.n_features_in(),
            Scaler::Standard(s) => s.n_features_in(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_params_json_layout() {
        let json = r#"{"robust": {"center_": [2330.0], "scale_": [5980.0]}}"#;
        let params: ScalerParams = serde_json::from_str(json).unwrap();
        let scaler = Scaler::from_params(params).unwrap();
        assert_eq!(scaler.kind(), "robust");
        assert_eq!(scaler.n_features_in(), 1);
    }

    #[test]
    fn test_min_max_default_range_from_json() {
        let json = r#"{"min_max": {"data_min_": [2013.0], "data_max_": [2015.0]}}"#;
        let params: ScalerParams = serde_json::from_str(json).unwrap();
        let scaler = Scaler::from_params(params).unwrap();
        assert_eq!(
            scaler.transform_column(&[2013.0, 2014.0, 2015.0]).unwrap(),
            vec![0.0, 0.5, 1.0]
        );
    }

    #[test]
    fn test_scaler_bincode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("competition_distance_scaler.bin");
        let scaler = Scaler::from_params(ScalerParams::Standard(StandardScalerParams {
            mean_: vec![5.0],
            scale_: vec![2.0],
        }))
        .unwrap();
        scaler.save_to_file(&path).unwrap();

        let loaded = Scaler::load_from_file(&path).unwrap();
        assert_eq!(loaded.extract_params(), scaler.extract_params());
    }
}
