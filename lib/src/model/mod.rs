//! Fitted regression models.
//!
//! Models are inference-only: they are loaded from an artifact exported by the
//! training run and never updated. Two artifact kinds are supported, tagged by
//! kind in the file:
//!
//! - [`LinearModel`]: `{"linear": {"weights": [...], "bias": ...}}`
//! - [`GbdtModel`]: `{"gbdt": {"base_score": ..., "trees": [...]}}`, trees in
//!   the XGBoost JSON dump layout.
//!
//! Both predict on the log scale the target was trained on.

pub mod gbdt;
pub mod linear;

use std::path::Path;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

pub use gbdt::{DumpNode, GbdtModel, GbdtParams};
pub use linear::{LinearModel, LinearParams};

use crate::dataset::ModelFeatures;
use crate::error::PipelineError;
use crate::serialization::{load_artifact, save_artifact};

/// A fitted model that maps one feature row to one score.
pub trait InferenceModel {
    /// Number of input features the model was fitted on.
    fn n_features_in(&self) -> usize;

    /// Score a single row. The row must have `n_features_in()` values.
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Score every row of a prepared feature matrix.
    fn predict_batch(&self, features: &ModelFeatures) -> Result<Array1<f64>, PipelineError> {
        let matrix = features.matrix();
        if matrix.ncols() != self.n_features_in() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: matrix.ncols(),
            });
        }
        Ok(matrix.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }
}

/// Serialized form of any supported model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearParams),
    Gbdt(GbdtParams),
}

/// A fitted model of any supported kind.
#[derive(Clone, Debug)]
pub enum Model {
    Linear(LinearModel),
    Gbdt(GbdtModel),
}

impl Model {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, PipelineError> {
        Ok(match artifact {
            ModelArtifact::Linear(params) => Model::Linear(LinearModel::from_params(params)?),
            ModelArtifact::Gbdt(params) => Model::Gbdt(GbdtModel::from_params(params)?),
        })
    }

    pub fn to_artifact(&self) -> ModelArtifact {
        match self {
            Model::Linear(m) => ModelArtifact::Linear(m.extract_params()),
            Model::Gbdt(m) => ModelArtifact::Gbdt(m.extract_params()),
        }
    }

    /// Short name of the model kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Linear(_) => "linear",
            Model::Gbdt(_) => "gbdt",
        }
    }

    /// Load a model artifact (`.json` or `.bin`).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_artifact(load_artifact(path)?)
    }

    /// Save the model as an artifact (`.json` or `.bin`).
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        save_artifact(path, &self.to_artifact())
    }
}

impl InferenceModel for Model {
    fn n_features_in(&self) -> usize {
        match self {
            Model::Linear(m) => m.n_features_in(),
            Model::Gbdt(m) => m.n_features_in(),
        }
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self {
            Model::Linear(m) => m.predict_row(row),
            Model::Gbdt(m) => m.predict_row(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::N_FEATURES;
    use ndarray::Array2;

    fn linear() -> Model {
        let mut weights = vec![0.0; N_FEATURES];
        weights[0] = 0.5;
        Model::from_artifact(ModelArtifact::Linear(LinearParams { weights, bias: 1.0 })).unwrap()
    }

    #[test]
    fn test_artifact_json_is_kind_tagged() {
        let json = serde_json::to_value(linear().to_artifact()).unwrap();
        assert!(json.get("linear").is_some());
        assert_eq!(json["linear"]["bias"], 1.0);
    }

    #[test]
    fn test_predict_batch() {
        let mut matrix = Array2::zeros((2, N_FEATURES));
        matrix[[0, 0]] = 2.0;
        matrix[[1, 0]] = 4.0;
        let features = ModelFeatures::new(matrix).unwrap();
        let predictions = linear().predict_batch(&features).unwrap();
        assert_eq!(predictions.to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_model_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["json", "bin"] {
            let path = dir.path().join(format!("model.{}", ext));
            let model = linear();
            model.save_to_file(&path).unwrap();
            let loaded = Model::load_from_file(&path).unwrap();
            assert_eq!(loaded.kind(), "linear");
            assert_eq!(loaded.to_artifact(), model.to_artifact());
        }
    }
}
