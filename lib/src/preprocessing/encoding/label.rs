//! Label encoding for a single categorical text column.
//!
//! Maps each known label to its index in the sorted class list, the same
//! layout a scikit-learn `LabelEncoder` stores in `classes_`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::serialization::{load_artifact, save_artifact};

/// Serializable parameters for a fitted LabelEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    /// Known classes in sorted order.
    pub classes_: Vec<String>,
}

/// Fitted LabelEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedLabelEncoder {
    /// Known classes in sorted order.
    classes_: Vec<String>,
    /// Mapping from class label to index.
    class_to_idx: HashMap<String, usize>,
}

impl FittedLabelEncoder {
    /// Get the known classes.
    pub fn classes(&self) -> &[String] {
        &self.classes_
    }

    /// Get the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes_.len()
    }

    /// Index of a label, or `None` if it was not seen during fit.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.class_to_idx.get(label).copied()
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> LabelEncoderParams {
        LabelEncoderParams {
            classes_: self.classes_.clone(),
        }
    }

    /// Reconstruct from parameters.
    ///
    /// Classes must be strictly increasing, which is how they were fitted.
    pub fn from_params(params: LabelEncoderParams) -> Result<Self, PipelineError> {
        if params.classes_.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "LabelEncoder has no classes".to_string(),
            ));
        }
        if params.classes_.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PipelineError::InvalidParameter(format!(
                "LabelEncoder classes must be sorted and unique, got {:?}",
                params.classes_
            )));
        }

        let class_to_idx = params
            .classes_
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();

        Ok(FittedLabelEncoder {
            classes_: params.classes_,
            class_to_idx,
        })
    }

    /// Save to file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PipelineError> {
        save_artifact(path, &self.extract_params())
    }

    /// Load from file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_params(load_artifact(path)?)
    }
}
