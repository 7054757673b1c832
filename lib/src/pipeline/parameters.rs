//! Fitted parameters shared by every request.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::preprocessing::{FittedLabelEncoder, FittedTransformer, Scaler};
use crate::serialization::ArtifactFormat;

/// Artifact names, without extension, expected in the parameter directory.
pub const PARAMETER_NAMES: [&str; 5] = [
    "competition_distance_scaler",
    "competition_time_month_scaler",
    "promo_time_week_scaler",
    "year_scaler",
    "store_type_encoding",
];

/// The five fitted transformers the data preparation stage applies.
///
/// Built once at startup and only ever borrowed afterwards.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    pub competition_distance_scaler: Scaler,
    pub competition_time_month_scaler: Scaler,
    pub promo_time_week_scaler: Scaler,
    pub year_scaler: Scaler,
    pub store_type_encoding: FittedLabelEncoder,
}

impl ParameterStore {
    /// Assemble a store from already-fitted transformers.
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidParameter`] if a scaler was fitted on
    /// more than one column.
    pub fn new(
        competition_distance_scaler: Scaler,
        competition_time_month_scaler: Scaler,
        promo_time_week_scaler: Scaler,
        year_scaler: Scaler,
        store_type_encoding: FittedLabelEncoder,
    ) -> Result<Self, PipelineError> {
        let store = Self {
            competition_distance_scaler,
            competition_time_month_scaler,
            promo_time_week_scaler,
            year_scaler,
            store_type_encoding,
        };
        for (name, scaler) in store.scalers() {
            if scaler.n_features_in() != 1 {
                return Err(PipelineError::InvalidParameter(format!(
                    "{} must scale exactly one column, found {}",
                    name,
                    scaler.n_features_in()
                )));
            }
        }
        Ok(store)
    }

    /// Load every artifact from `dir`, as `<name>.json` or `<name>.bin`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, PipelineError> {
        let dir = dir.as_ref();
        let load_scaler = |name: &str| -> Result<Scaler, PipelineError> {
            let path = artifact_path(dir, name)?;
            let scaler = Scaler::load_from_file(&path)?;
            info!(artifact = name, kind = scaler.kind(), path = %path.display(), "loaded scaler");
            Ok(scaler)
        };

        let competition_distance_scaler = load_scaler("competition_distance_scaler")?;
        let competition_time_month_scaler = load_scaler("competition_time_month_scaler")?;
        let promo_time_week_scaler = load_scaler("promo_time_week_scaler")?;
        let year_scaler = load_scaler("year_scaler")?;

        let path = artifact_path(dir, "store_type_encoding")?;
        let store_type_encoding = FittedLabelEncoder::load_from_file(&path)?;
        info!(
            artifact = "store_type_encoding",
            classes = store_type_encoding.n_classes(),
            path = %path.display(),
            "loaded label encoder"
        );

        Self::new(
            competition_distance_scaler,
            competition_time_month_scaler,
            promo_time_week_scaler,
            year_scaler,
            store_type_encoding,
        )
    }

    /// Write every artifact to `dir` in the given format.
    pub fn save_to_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        format: ArtifactFormat,
    ) -> Result<(), PipelineError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let file = |name: &str| dir.join(format!("{}.{}", name, format.extension()));
        for (name, scaler) in self.scalers() {
            scaler.save_to_file(file(name))?;
        }
        self.store_type_encoding
            .save_to_file(file("store_type_encoding"))
    }

    fn scalers(&self) -> [(&'static str, &Scaler); 4] {
        [
            ("competition_distance_scaler", &self.competition_distance_scaler),
            ("competition_time_month_scaler", &self.competition_time_month_scaler),
            ("promo_time_week_scaler", &self.promo_time_week_scaler),
            ("year_scaler", &self.year_scaler),
        ]
    }
}

/// Locate `<name>.json` or `<name>.bin` in `dir`, preferring JSON.
fn artifact_path(dir: &Path, name: &str) -> Result<PathBuf, PipelineError> {
    ArtifactFormat::ALL
        .iter()
        .map(|format| dir.join(format!("{}.{}", name, format.extension())))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            PipelineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no artifact '{}' in {}", name, dir.display()),
            ))
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{ScalerParams, StandardScalerParams};

    #[test]
    fn test_save_and_load_dir_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = fixtures::parameter_store();
        store.save_to_dir(dir.path(), ArtifactFormat::Json).unwrap();
        for name in PARAMETER_NAMES {
            assert!(dir.path().join(format!("{}.json", name)).is_file());
        }

        let loaded = ParameterStore::load_from_dir(dir.path()).unwrap();
        assert_eq!(
            loaded.year_scaler.extract_params(),
            store.year_scaler.extract_params()
        );
        assert_eq!(loaded.store_type_encoding.classes(), store.store_type_encoding.classes());
    }

    #[test]
    fn test_save_and_load_dir_bincode() {
        let dir = tempfile::tempdir().unwrap();
        let store = fixtures::parameter_store();
        store.save_to_dir(dir.path(), ArtifactFormat::Bincode).unwrap();
        let loaded = ParameterStore::load_from_dir(dir.path()).unwrap();
        assert_eq!(
            loaded.competition_distance_scaler.extract_params(),
            store.competition_distance_scaler.extract_params()
        );
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        match ParameterStore::load_from_dir(dir.path()) {
            Err(PipelineError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_column_scaler_rejected() {
        let wide = Scaler::from_params(ScalerParams::Standard(StandardScalerParams {
            mean_: vec![0.0, 0.0],
            scale_: vec![1.0, 1.0],
        }))
        .unwrap();
        let base = fixtures::parameter_store();
        let result = ParameterStore::new(
            wide,
            base.competition_time_month_scaler,
            base.promo_time_week_scaler,
            base.year_scaler,
            base.store_type_encoding,
        );
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }
}
