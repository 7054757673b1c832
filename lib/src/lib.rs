//! # rossmann_rs
//!
//! Inference pipeline for a pre-trained store-sales forecasting model.
//!
//! Raw store-day records go in; the same records, each with a `prediction`
//! of the day's sales, come out. In between the records pass through four
//! fixed stages driven by parameters fitted during training.
//!
//! ## Core Design Principles
//!
//! - **Fitted state is read-only**: scalers, the store-type encoder and the
//!   model are loaded once and only ever borrowed by requests.
//! - **Typed stages**: every stage takes and returns typed records; the model
//!   only ever sees a [`ModelFeatures`] matrix in the fixed column order.
//! - **Explicit failures**: bad input surfaces as a [`PipelineError`] naming
//!   the record and field, never as a panic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rossmann_rs::PredictionService;
//!
//! let service = PredictionService::load("model/model_rossmann.json", "parameter")?;
//! let response = service.handle(r#"[{"Store": 1, "Date": "2015-07-31"}]"#);
//! match response {
//!     Ok(body) => println!("{}", body.to_json()),
//!     Err(err) => eprintln!("{}", rossmann_rs::service::error_body(&err)),
//! }
//! # Ok::<(), rossmann_rs::PipelineError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: raw records, request decoding and the model input schema
//! - `pipeline`: cleaning, feature engineering, preparation and prediction
//! - `preprocessing`: fitted scalers and encoders
//! - `model`: linear and boosted-tree models
//! - `serialization`: JSON and bincode artifacts
//! - `config` / `service`: serving configuration and the request handler

/// Serving configuration from TOML and the environment.
pub mod config;

/// Raw records, request decoding and the model-ready feature table.
pub mod dataset;

/// Error types shared by every stage.
pub mod error;

/// Fitted regression models.
pub mod model;

/// The four inference stages and the parameters they use.
pub mod pipeline;

/// Fitted preprocessing transformers.
pub mod preprocessing;

/// Artifact persistence.
pub mod serialization;

/// Request handling.
pub mod service;

pub use config::ServingConfig;
pub use dataset::{InputRecord, ModelFeatures, RawRecord, RequestBody, FEATURE_COLUMNS};
pub use error::PipelineError;
pub use model::{InferenceModel, Model, ModelArtifact};
pub use pipeline::{ParameterStore, RossmannPipeline};
pub use service::{PredictionResponse, PredictionService};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DumpNode, GbdtParams};
    use crate::pipeline::parameters::fixtures::parameter_store;
    use serde_json::json;

    #[test]
    fn test_gbdt_service_end_to_end() {
        // Promo days sell more; within those, nearer competition sells less.
        let tree = DumpNode::split(
            0,
            "promo",
            0.5,
            DumpNode::leaf(1, 8.3),
            DumpNode::split(
                2,
                "competition_distance",
                0.0,
                DumpNode::leaf(3, 8.6),
                DumpNode::leaf(4, 8.9),
            ),
        );
        let model = Model::from_artifact(ModelArtifact::Gbdt(GbdtParams {
            base_score: 0.0,
            trees: vec![tree],
        }))
        .unwrap();
        let service = PredictionService::new(model, parameter_store());

        let base = json!({
            "Store": 1, "DayOfWeek": 5, "Date": "2015-07-31", "Open": 1, "Promo": 1,
            "StateHoliday": "0", "SchoolHoliday": 1, "StoreType": "c", "Assortment": "a",
            "CompetitionDistance": 1270.0, "Promo2": 0
        });
        let mut far = base.clone();
        far["Store"] = json!(2);
        far["CompetitionDistance"] = json!(20000.0);
        let mut no_promo = base.clone();
        no_promo["Store"] = json!(3);
        no_promo["Promo"] = json!(0);

        let body = json!([base, far, no_promo]).to_string();
        let value = service.handle(&body).unwrap().to_value();
        let predictions: Vec<f64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["prediction"].as_f64().unwrap())
            .collect();
        assert_eq!(
            predictions,
            vec![8.6f64.exp_m1(), 8.9f64.exp_m1(), 8.3f64.exp_m1()]
        );
    }
}
