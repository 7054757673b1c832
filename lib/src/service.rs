//! Request handling: decode a body, run the pipeline, encode the response.

use std::path::Path;
use std::time::Instant;

use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::config::ServingConfig;
use crate::dataset::{decode_json, InputRecord, RequestBody};
use crate::error::PipelineError;
use crate::model::{InferenceModel, Model};
use crate::pipeline::{ParameterStore, RossmannPipeline};

/// Outcome of a successful request.
#[derive(Clone, Debug, PartialEq)]
pub enum PredictionResponse {
    /// No input was received; rendered as `{}`.
    Empty,
    /// Open store-days with their predictions, in request order.
    Records(Vec<Map<String, Value>>),
}

impl PredictionResponse {
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_else(|_| self.to_json())
    }

    pub fn to_value(&self) -> Value {
        match self {
            PredictionResponse::Empty => Value::Object(Map::new()),
            PredictionResponse::Records(records) => {
                Value::Array(records.iter().cloned().map(Value::Object).collect())
            }
        }
    }
}

/// Render an error the way a front end reports it: `{"error": "<message>"}`.
pub fn error_body(err: &PipelineError) -> String {
    json!({ "error": err.to_string() }).to_string()
}

/// Owns the fitted model and parameters and answers prediction requests.
///
/// Immutable after construction; share it behind a reference or an `Arc`.
#[derive(Debug)]
pub struct PredictionService<M = Model> {
    model: M,
    params: ParameterStore,
}

impl PredictionService<Model> {
    /// Load the model and parameter artifacts named by `config`.
    pub fn from_config(config: &ServingConfig) -> Result<Self, PipelineError> {
        Self::load(&config.model_path, &config.parameter_dir)
    }

    /// Load a model artifact and a parameter directory.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        model_path: P,
        parameter_dir: Q,
    ) -> Result<Self, PipelineError> {
        let params = ParameterStore::load_from_dir(parameter_dir)?;
        let model = Model::load_from_file(&model_path)?;
        info!(
            kind = model.kind(),
            path = %model_path.as_ref().display(),
            "loaded model"
        );
        Ok(Self::new(model, params))
    }
}

impl<M: InferenceModel> PredictionService<M> {
    pub fn new(model: M, params: ParameterStore) -> Self {
        Self { model, params }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Handle a raw JSON request body.
    pub fn handle(&self, body: &str) -> Result<PredictionResponse, PipelineError> {
        let request = decode_json(body).map_err(|err| {
            warn!(error = %err, "rejected request body");
            err
        })?;
        self.handle_request(request)
    }

    /// Handle an already-decoded request.
    pub fn handle_request(&self, request: RequestBody) -> Result<PredictionResponse, PipelineError> {
        match request {
            RequestBody::Empty => {
                info!("empty request");
                Ok(PredictionResponse::Empty)
            }
            RequestBody::Records(records) => self.predict(&records).map(PredictionResponse::Records),
        }
    }

    /// Run the pipeline over decoded records.
    pub fn predict(&self, records: &[InputRecord]) -> Result<Vec<Map<String, Value>>, PipelineError> {
        let started = Instant::now();
        let pipeline = RossmannPipeline::new(&self.params);
        match pipeline.run(&self.model, records) {
            Ok(output) => {
                info!(
                    received = records.len(),
                    predicted = output.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request complete"
                );
                Ok(output)
            }
            Err(err) => {
                if err.is_client_error() {
                    warn!(error = %err, "rejected request");
                } else {
                    error!(error = %err, "prediction failed");
                }
                Err(err)
            }
        }
    }
}
