//! The four-stage inference pipeline.
//!
//! ```text
//! records -> data_cleaning -> feature_engineering -> data_preparation -> get_prediction
//! ```
//!
//! Each stage consumes the previous stage's typed output and returns a new
//! value; the only link back to the request is the row index every record
//! carries. The pipeline borrows the fitted parameters and holds no other
//! state, so one [`ParameterStore`] can serve any number of pipelines.

pub mod calendar;
pub mod cleaning;
pub mod feature_engineering;
pub mod parameters;
pub mod prediction;
pub mod preparation;

use serde_json::{Map, Value};
use tracing::debug;

pub use cleaning::CleanRecord;
pub use feature_engineering::{Assortment, EngineeredRecord, StateHoliday};
pub use parameters::{ParameterStore, PARAMETER_NAMES};
pub use prediction::PREDICTION_FIELD;

use crate::dataset::{InputRecord, ModelFeatures};
use crate::error::PipelineError;
use crate::model::InferenceModel;

/// Runs the stages against a borrowed parameter store.
#[derive(Clone, Copy, Debug)]
pub struct RossmannPipeline<'a> {
    params: &'a ParameterStore,
}

impl<'a> RossmannPipeline<'a> {
    pub fn new(params: &'a ParameterStore) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &'a ParameterStore {
        self.params
    }

    /// Check required fields, parse dates and impute missing values.
    pub fn data_cleaning(&self, inputs: &[InputRecord]) -> Result<Vec<CleanRecord>, PipelineError> {
        let cleaned = cleaning::clean_records(inputs.iter().map(|input| &input.raw))?;
        debug!(rows = cleaned.len(), "data cleaning done");
        Ok(cleaned)
    }

    /// Derive calendar and elapsed-time features and drop closed store-days.
    pub fn feature_engineering(
        &self,
        records: Vec<CleanRecord>,
    ) -> Result<Vec<EngineeredRecord>, PipelineError> {
        let before = records.len();
        let engineered = feature_engineering::engineer_records(records)?;
        debug!(
            rows = engineered.len(),
            closed = before - engineered.len(),
            "feature engineering done"
        );
        Ok(engineered)
    }

    /// Rescale, encode and project onto the model schema.
    pub fn data_preparation(
        &self,
        records: &[EngineeredRecord],
    ) -> Result<ModelFeatures, PipelineError> {
        let features = preparation::prepare_records(records, self.params)?;
        debug!(rows = features.n_rows(), "data preparation done");
        Ok(features)
    }

    /// Score the prepared features and join predictions onto the inputs.
    pub fn get_prediction<M>(
        &self,
        model: &M,
        inputs: &[InputRecord],
        records: &[EngineeredRecord],
        features: &ModelFeatures,
    ) -> Result<Vec<Map<String, Value>>, PipelineError>
    where
        M: InferenceModel + ?Sized,
    {
        let predictions = prediction::predict_sales(model, features)?;
        prediction::join_predictions(inputs, records, &predictions)
    }

    /// Run all four stages.
    pub fn run<M>(
        &self,
        model: &M,
        inputs: &[InputRecord],
    ) -> Result<Vec<Map<String, Value>>, PipelineError>
    where
        M: InferenceModel + ?Sized,
    {
        let cleaned = self.data_cleaning(inputs)?;
        let engineered = self.feature_engineering(cleaned)?;
        let features = self.data_preparation(&engineered)?;
        self.get_prediction(model, inputs, &engineered, &features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{decode_json, RequestBody, N_FEATURES};
    use crate::model::{LinearModel, LinearParams};
    use crate::pipeline::parameters::fixtures::parameter_store;
    use serde_json::json;

    fn inputs(body: Value) -> Vec<InputRecord> {
        match decode_json(&body.to_string()).unwrap() {
            RequestBody::Records(records) => records,
            RequestBody::Empty => Vec::new(),
        }
    }

    fn record(store: u32, open: u32) -> Value {
        json!({
            "Store": store, "DayOfWeek": 5, "Date": "2015-07-31", "Open": open,
            "Promo": 1, "StateHoliday": "0", "SchoolHoliday": 1, "StoreType": "a",
            "Assortment": "c", "CompetitionDistance": null,
            "CompetitionOpenSinceMonth": null, "CompetitionOpenSinceYear": null,
            "Promo2": 1, "Promo2SinceWeek": 13, "Promo2SinceYear": 2010,
            "PromoInterval": "Jan,Apr,Jul,Oct"
        })
    }

    fn store_weighted_model() -> LinearModel {
        let mut weights = vec![0.0; N_FEATURES];
        weights[0] = 0.001;
        LinearModel::from_params(LinearParams { weights, bias: 8.0 }).unwrap()
    }

    #[test]
    fn test_run_outputs_open_rows_only() {
        let params = parameter_store();
        let pipeline = RossmannPipeline::new(&params);
        let inputs = inputs(json!([record(1, 1), record(2, 0), record(3, 1)]));

        let output = pipeline.run(&store_weighted_model(), &inputs).unwrap();
        let stores: Vec<_> = output.iter().map(|r| r["Store"].clone()).collect();
        assert_eq!(stores, vec![json!(1), json!(3)]);
        for (record, store) in output.iter().zip([1.0, 3.0]) {
            let expected = (8.0 + 0.001 * store as f64).exp_m1();
            let got = record["prediction"].as_f64().unwrap();
            assert!((got - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stage_outputs() {
        let params = parameter_store();
        let pipeline = RossmannPipeline::new(&params);
        let inputs = inputs(record(1, 1));

        let cleaned = pipeline.data_cleaning(&inputs).unwrap();
        assert_eq!(cleaned[0].competition_distance, 200000.0);
        assert_eq!(cleaned[0].is_promo, 1.0);

        let engineered = pipeline.feature_engineering(cleaned).unwrap();
        // Competition opening imputed to 2015-07-01, exactly 30 days earlier.
        assert_eq!(engineered[0].competition_time_month, 1);
        // Week 13 of 2010 starts 2010-03-29; promo_since is 2010-03-22.
        assert_eq!(engineered[0].promo_time_week, 279);

        let features = pipeline.data_preparation(&engineered).unwrap();
        assert_eq!(features.get(0, "promo2_since_week"), Some(13.0));
    }

    #[test]
    fn test_run_is_deterministic() {
        let params = parameter_store();
        let pipeline = RossmannPipeline::new(&params);
        let inputs = inputs(json!([record(1, 1), record(5, 1)]));
        let model = store_weighted_model();
        assert_eq!(
            pipeline.run(&model, &inputs).unwrap(),
            pipeline.run(&model, &inputs).unwrap()
        );
    }

    #[test]
    fn test_run_all_closed() {
        let params = parameter_store();
        let pipeline = RossmannPipeline::new(&params);
        let inputs = inputs(json!([record(1, 0)]));
        assert!(pipeline.run(&store_weighted_model(), &inputs).unwrap().is_empty());
    }
}
