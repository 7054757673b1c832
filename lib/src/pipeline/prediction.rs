//! Prediction stage: scoring, undoing the log transform, and joining the
//! predictions back onto the request records.

use serde_json::{Map, Number, Value};

use crate::dataset::{normalize_column_name, InputRecord, ModelFeatures};
use crate::error::PipelineError;
use crate::model::InferenceModel;
use crate::pipeline::calendar::iso_timestamp;
use crate::pipeline::feature_engineering::EngineeredRecord;

/// Name of the field carrying the prediction in each output record.
pub const PREDICTION_FIELD: &str = "prediction";

/// Score prepared features and map them back to sales with `expm1`.
///
/// # Errors
/// Returns [`PipelineError::NumericalError`] if any prediction is not finite.
pub fn predict_sales<M>(model: &M, features: &ModelFeatures) -> Result<Vec<f64>, PipelineError>
where
    M: InferenceModel + ?Sized,
{
    model
        .predict_batch(features)?
        .iter()
        .enumerate()
        .map(|(i, &log_sales)| {
            let sales = log_sales.exp_m1();
            if sales.is_finite() {
                Ok(sales)
            } else {
                Err(PipelineError::NumericalError(format!(
                    "prediction {} is not finite (model output {})",
                    i, log_sales
                )))
            }
        })
        .collect()
}

/// Attach each prediction to the original object of the record it belongs to.
///
/// The sale date is rewritten as `YYYY-MM-DDT00:00:00.000Z`; every other
/// field is echoed unchanged and in its original order.
pub fn join_predictions(
    inputs: &[InputRecord],
    records: &[EngineeredRecord],
    predictions: &[f64],
) -> Result<Vec<Map<String, Value>>, PipelineError> {
    if records.len() != predictions.len() {
        return Err(PipelineError::FeatureMismatch {
            expected_features: records.len(),
            got_features: predictions.len(),
        });
    }

    records
        .iter()
        .zip(predictions)
        .map(|(record, &prediction)| {
            let input = inputs.get(record.row).ok_or_else(|| {
                PipelineError::MalformedInput(format!("no input record at row {}", record.row))
            })?;
            let mut output = input.original.clone();
            for (key, value) in output.iter_mut() {
                if normalize_column_name(key) == "date" {
                    *value = Value::String(iso_timestamp(record.date));
                }
            }
            let prediction = Number::from_f64(prediction).ok_or_else(|| {
                PipelineError::NumericalError(format!(
                    "prediction for row {} is not finite",
                    record.row
                ))
            })?;
            output.insert(PREDICTION_FIELD.to_string(), Value::Number(prediction));
            Ok(output)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::N_FEATURES;
    use crate::model::{LinearModel, LinearParams};
    use crate::pipeline::cleaning::clean_record;
    use crate::pipeline::feature_engineering::engineer_record;
    use ndarray::Array2;
    use serde_json::json;

    fn constant_model(bias: f64) -> LinearModel {
        LinearModel::from_params(LinearParams {
            weights: vec![0.0; N_FEATURES],
            bias,
        })
        .unwrap()
    }

    #[test]
    fn test_predict_sales_applies_expm1() {
        let features = ModelFeatures::new(Array2::zeros((2, N_FEATURES))).unwrap();
        let sales = predict_sales(&constant_model(8.5), &features).unwrap();
        assert_eq!(sales, vec![8.5f64.exp_m1(); 2]);
    }

    #[test]
    fn test_predict_sales_overflow() {
        let features = ModelFeatures::new(Array2::zeros((1, N_FEATURES))).unwrap();
        assert!(matches!(
            predict_sales(&constant_model(1000.0), &features),
            Err(PipelineError::NumericalError(_))
        ));
    }

    #[test]
    fn test_join_keeps_original_fields() {
        let original = json!({
            "Id": 7, "Store": 1, "DayOfWeek": 5, "Date": "2015-07-31", "Open": 1,
            "Promo": 1, "StateHoliday": "0", "SchoolHoliday": 1, "StoreType": "c",
            "Assortment": "a", "CompetitionDistance": 1270.0, "Promo2": 0
        });
        let input = InputRecord::from_map(0, original.as_object().cloned().unwrap()).unwrap();
        let record = engineer_record(clean_record(0, &input.raw).unwrap()).unwrap();

        let joined = join_predictions(&[input], &[record], &[5263.0]).unwrap();
        assert_eq!(joined.len(), 1);
        let out = &joined[0];
        assert_eq!(out["Id"], json!(7));
        assert_eq!(out["Date"], json!("2015-07-31T00:00:00.000Z"));
        assert_eq!(out["prediction"], json!(5263.0));
        let keys: Vec<_> = out.keys().map(String::as_str).collect();
        assert_eq!(keys.first(), Some(&"Id"));
        assert_eq!(keys.last(), Some(&"prediction"));
    }
}
