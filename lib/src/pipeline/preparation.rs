//! Data preparation stage: rescaling, encoding and schema projection.

use crate::dataset::{FeatureFrame, ModelFeatures};
use crate::error::PipelineError;
use crate::pipeline::feature_engineering::EngineeredRecord;
use crate::pipeline::parameters::ParameterStore;
use crate::preprocessing::{CyclicalEncoder, FittedTransformer, OneHotEncoder, OrdinalEncoder};

/// Ordinal codes for the recoded assortment tiers.
pub const ASSORTMENT_CODES: [(&str, f64); 3] = [("basic", 1.0), ("extended", 2.0), ("extra", 3.0)];

/// Build the full prepared feature table, before projection.
///
/// Besides the model columns this keeps the one-hot `state_holiday_*`
/// indicators and the untouched calendar columns.
pub fn prepare_frame(
    records: &[EngineeredRecord],
    params: &ParameterStore,
) -> Result<FeatureFrame, PipelineError> {
    let mut frame = FeatureFrame::with_rows(records.len());
    let column = |f: fn(&EngineeredRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();

    frame.insert("store", column(|r| r.store))?;
    frame.insert("day_of_week", column(|r| r.day_of_week))?;
    frame.insert("promo", column(|r| r.promo))?;
    frame.insert("school_holiday", column(|r| r.school_holiday))?;
    frame.insert("competition_open_since_month", column(|r| r.competition_open_since_month as f64))?;
    frame.insert("competition_open_since_year", column(|r| r.competition_open_since_year as f64))?;
    frame.insert("promo2", column(|r| r.promo2))?;
    frame.insert("promo2_since_week", column(|r| r.promo2_since_week as f64))?;
    frame.insert("promo2_since_year", column(|r| r.promo2_since_year as f64))?;
    frame.insert("is_promo", column(|r| r.is_promo))?;
    frame.insert("month", column(|r| f64::from(r.month)))?;
    frame.insert("day", column(|r| f64::from(r.day)))?;
    frame.insert("week_of_year", column(|r| f64::from(r.week_of_year)))?;

    // Rescaling
    frame.insert(
        "competition_distance",
        params
            .competition_distance_scaler
            .transform_column(&column(|r| r.competition_distance))?,
    )?;
    frame.insert(
        "competition_time_month",
        params
            .competition_time_month_scaler
            .transform_column(&column(|r| r.competition_time_month as f64))?,
    )?;
    frame.insert(
        "promo_time_week",
        params
            .promo_time_week_scaler
            .transform_column(&column(|r| r.promo_time_week as f64))?,
    )?;
    frame.insert(
        "year",
        params
            .year_scaler
            .transform_column(&column(|r| f64::from(r.year)))?,
    )?;

    // Encoding
    let holidays: Vec<&str> = records.iter().map(|r| r.state_holiday.as_str()).collect();
    for (name, indicator) in OneHotEncoder::new("state_holiday").encode(&holidays) {
        frame.insert(name, indicator)?;
    }

    let store_types = records
        .iter()
        .map(|r| {
            params
                .store_type_encoding
                .index_of(&r.store_type)
                .map(|idx| idx as f64)
                .ok_or_else(|| PipelineError::UnknownCategory {
                    row: r.row,
                    field: "store_type",
                    value: r.store_type.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    frame.insert("store_type", store_types)?;

    let assortment_codes = OrdinalEncoder::new(&ASSORTMENT_CODES);
    let assortments = records
        .iter()
        .map(|r| {
            assortment_codes
                .encode(r.assortment.as_str())
                .ok_or_else(|| PipelineError::UnknownCategory {
                    row: r.row,
                    field: "assortment",
                    value: r.assortment.as_str().to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    frame.insert("assortment", assortments)?;

    // Nature transformation
    let cyclical = [
        ("day_of_week", CyclicalEncoder::DAY_OF_WEEK),
        ("month", CyclicalEncoder::MONTH),
        ("day", CyclicalEncoder::DAY),
        ("week_of_year", CyclicalEncoder::WEEK_OF_YEAR),
    ];
    for (name, encoder) in cyclical {
        let values = frame
            .column(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))?
            .to_vec();
        let (sin, cos) = encoder.encode(&values);
        frame.insert(format!("{}_sin", name), sin)?;
        frame.insert(format!("{}_cos", name), cos)?;
    }

    Ok(frame)
}

/// Prepare records and project them onto the model schema.
pub fn prepare_records(
    records: &[EngineeredRecord],
    params: &ParameterStore,
) -> Result<ModelFeatures, PipelineError> {
    prepare_frame(records, params)?.project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RawRecord, FEATURE_COLUMNS};
    use crate::pipeline::cleaning::clean_record;
    use crate::pipeline::feature_engineering::engineer_record;
    use crate::pipeline::parameters::fixtures::parameter_store;

    fn engineered(raw: RawRecord) -> EngineeredRecord {
        engineer_record(clean_record(0, &raw).unwrap()).unwrap()
    }

    fn store_one() -> RawRecord {
        RawRecord {
            store: Some(1.0),
            day_of_week: Some(5.0),
            date: Some("2015-07-31".to_string()),
            open: Some(1.0),
            promo: Some(1.0),
            state_holiday: Some("0".to_string()),
            school_holiday: Some(1.0),
            store_type: Some("c".to_string()),
            assortment: Some("a".to_string()),
            competition_distance: Some(1270.0),
            competition_open_since_month: Some(9.0),
            competition_open_since_year: Some(2008.0),
            promo2: Some(0.0),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_prepare_store_one() {
        let params = parameter_store();
        let features = prepare_records(&[engineered(store_one())], &params).unwrap();
        assert_eq!(features.matrix().dim(), (1, FEATURE_COLUMNS.len()));

        let get = |name| features.get(0, name).unwrap();
        assert_eq!(get("store"), 1.0);
        assert_eq!(get("store_type"), 2.0);
        assert_eq!(get("assortment"), 1.0);
        assert!((get("competition_distance") - (1270.0 - 2330.0) / 6360.0).abs() < 1e-12);
        assert!((get("competition_time_month") - (84.0 - 16.0) / 32.0).abs() < 1e-12);
        assert!((get("promo_time_week") - 126.0 / 439.0).abs() < 1e-12);
        assert_eq!(get("promo2_since_week"), 31.0);

        let angle = 5.0 * 2.0 * std::f64::consts::PI / 7.0;
        assert!((get("day_of_week_sin") - angle.sin()).abs() < 1e-12);
        assert!((get("day_of_week_cos") - angle.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_prepare_frame_keeps_holiday_indicators() {
        let params = parameter_store();
        let christmas = RawRecord {
            state_holiday: Some("c".to_string()),
            ..store_one()
        };
        let frame =
            prepare_frame(&[engineered(store_one()), engineered(christmas)], &params).unwrap();
        assert_eq!(frame.column("state_holiday_christmas"), Some(&[0.0, 1.0][..]));
        assert_eq!(frame.column("state_holiday_regular_day"), Some(&[1.0, 0.0][..]));
        assert_eq!(frame.column("year"), Some(&[1.0, 1.0][..]));
    }

    #[test]
    fn test_assortment_codes() {
        let params = parameter_store();
        let records: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|code| {
                engineered(RawRecord {
                    assortment: Some(code.to_string()),
                    ..store_one()
                })
            })
            .collect();
        let frame = prepare_frame(&records, &params).unwrap();
        assert_eq!(frame.column("assortment"), Some(&[1.0, 3.0, 2.0][..]));
    }

    #[test]
    fn test_unseen_store_type() {
        let params = parameter_store();
        let record = engineered(RawRecord {
            store_type: Some("e".to_string()),
            ..store_one()
        });
        match prepare_records(&[record], &params) {
            Err(PipelineError::UnknownCategory { field, value, .. }) => {
                assert_eq!(field, "store_type");
                assert_eq!(value, "e");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_empty_batch() {
        let features = prepare_records(&[], &parameter_store()).unwrap();
        assert_eq!(features.n_rows(), 0);
    }
}
