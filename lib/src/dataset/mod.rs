//! Input records, request decoding and the model-ready feature table.

pub mod batch;
pub mod frame;
pub mod record;
pub mod schema;

pub use batch::{decode_csv, decode_json, decode_value, RequestBody};
pub use frame::{FeatureFrame, ModelFeatures};
pub use record::{normalize_column_name, InputRecord, RawRecord, RAW_FIELDS};
pub use schema::{feature_index, FEATURE_COLUMNS, N_FEATURES};
