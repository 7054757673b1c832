//! Fitted preprocessing transformers used by the data preparation stage.
//!
//! # Design Philosophy
//!
//! - **Apply, never fit**: statistics come from the training run and are
//!   loaded from artifacts; transforming a batch never changes them.
//! - **Serializable**: fitted transformers round-trip through
//!   `extract_params` / `from_params` and through JSON or bincode files.
//! - **sklearn-compatible**: stored attribute names (`data_min_`, `center_`,
//!   `classes_`) match the exporter's source objects.
//!
//! # Available Transformers
//!
//! ## Scaling
//! - [`FittedMinMaxScaler`], [`FittedRobustScaler`], [`FittedStandardScaler`],
//!   and the kind-tagged [`Scaler`] wrapper.
//!
//! ## Encoding
//! - [`FittedLabelEncoder`], [`OneHotEncoder`], [`OrdinalEncoder`].
//!
//! ## Feature engineering
//! - [`CyclicalEncoder`]: sine/cosine pairs for periodic values.

pub mod encoding;
pub mod feature_engineering;
pub mod scaling;
pub mod traits;

pub use encoding::{FittedLabelEncoder, LabelEncoderParams, OneHotEncoder, OrdinalEncoder};
pub use feature_engineering::CyclicalEncoder;
pub use scaling::{
    FittedMinMaxScaler, FittedRobustScaler, FittedStandardScaler, MinMaxScalerConfig,
    MinMaxScalerParams, RobustScalerParams, Scaler, ScalerParams, StandardScalerParams,
};
pub use traits::FittedTransformer;
