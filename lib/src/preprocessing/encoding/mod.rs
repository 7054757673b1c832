//! Categorical feature encoders.
//!
//! - [`FittedLabelEncoder`]: fitted class list, loaded from an artifact
//!   (store type).
//! - [`OneHotEncoder`]: dummy columns for the categories present in a batch
//!   (state holiday).
//! - [`OrdinalEncoder`]: fixed category-to-code table (assortment).

mod label;
mod one_hot;
mod ordinal;

pub use label::{FittedLabelEncoder, LabelEncoderParams};
pub use one_hot::OneHotEncoder;
pub use ordinal::OrdinalEncoder;
