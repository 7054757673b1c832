//! Derived numeric features.

pub mod cyclical;

pub use cyclical::CyclicalEncoder;
