//! Ordinal encoding with a fixed, hand-written category order.

use std::collections::HashMap;

/// Maps categories to fixed integer codes.
///
/// Unlike the label encoder, the codes are part of the feature definition and
/// are not loaded from an artifact.
#[derive(Clone, Debug)]
pub struct OrdinalEncoder {
    mapping: HashMap<&'static str, f64>,
}

impl OrdinalEncoder {
    /// Build an encoder from `(category, code)` pairs.
    pub fn new(pairs: &[(&'static str, f64)]) -> Self {
        Self {
            mapping: pairs.iter().copied().collect(),
        }
    }

    /// Code for a category, or `None` if it is not in the mapping.
    pub fn encode(&self, category: &str) -> Option<f64> {
        self.mapping.get(category).copied()
    }
}
