//! Cyclical (sine/cosine) encoding of periodic integer features.
//!
//! A periodic value such as the day of the week is mapped onto the unit
//! circle, so that Sunday and Monday end up as close to each other as Monday
//! and Tuesday:
//!
//! ```text
//! angle = value * 2π / period
//! (sin(angle), cos(angle))
//! ```

use std::f64::consts::PI;

/// Sine/cosine encoder for a value with a fixed period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclicalEncoder {
    period: f64,
}

impl CyclicalEncoder {
    /// Day of week, period 7.
    pub const DAY_OF_WEEK: CyclicalEncoder = CyclicalEncoder::new(7.0);
    /// Month of year, period 12.
    pub const MONTH: CyclicalEncoder = CyclicalEncoder::new(12.0);
    /// Day of month, period 31.
    pub const DAY: CyclicalEncoder = CyclicalEncoder::new(31.0);
    /// Week of year, period 52.
    pub const WEEK_OF_YEAR: CyclicalEncoder = CyclicalEncoder::new(52.0);

    /// Create an encoder for the given period.
    pub const fn new(period: f64) -> Self {
        Self { period }
    }

    fn angle(&self, value: f64) -> f64 {
        value * (2.0 * PI / self.period)
    }

    /// Sine component.
    pub fn sin(&self, value: f64) -> f64 {
        self.angle(value).sin()
    }

    /// Cosine component.
    pub fn cos(&self, value: f64) -> f64 {
        self.angle(value).cos()
    }

    /// Encode a column into its `(sin, cos)` columns.
    pub fn encode(&self, values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        values.iter().map(|&v| (self.sin(v), self.cos(v))).unzip()
    }
}
