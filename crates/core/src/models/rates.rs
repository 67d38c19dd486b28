use serde::{Deserialize, Serialize};

use super::snapshot::Denomination;
use crate::errors::CoreError;

/// Purity conversion constants relative to 24k gold.
/// A gram of gold at purity K is worth `gold24 / factor_K`.
pub const GOLD24_FACTOR: f64 = 1.0;
pub const GOLD21_FACTOR: f64 = 24.0 / 21.0;
pub const GOLD18_FACTOR: f64 = 24.0 / 18.0;

/// Market rates in effect when a snapshot is valued, expressed in the
/// local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Local currency per 1 USD
    pub usd: f64,

    /// Local currency per gram of 24k gold
    pub gold24: f64,

    /// Where the rates came from (provider names, or "manual")
    #[serde(default)]
    pub source: Option<String>,
}

impl Rates {
    /// Manually entered rates. Both must be finite and non-negative.
    pub fn new(usd: f64, gold24: f64) -> Result<Self, CoreError> {
        for (name, value) in [("USD", usd), ("gold 24K", gold24)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "{name} rate must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(Self {
            usd,
            gold24,
            source: Some("manual".to_string()),
        })
    }

    /// Attach a source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Value of one unit of `denomination` in the local currency.
    pub fn rate_for(&self, denomination: Denomination) -> f64 {
        match denomination {
            Denomination::Usd => self.usd,
            Denomination::Egp => 1.0,
            Denomination::Gold18 => self.gold24 / GOLD18_FACTOR,
            Denomination::Gold21 => self.gold24 / GOLD21_FACTOR,
            Denomination::Gold24 => self.gold24 / GOLD24_FACTOR,
        }
    }
}
