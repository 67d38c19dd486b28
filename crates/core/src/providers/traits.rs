use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The market rates a valuation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateKind {
    /// Local currency per 1 USD
    UsdExchange,
    /// Local currency per gram of 24k gold
    Gold24Gram,
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateKind::UsdExchange => write!(f, "USD exchange rate"),
            RateKind::Gold24Gram => write!(f, "24K gold gram price"),
        }
    }
}

/// Trait abstraction for all market rate providers.
///
/// Each API (Frankfurter, open.er-api.com, metals.dev) implements this
/// trait; replacing one provider leaves the rest of the crate untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which rates this provider can quote.
    fn supported_kinds(&self) -> Vec<RateKind>;

    /// Latest rate, expressed in `currency`.
    async fn get_current_rate(&self, kind: RateKind, currency: &str) -> Result<f64, CoreError>;

    /// Rate on a specific past date, expressed in `currency`.
    async fn get_historical_rate(
        &self,
        kind: RateKind,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError>;
}
