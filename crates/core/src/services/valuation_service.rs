use crate::models::rates::Rates;
use crate::models::snapshot::{Denomination, Snapshot};

/// Converts holdings into a single sum in the local currency.
///
/// Pure arithmetic: USD at the exchange rate, local currency at face
/// value, and each gold purity at the 24k gram price divided by its
/// purity factor. There is no error path; missing quantities are zero and
/// `Rates` cannot be built without both rates.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Total value of `snapshot` at `rates`.
    pub fn valuate(&self, snapshot: &Snapshot, rates: &Rates) -> f64 {
        self.breakdown(snapshot, rates)
            .iter()
            .map(|(_, value)| value)
            .sum()
    }

    /// Contribution of each denomination, in `Denomination::ALL` order.
    pub fn breakdown(&self, snapshot: &Snapshot, rates: &Rates) -> Vec<(Denomination, f64)> {
        Denomination::ALL
            .iter()
            .map(|d| (*d, snapshot.get(*d) * rates.rate_for(*d)))
            .collect()
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
