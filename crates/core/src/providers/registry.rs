use std::collections::HashMap;

use super::er_api::ErApiProvider;
use super::frankfurter::FrankfurterProvider;
use super::metals_dev::MetalsDevProvider;
use super::traits::{RateKind, RateProvider};

/// Ordered set of rate sources for the two rates a valuation needs: the
/// USD exchange rate and the 24k gold gram price.
///
/// Registration order is priority order. `RateService` asks the sources
/// for a kind one after another until one returns a usable rate.
pub struct RateProviderRegistry {
    providers: Vec<Box<dyn RateProvider>>,
}

impl RateProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// The sources built from the user's settings.
    ///
    /// USD exchange: open.er-api.com first (it quotes EGP), Frankfurter
    /// second. Gold: metals.dev, only when a `metals_dev` key is set.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ErApiProvider::new()));
        registry.register(Box::new(FrankfurterProvider::new()));
        if let Some(key) = api_keys.get("metals_dev") {
            registry.register(Box::new(MetalsDevProvider::new(key.clone())));
        }
        registry
    }

    /// Append a source at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn RateProvider>) {
        self.providers.push(provider);
    }

    /// Highest-priority source for `kind`, if any quotes it.
    pub fn get_provider_for(&self, kind: RateKind) -> Option<&dyn RateProvider> {
        self.quoting(kind).next()
    }

    /// Every source for `kind`, highest priority first. An empty list means
    /// the rate cannot be fetched (e.g. gold without a metals.dev key).
    pub fn get_providers_for(&self, kind: RateKind) -> Vec<&dyn RateProvider> {
        self.quoting(kind).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn quoting(&self, kind: RateKind) -> impl Iterator<Item = &(dyn RateProvider + 'static)> + '_ {
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .filter(move |p| p.supported_kinds().contains(&kind))
    }
}

impl Default for RateProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
