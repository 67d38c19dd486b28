use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::rates::Rates;
use crate::providers::registry::RateProviderRegistry;
use crate::providers::traits::RateKind;

/// Fetches the market rates a valuation needs, with provider fallback.
///
/// Nothing is cached: every history entry records the rates it was valued
/// at, so the log itself is the record of past rates.
pub struct RateService {
    registry: RateProviderRegistry,
}

impl RateService {
    pub fn new(registry: RateProviderRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider quotes the given rate.
    pub fn has_provider_for(&self, kind: RateKind) -> bool {
        self.registry.get_provider_for(kind).is_some()
    }

    /// Names of all providers quoting the given rate, in priority order.
    pub fn get_provider_names(&self, kind: RateKind) -> Vec<String> {
        self.registry
            .get_providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Latest USD and 24k gold rates in `currency`.
    pub async fn fetch_rates(&self, currency: &str) -> Result<Rates, CoreError> {
        let (usd, usd_source) = self.fetch_rate(RateKind::UsdExchange, currency, None).await?;
        let (gold24, gold_source) = self.fetch_rate(RateKind::Gold24Gram, currency, None).await?;
        Ok(Rates {
            usd,
            gold24,
            source: Some(format!("{usd_source} + {gold_source}")),
        })
    }

    /// USD and 24k gold rates in `currency` on a past date.
    pub async fn fetch_historical_rates(
        &self,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Rates, CoreError> {
        let (usd, usd_source) = self
            .fetch_rate(RateKind::UsdExchange, currency, Some(date))
            .await?;
        let (gold24, gold_source) = self
            .fetch_rate(RateKind::Gold24Gram, currency, Some(date))
            .await?;
        Ok(Rates {
            usd,
            gold24,
            source: Some(format!("{usd_source} + {gold_source}")),
        })
    }

    /// Try providers in registration order until one returns a usable rate.
    /// Returns the rate and the name of the provider that supplied it.
    async fn fetch_rate(
        &self,
        kind: RateKind,
        currency: &str,
        date: Option<NaiveDate>,
    ) -> Result<(f64, String), CoreError> {
        let providers = self.registry.get_providers_for(kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(kind.to_string()));
        }

        let mut last_error = None;

        for provider in &providers {
            let result = match date {
                Some(date) => provider.get_historical_rate(kind, currency, date).await,
                None => provider.get_current_rate(kind, currency).await,
            };

            match result {
                Ok(rate) if rate.is_finite() && rate >= 0.0 => {
                    return Ok((rate, provider.name().to_string()));
                }
                Ok(rate) => {
                    log::warn!("{} returned an invalid {kind}: {rate}", provider.name());
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid {kind} returned: {rate} (must be finite and non-negative)"
                        ),
                    });
                }
                Err(e) => {
                    log::warn!("{} failed to quote {kind}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(kind.to_string())))
    }
}
