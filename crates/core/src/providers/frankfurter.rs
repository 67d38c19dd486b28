use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{RateKind, RateProvider};

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for USD exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30 currencies. EGP is not among them, so this provider
///   is registered after `ErApiProvider` and serves as a fallback for
///   users whose local currency the ECB does publish.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    async fn fetch(&self, path: &str, currency: &str) -> Result<f64, CoreError> {
        let target = currency.to_uppercase();
        if target == "USD" {
            return Ok(1.0);
        }

        let url = format!("{BASE_URL}/{path}?base=USD&symbols={target}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse response for USD/{target}: {e}"),
            })?;

        resp.rates.get(&target).copied().ok_or_else(|| CoreError::RateNotAvailable {
            kind: RateKind::UsdExchange.to_string(),
            currency: target,
            date: path.to_string(),
        })
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    fn supported_kinds(&self) -> Vec<RateKind> {
        vec![RateKind::UsdExchange]
    }

    async fn get_current_rate(&self, kind: RateKind, currency: &str) -> Result<f64, CoreError> {
        ensure_usd(kind)?;
        self.fetch("latest", currency).await
    }

    async fn get_historical_rate(
        &self,
        kind: RateKind,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        ensure_usd(kind)?;
        let date_str = date.format("%Y-%m-%d").to_string();
        self.fetch(&date_str, currency).await
    }
}

fn ensure_usd(kind: RateKind) -> Result<(), CoreError> {
    if kind == RateKind::UsdExchange {
        Ok(())
    } else {
        Err(CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("Unsupported rate: {kind}"),
        })
    }
}
