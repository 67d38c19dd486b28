use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{RateKind, RateProvider};

const BASE_URL: &str = "https://api.metals.dev/v1";

/// metals.dev API provider for the 24k gold gram price.
///
/// - **Free tier**: 100 requests/month (no credit card required).
/// - **Requires**: API key (set via settings as "metals_dev").
/// - Quotes directly in the requested currency with `unit=g`, so no
///   ounce conversion or FX hop is needed.
pub struct MetalsDevProvider {
    client: Client,
    api_key: String,
}

impl MetalsDevProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct LatestResponse {
    metals: HashMap<String, f64>,
}

/// Extract the gold price for `date` from a `/timeseries` response.
///
/// Shape: `{ "rates": { "YYYY-MM-DD": { "metals": { "gold": 1234.5 } } } }`
pub fn extract_timeseries_gold(parsed: &serde_json::Value, date: NaiveDate) -> Option<f64> {
    let date_str = date.format("%Y-%m-%d").to_string();
    parsed
        .get("rates")?
        .get(&date_str)?
        .get("metals")?
        .get("gold")?
        .as_f64()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for MetalsDevProvider {
    fn name(&self) -> &str {
        "metals.dev"
    }

    fn supported_kinds(&self) -> Vec<RateKind> {
        vec![RateKind::Gold24Gram]
    }

    async fn get_current_rate(&self, kind: RateKind, currency: &str) -> Result<f64, CoreError> {
        ensure_gold(kind)?;
        let currency = currency.to_uppercase();
        let url = format!("{BASE_URL}/latest");

        let resp: LatestResponse = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", currency.as_str()),
                ("unit", "g"),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "metals.dev".into(),
                message: format!("Failed to parse latest prices: {e}"),
            })?;

        resp.metals
            .get("gold")
            .copied()
            .ok_or(CoreError::RateNotAvailable {
                kind: kind.to_string(),
                currency,
                date: "latest".to_string(),
            })
    }

    async fn get_historical_rate(
        &self,
        kind: RateKind,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        ensure_gold(kind)?;
        let currency = currency.to_uppercase();
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!("{BASE_URL}/timeseries");

        let resp_text = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", currency.as_str()),
                ("unit", "g"),
                ("start_date", &date_str),
                ("end_date", &date_str),
            ])
            .send()
            .await?
            .text()
            .await?;

        let parsed: serde_json::Value =
            serde_json::from_str(&resp_text).map_err(|e| CoreError::Api {
                provider: "metals.dev".into(),
                message: format!("Failed to parse timeseries response: {e}"),
            })?;

        extract_timeseries_gold(&parsed, date).ok_or(CoreError::RateNotAvailable {
            kind: kind.to_string(),
            currency,
            date: date_str,
        })
    }
}

fn ensure_gold(kind: RateKind) -> Result<(), CoreError> {
    if kind == RateKind::Gold24Gram {
        Ok(())
    } else {
        Err(CoreError::Api {
            provider: "metals.dev".into(),
            message: format!("Unsupported rate: {kind}"),
        })
    }
}
