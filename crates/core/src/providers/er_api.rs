use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{RateKind, RateProvider};

const BASE_URL: &str = "https://open.er-api.com/v6";

/// open.er-api.com provider for USD exchange rates.
///
/// - **Free**: No API key; rates refresh once a day.
/// - **Coverage**: 160+ currencies including EGP.
/// - **Limitation**: the open endpoint has no historical data.
pub struct ErApiProvider {
    client: Client,
}

impl ErApiProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
pub struct LatestResponse {
    pub result: String,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
}

/// Pick the `currency` rate out of a `/latest/USD` response body.
pub fn parse_latest(body: &str, currency: &str) -> Result<f64, CoreError> {
    let resp: LatestResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: "open.er-api.com".into(),
        message: format!("Failed to parse latest rates: {e}"),
    })?;

    if resp.result != "success" {
        return Err(CoreError::Api {
            provider: "open.er-api.com".into(),
            message: resp
                .error_type
                .unwrap_or_else(|| format!("request returned '{}'", resp.result)),
        });
    }

    let target = currency.to_uppercase();
    resp.rates
        .get(&target)
        .copied()
        .ok_or(CoreError::RateNotAvailable {
            kind: RateKind::UsdExchange.to_string(),
            currency: target,
            date: "latest".to_string(),
        })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for ErApiProvider {
    fn name(&self) -> &str {
        "open.er-api.com"
    }

    fn supported_kinds(&self) -> Vec<RateKind> {
        vec![RateKind::UsdExchange]
    }

    async fn get_current_rate(&self, kind: RateKind, currency: &str) -> Result<f64, CoreError> {
        if kind != RateKind::UsdExchange {
            return Err(CoreError::Api {
                provider: "open.er-api.com".into(),
                message: format!("Unsupported rate: {kind}"),
            });
        }
        if currency.eq_ignore_ascii_case("USD") {
            return Ok(1.0);
        }

        let body = self
            .client
            .get(format!("{BASE_URL}/latest/USD"))
            .send()
            .await?
            .text()
            .await?;

        parse_latest(&body, currency)
    }

    async fn get_historical_rate(
        &self,
        kind: RateKind,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        Err(CoreError::RateNotAvailable {
            kind: kind.to_string(),
            currency: currency.to_uppercase(),
            date: date.to_string(),
        })
    }
}
