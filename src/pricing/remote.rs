//! HTTP client for the central pricing service.

use super::{PriceMap, PriceSource, PricedRate, PricingError};
use crate::domain::{Money, PricingContext, ProductNumber};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Price source backed by the pricing service's quote endpoint.
#[derive(Debug, Clone)]
pub struct RemotePriceSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRow {
    product_number: String,
    rate: String,
    #[serde(default)]
    rule_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    quotes: Vec<QuoteRow>,
}

impl RemotePriceSource {
    /// Create a new price source against the given base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post_quotes(
        &self,
        payload: serde_json::Value,
    ) -> Result<QuoteResponse, PricingError> {
        let url = format!("{}/v1/quotes", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(PricingError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(PricingError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(PricingError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(PricingError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<QuoteResponse>()
                .await
                .map_err(|e| backoff::Error::permanent(PricingError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl PriceSource for RemotePriceSource {
    async fn fetch_prices(
        &self,
        products: &[ProductNumber],
        context: &PricingContext,
    ) -> Result<PriceMap, PricingError> {
        if products.is_empty() {
            return Ok(PriceMap::new());
        }

        debug!(
            "Fetching prices for {} products, site={}, customer={}, source={}",
            products.len(),
            context.site_id,
            context.customer_id,
            context.source_location_id
        );

        let payload = serde_json::json!({
            "products": products.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            "siteId": context.site_id,
            "customerId": context.customer_id,
            "sourceLocationId": context.source_location_id,
        });

        let response = self.post_quotes(payload).await?;

        let mut map = PriceMap::new();
        for row in response.quotes {
            let rate = Money::from_str_canonical(&row.rate)
                .map_err(|e| PricingError::ParseError(format!("rate {}: {}", row.rate, e)))?;
            map.insert(
                ProductNumber::new(row.product_number),
                PricedRate {
                    rate,
                    rule_id: row.rule_id,
                },
            );
        }
        Ok(map)
    }
}
