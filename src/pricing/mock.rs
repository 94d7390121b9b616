//! Mock price source for testing without network calls.

use super::{PriceMap, PriceSource, PricedRate, PricingError};
use crate::domain::{Money, PricingContext, ProductNumber};
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock price source that returns predefined rates.
#[derive(Debug, Clone, Default)]
pub struct MockPriceSource {
    rates: HashMap<ProductNumber, PricedRate>,
    fail_with: Option<String>,
}

impl MockPriceSource {
    /// Create a new mock price source with no priced products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a priced product.
    pub fn with_rate(mut self, product: ProductNumber, rate: Money) -> Self {
        self.rates.insert(
            product,
            PricedRate {
                rate,
                rule_id: None,
            },
        );
        self
    }

    /// Add a priced product with a rule identifier.
    pub fn with_ruled_rate(mut self, product: ProductNumber, rate: Money, rule_id: &str) -> Self {
        self.rates.insert(
            product,
            PricedRate {
                rate,
                rule_id: Some(rule_id.to_string()),
            },
        );
        self
    }

    /// Make every fetch fail with the given message.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_prices(
        &self,
        products: &[ProductNumber],
        _context: &PricingContext,
    ) -> Result<PriceMap, PricingError> {
        if let Some(message) = &self.fail_with {
            return Err(PricingError::Other(message.clone()));
        }

        Ok(products
            .iter()
            .filter_map(|p| self.rates.get(p).map(|r| (p.clone(), r.clone())))
            .collect())
    }
}
