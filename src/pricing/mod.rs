//! Price source abstraction for resolving product rates from the
//! pricing service.

use crate::domain::{Money, PricingContext, ProductNumber};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

pub mod mock;
pub mod remote;

pub use mock::MockPriceSource;
pub use remote::RemotePriceSource;

/// A resolved price for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedRate {
    pub rate: Money,
    /// Identifier of the price rule that produced the rate, when the
    /// pricing service reports one.
    pub rule_id: Option<String>,
}

/// Map from product number to its resolved price. Absence of a product
/// means "unpriced" and surfaces as an Exception line, not an error.
pub type PriceMap = HashMap<ProductNumber, PricedRate>;

/// Price source trait for resolving product rates.
///
/// Implementations must handle retry/backoff and rate limiting.
#[async_trait]
pub trait PriceSource: Send + Sync + fmt::Debug {
    /// Resolve rates for a set of products in one call.
    ///
    /// # Arguments
    /// * `products` - Product numbers to price
    /// * `context` - Site / customer / source-location pricing context
    ///
    /// # Returns
    /// A map containing an entry for every product the pricing service
    /// could resolve; unpriced products are simply absent.
    async fn fetch_prices(
        &self,
        products: &[ProductNumber],
        context: &PricingContext,
    ) -> Result<PriceMap, PricingError>;
}

/// Error type for price source operations.
#[derive(Debug, Clone)]
pub enum PricingError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            PricingError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            PricingError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            PricingError::RateLimited => write!(f, "Rate limited"),
            PricingError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PricingError {}
