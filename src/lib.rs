pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod pricing;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    AdditionalServicesConfig, CutType, Invoice, InvoiceId, LineStatus, LoadConfirmation,
    LoadConfirmationId, Money, ProductNumber, SalesLine, ServiceType, TicketId, TicketSnapshot,
};
pub use error::AppError;
pub use orchestration::{BillingEngine, BillingError};
pub use pricing::{MockPriceSource, PriceSource, PricingError, RemotePriceSource};
