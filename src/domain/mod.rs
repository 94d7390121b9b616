//! Domain types for the sales line pricing engine.
//!
//! This module provides:
//! - Lossless monetary handling via the Money wrapper
//! - Identifiers and enumerations: TicketId, ProductNumber, CutType, LineStatus
//! - SalesLine, ServiceType and TicketSnapshot records
//! - Invoice / LoadConfirmation aggregate containers
//! - Typed match predicates for additional-services configurations

pub mod additional_services;
pub mod containers;
pub mod money;
pub mod primitives;
pub mod sales_line;
pub mod service_type;
pub mod ticket;

pub use additional_services::{
    AdditionalService, AdditionalServicesConfig, MatchDimension, MatchPredicate, ZeroSuppression,
};
pub use containers::{DeliveryMode, Invoice, LoadConfirmation, TotalsDelta};
pub use money::Money;
pub use primitives::{
    CutType, EntryMethod, FacilityKind, InvoiceId, LineStatus, LoadConfirmationId, ProductNumber,
    TicketId,
};
pub use sales_line::{PriceChange, SalesLine};
pub use service_type::{CutSettings, ServiceType, ThresholdKind};
pub use ticket::{PricingContext, TicketSnapshot};
