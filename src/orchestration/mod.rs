//! Orchestration layer wiring the pure engine to pricing and storage.

pub mod billing;

pub use billing::{BillingEngine, BillingError};
