//! Pure decision logic for sales line pricing and aggregation.
//!
//! No I/O happens here: the orchestration layer loads service types,
//! configurations, prices and containers, then calls into these modules.

pub mod aggregator;
pub mod cut_rules;
pub mod line_builder;
pub mod matcher;
pub mod refresh_policy;

pub use aggregator::{plan_adjustments, ContainerAdjustment, ContainerRef, LineFinancials};
pub use cut_rules::{rule_for, CutRule};
pub use line_builder::{build_lines, candidate_products, LineBuildError, LineContext};
pub use matcher::select_configuration;
pub use refresh_policy::{policy_for, should_refresh_pricing, RefreshPolicy};
