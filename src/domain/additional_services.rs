//! Additional-services configuration with typed match predicates.
//!
//! A configuration matches a ticket on three dimensions (well
//! classification, source location, facility-service-substance), each
//! independently unspecified, wildcard, or an exact value. Selection
//! among matching configurations is specificity-ranked in the engine.

use crate::domain::ProductNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dimension of a match predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum MatchDimension {
    /// Dimension not part of this configuration's predicate.
    #[default]
    Unspecified,
    /// Matches every ticket value.
    Any,
    /// Matches only the exact value.
    Value(String),
}

impl MatchDimension {
    /// Whether a ticket value satisfies this dimension.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            MatchDimension::Unspecified => true,
            MatchDimension::Any => true,
            MatchDimension::Value(v) => v == candidate,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, MatchDimension::Value(_))
    }
}

/// Typed match predicate over the three ticket dimensions, in fixed
/// order: well classification, source location,
/// facility-service-substance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MatchPredicate {
    pub well_classification: MatchDimension,
    pub source_location: MatchDimension,
    pub facility_service_substance: MatchDimension,
}

impl MatchPredicate {
    /// Whether a ticket's dimension values satisfy all three dimensions.
    pub fn matches(
        &self,
        well_classification: &str,
        source_location: &str,
        facility_service_substance: &str,
    ) -> bool {
        self.well_classification.matches(well_classification)
            && self.source_location.matches(source_location)
            && self
                .facility_service_substance
                .matches(facility_service_substance)
    }

    /// Specificity rank: 2 when the facility-service-substance dimension
    /// is an exact value, 1 when the source-location dimension is, else 0.
    pub fn specificity(&self) -> u8 {
        if self.facility_service_substance.is_value() {
            2
        } else if self.source_location.is_value() {
            1
        } else {
            0
        }
    }
}

/// Zero-suppression flags forcing a cut or service's rate to zero
/// regardless of catalog pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ZeroSuppression {
    pub oil: bool,
    pub water: bool,
    pub solids: bool,
    pub total: bool,
}

/// An additional-service product attached to a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub product_number: ProductNumber,
    pub product_name: String,
    pub unit_of_measure: String,
    /// Take quantity from the ticket instead of defaulting to 1.
    pub pull_quantity_from_ticket: bool,
    /// Suppress pricing for this service.
    pub zero_rate: bool,
    pub read_only: bool,
}

/// A rule set associating zero-suppression flags and additional-service
/// products with a match predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalServicesConfig {
    pub id: String,
    pub facility_id: String,
    pub predicate: MatchPredicate,
    pub zero_suppression: ZeroSuppression,
    pub services: Vec<AdditionalService>,
    /// Tie-break among equally-ranked configurations: latest wins.
    pub updated_at: DateTime<Utc>,
}
