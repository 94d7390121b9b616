//! ServiceType configuration: which cuts a service bills and how.

use crate::domain::{CutType, Money, ProductNumber};
use serde::{Deserialize, Serialize};

/// How a cut's threshold bounds are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdKind {
    /// Absolute volume bounds.
    Fixed,
    /// Percentage-of-load bounds.
    Percentage,
}

/// Per-cut billing settings on a service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutSettings {
    pub product_number: ProductNumber,
    pub product_name: String,
    pub unit_of_measure: String,
    pub threshold_kind: ThresholdKind,
    pub threshold_min: Option<Money>,
    pub threshold_max: Option<Money>,
    /// Negate the line quantity (credit convention).
    pub reverse: bool,
}

/// Static configuration describing which cuts a service includes,
/// thresholds, pricing minimums and reversal flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: String,
    pub name: String,
    pub includes_oil: bool,
    pub includes_water: bool,
    pub includes_solids: bool,
    pub oil: Option<CutSettings>,
    pub water: Option<CutSettings>,
    pub solid: Option<CutSettings>,
    /// Settings for the total line; present on every service type.
    pub total: CutSettings,
    /// Oil credits below this absolute volume are not priced.
    pub oil_credit_min_volume: Option<Money>,
    /// Water cuts below this percent of load are not priced.
    pub water_min_pricing_percent: Option<Money>,
    /// Solid cuts below this percent of load are not priced.
    pub solid_min_pricing_percent: Option<Money>,
}

impl ServiceType {
    /// Whether the service type bills the given cut at all.
    pub fn includes(&self, cut: CutType) -> bool {
        match cut {
            CutType::Oil => self.includes_oil,
            CutType::Water => self.includes_water,
            CutType::Solid => self.includes_solids,
            CutType::Total => true,
            CutType::None => false,
        }
    }

    /// A service type with no cuts bills the raw load ("service-only").
    pub fn is_service_only(&self) -> bool {
        !self.includes_oil && !self.includes_water && !self.includes_solids
    }

    /// Settings for a cut, None when the cut is excluded.
    pub fn cut_settings(&self, cut: CutType) -> Option<&CutSettings> {
        match cut {
            CutType::Oil if self.includes_oil => self.oil.as_ref(),
            CutType::Water if self.includes_water => self.water.as_ref(),
            CutType::Solid if self.includes_solids => self.solid.as_ref(),
            CutType::Total => Some(&self.total),
            _ => None,
        }
    }
}
