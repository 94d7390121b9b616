//! Per-cut pricing rules: minimum-threshold gates used by the refresh
//! policy.

use crate::domain::{CutType, Money, ServiceType};

/// The minimum-threshold rule applicable to one cut of a service type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutRule {
    /// Oil credits: absolute volume gated by `oil_credit_min_volume`.
    Oil { min_volume: Option<Money> },
    /// Water cuts: percent-of-load gated by `water_min_pricing_percent`.
    Water { min_percent: Option<Money> },
    /// Solid cuts: percent-of-load gated by `solid_min_pricing_percent`.
    Solid { min_percent: Option<Money> },
    /// Cuts the service type does not bill, totals and non-cut lines.
    /// Carries no minimum gate.
    Default,
}

/// Resolve the rule for a candidate line's cut type. A cut the service
/// type does not include yields the Default rule.
pub fn rule_for(service_type: &ServiceType, cut: CutType) -> CutRule {
    match cut {
        CutType::Oil if service_type.includes_oil => CutRule::Oil {
            min_volume: service_type.oil_credit_min_volume,
        },
        CutType::Water if service_type.includes_water => CutRule::Water {
            min_percent: service_type.water_min_pricing_percent,
        },
        CutType::Solid if service_type.includes_solids => CutRule::Solid {
            min_percent: service_type.solid_min_pricing_percent,
        },
        _ => CutRule::Default,
    }
}

impl CutRule {
    /// Freeze gate: true when the measured quantity/percent sits below
    /// the configured minimum while the current rate is already zero, in
    /// which case there is nothing to re-price. Crossing the threshold
    /// (or a non-zero rate) always forces a refresh.
    pub fn below_pricing_minimum(
        &self,
        quantity: Money,
        quantity_percent: Money,
        rate: Money,
    ) -> bool {
        if !rate.is_zero() {
            return false;
        }
        match self {
            CutRule::Oil {
                min_volume: Some(min),
            } => quantity.abs() < *min,
            CutRule::Water {
                min_percent: Some(min),
            }
            | CutRule::Solid {
                min_percent: Some(min),
            } => quantity_percent < *min,
            _ => false,
        }
    }
}
