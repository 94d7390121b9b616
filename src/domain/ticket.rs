//! Ticket snapshot: the measured quantities and identifiers the line
//! builder reads. The engine never mutates the ticket itself.

use crate::domain::{CutType, EntryMethod, FacilityKind, Money, TicketId};
use serde::{Deserialize, Serialize};

/// Pricing context passed through to the price source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingContext {
    pub site_id: String,
    pub customer_id: String,
    pub source_location_id: String,
}

/// Immutable snapshot of a truck ticket at pricing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    pub ticket_id: TicketId,
    pub facility_id: String,
    pub facility_kind: FacilityKind,
    pub service_type_id: String,
    pub well_classification: String,
    pub source_location_id: String,
    pub facility_service_substance_id: String,
    pub material_approval_id: Option<String>,
    pub entry_method: EntryMethod,
    pub oil_volume: Money,
    pub oil_volume_percent: Money,
    pub water_volume: Money,
    pub water_volume_percent: Money,
    pub solid_volume: Money,
    pub solid_volume_percent: Money,
    /// Total measured load volume.
    pub load_volume: Money,
    pub net_weight: Money,
    pub tare_weight: Money,
    pub gross_weight: Money,
    pub pricing: PricingContext,
}

impl TicketSnapshot {
    /// Measured volume for a cut.
    pub fn volume(&self, cut: CutType) -> Money {
        match cut {
            CutType::Oil => self.oil_volume,
            CutType::Water => self.water_volume,
            CutType::Solid => self.solid_volume,
            CutType::Total => self.load_volume,
            CutType::None => Money::zero(),
        }
    }

    /// Measured percent-of-load for a cut.
    pub fn volume_percent(&self, cut: CutType) -> Money {
        match cut {
            CutType::Oil => self.oil_volume_percent,
            CutType::Water => self.water_volume_percent,
            CutType::Solid => self.solid_volume_percent,
            CutType::Total => Money::hundred(),
            CutType::None => Money::zero(),
        }
    }

    /// Quantity an additional service pulls from the ticket: load volume
    /// for cavern facilities, net weight otherwise.
    pub fn additional_service_quantity(&self) -> Money {
        match self.facility_kind {
            FacilityKind::Cavern => self.load_volume,
            _ => self.net_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn m(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn ticket(kind: FacilityKind) -> TicketSnapshot {
        TicketSnapshot {
            ticket_id: TicketId::new("TT-1"),
            facility_id: "FAC-1".to_string(),
            facility_kind: kind,
            service_type_id: "st-1".to_string(),
            well_classification: "Drilling".to_string(),
            source_location_id: "SL-1".to_string(),
            facility_service_substance_id: "FSS-1".to_string(),
            material_approval_id: None,
            entry_method: EntryMethod::Volume,
            oil_volume: m("3"),
            oil_volume_percent: m("30"),
            water_volume: m("5"),
            water_volume_percent: m("50"),
            solid_volume: m("2"),
            solid_volume_percent: m("20"),
            load_volume: m("10"),
            net_weight: m("100"),
            tare_weight: m("20"),
            gross_weight: m("120"),
            pricing: PricingContext {
                site_id: "SITE-1".to_string(),
                customer_id: "CUST-1".to_string(),
                source_location_id: "SL-1".to_string(),
            },
        }
    }

    #[test]
    fn test_volume_per_cut() {
        let t = ticket(FacilityKind::Landfill);
        assert_eq!(t.volume(CutType::Oil), m("3"));
        assert_eq!(t.volume(CutType::Water), m("5"));
        assert_eq!(t.volume(CutType::Solid), m("2"));
        assert_eq!(t.volume(CutType::Total), m("10"));
        assert_eq!(t.volume(CutType::None), Money::zero());
    }

    #[test]
    fn test_total_percent_is_hundred() {
        let t = ticket(FacilityKind::Landfill);
        assert_eq!(t.volume_percent(CutType::Total), Money::hundred());
    }

    #[test]
    fn test_additional_service_quantity_by_facility_kind() {
        assert_eq!(
            ticket(FacilityKind::Cavern).additional_service_quantity(),
            m("10")
        );
        assert_eq!(
            ticket(FacilityKind::Landfill).additional_service_quantity(),
            m("100")
        );
        assert_eq!(
            ticket(FacilityKind::Terminal).additional_service_quantity(),
            m("100")
        );
    }
}
