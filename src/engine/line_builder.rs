//! Pure construction of sales lines from a ticket snapshot.
//!
//! One line per included cut, one total line, and one line per matched
//! additional service. No I/O: prices arrive as a pre-fetched map and
//! unpriced products degrade to Exception lines instead of failing the
//! batch.

use crate::domain::{
    AdditionalService, AdditionalServicesConfig, CutSettings, CutType, LineStatus, Money,
    ProductNumber, SalesLine, ServiceType, TicketSnapshot, ZeroSuppression,
};
use crate::pricing::PriceMap;
use thiserror::Error;

/// Inputs for one line-generation pass.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub ticket: &'a TicketSnapshot,
    pub service_type: &'a ServiceType,
    /// Best-matching additional-services configuration, if any.
    pub config: Option<&'a AdditionalServicesConfig>,
    pub prices: &'a PriceMap,
}

#[derive(Debug, Error)]
pub enum LineBuildError {
    /// The service type includes a cut but carries no settings for it.
    #[error("service type {service_type} includes {cut} but has no settings for it")]
    MissingCutSettings { service_type: String, cut: CutType },
}

/// Every product number a generation pass may need a price for, so the
/// orchestration layer can resolve them in a single pricing call.
pub fn candidate_products(
    service_type: &ServiceType,
    config: Option<&AdditionalServicesConfig>,
) -> Vec<ProductNumber> {
    let mut products = Vec::new();
    for cut in [CutType::Oil, CutType::Water, CutType::Solid, CutType::Total] {
        if let Some(settings) = service_type.cut_settings(cut) {
            products.push(settings.product_number.clone());
        }
    }
    if let Some(config) = config {
        for service in &config.services {
            products.push(service.product_number.clone());
        }
    }
    products.sort();
    products.dedup();
    products
}

/// Build the full candidate batch for a ticket: cut lines in fixed order
/// (oil, water, solid), the total line, then additional services.
pub fn build_lines(ctx: LineContext<'_>) -> Result<Vec<SalesLine>, LineBuildError> {
    let mut lines = Vec::new();

    for cut in [CutType::Oil, CutType::Water, CutType::Solid] {
        if !ctx.service_type.includes(cut) {
            continue;
        }
        let settings =
            ctx.service_type
                .cut_settings(cut)
                .ok_or_else(|| LineBuildError::MissingCutSettings {
                    service_type: ctx.service_type.id.clone(),
                    cut,
                })?;
        lines.push(build_cut_line(&ctx, cut, settings));
    }

    lines.push(build_total_line(&ctx));

    if let Some(config) = ctx.config {
        for service in &config.services {
            lines.push(build_additional_service_line(&ctx, service));
        }
    }

    Ok(lines)
}

fn zero_suppression(ctx: &LineContext<'_>) -> ZeroSuppression {
    ctx.config
        .map(|c| c.zero_suppression)
        .unwrap_or_default()
}

fn suppressed_for(cut: CutType, flags: ZeroSuppression) -> bool {
    match cut {
        CutType::Oil => flags.oil,
        CutType::Water => flags.water,
        CutType::Solid => flags.solids,
        CutType::Total => flags.total,
        CutType::None => false,
    }
}

/// Resolve a rate from the price map, honoring zero-suppression.
///
/// Suppression wins over any priced lookup; an absent price forces the
/// line to Exception with a zero rate so operators see it.
fn resolve_rate(
    prices: &PriceMap,
    product: &ProductNumber,
    suppressed: bool,
) -> (Money, LineStatus) {
    if suppressed {
        return (Money::zero(), LineStatus::Preview);
    }
    match prices.get(product) {
        Some(priced) => (priced.rate, LineStatus::Preview),
        None => (Money::zero(), LineStatus::Exception),
    }
}

fn build_cut_line(ctx: &LineContext<'_>, cut: CutType, settings: &CutSettings) -> SalesLine {
    let mut quantity = ctx.ticket.volume(cut);
    if settings.reverse {
        quantity = -quantity;
    }
    let quantity_percent = ctx.ticket.volume_percent(cut);

    let suppressed = suppressed_for(cut, zero_suppression(ctx));
    let (rate, status) = resolve_rate(ctx.prices, &settings.product_number, suppressed);

    new_line(
        ctx.ticket,
        cut,
        settings,
        quantity,
        quantity_percent,
        rate,
        status,
        LineFlags {
            is_cut_line: true,
            ..Default::default()
        },
    )
}

fn build_total_line(ctx: &LineContext<'_>) -> SalesLine {
    // Service-only tickets bill the raw load; otherwise the total is the
    // sum of the included cuts.
    let quantity = if ctx.service_type.is_service_only() {
        ctx.ticket.load_volume
    } else {
        [CutType::Oil, CutType::Water, CutType::Solid]
            .into_iter()
            .filter(|cut| ctx.service_type.includes(*cut))
            .fold(Money::zero(), |acc, cut| acc + ctx.ticket.volume(cut))
    };

    let settings = &ctx.service_type.total;
    let suppressed = suppressed_for(CutType::Total, zero_suppression(ctx));
    let (rate, status) = resolve_rate(ctx.prices, &settings.product_number, suppressed);

    new_line(
        ctx.ticket,
        CutType::Total,
        settings,
        quantity,
        Money::hundred(),
        rate,
        status,
        LineFlags {
            is_cut_line: true,
            ..Default::default()
        },
    )
}

fn build_additional_service_line(ctx: &LineContext<'_>, service: &AdditionalService) -> SalesLine {
    let quantity = if service.pull_quantity_from_ticket {
        ctx.ticket.additional_service_quantity()
    } else {
        Money::one()
    };

    let (rate, status) = resolve_rate(ctx.prices, &service.product_number, service.zero_rate);

    let line_key = SalesLine::compute_line_key(
        &ctx.ticket.ticket_id,
        CutType::None,
        &service.product_number,
    );
    SalesLine {
        id: uuid::Uuid::new_v4().to_string(),
        line_key,
        ticket_id: ctx.ticket.ticket_id.clone(),
        product_number: service.product_number.clone(),
        product_name: service.product_name.clone(),
        unit_of_measure: service.unit_of_measure.clone(),
        cut_type: CutType::None,
        quantity,
        quantity_percent: Money::hundred(),
        rate,
        total_value: Money::extend(quantity, rate),
        status,
        is_additional_service: true,
        is_cut_line: false,
        is_reversal: false,
        is_reversed: false,
        is_rate_overridden: false,
        is_read_only: service.read_only,
        can_price_be_refreshed: true,
        invoice_id: None,
        load_confirmation_id: None,
        price_change: None,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct LineFlags {
    is_cut_line: bool,
}

#[allow(clippy::too_many_arguments)]
fn new_line(
    ticket: &TicketSnapshot,
    cut: CutType,
    settings: &CutSettings,
    quantity: Money,
    quantity_percent: Money,
    rate: Money,
    status: LineStatus,
    flags: LineFlags,
) -> SalesLine {
    let line_key = SalesLine::compute_line_key(&ticket.ticket_id, cut, &settings.product_number);
    SalesLine {
        id: uuid::Uuid::new_v4().to_string(),
        line_key,
        ticket_id: ticket.ticket_id.clone(),
        product_number: settings.product_number.clone(),
        product_name: settings.product_name.clone(),
        unit_of_measure: settings.unit_of_measure.clone(),
        cut_type: cut,
        quantity,
        quantity_percent,
        rate,
        total_value: Money::extend(quantity, rate),
        status,
        is_additional_service: false,
        is_cut_line: flags.is_cut_line,
        is_reversal: false,
        is_reversed: false,
        is_rate_overridden: false,
        is_read_only: false,
        can_price_be_refreshed: true,
        invoice_id: None,
        load_confirmation_id: None,
        price_change: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EntryMethod, FacilityKind, MatchPredicate, PricingContext, ThresholdKind, TicketId,
    };
    use crate::pricing::PricedRate;
    use chrono::Utc;
    use std::str::FromStr;

    fn m(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn settings(product: &str, reverse: bool) -> CutSettings {
        CutSettings {
            product_number: ProductNumber::new(product),
            product_name: format!("Product {}", product),
            unit_of_measure: "m3".to_string(),
            threshold_kind: ThresholdKind::Percentage,
            threshold_min: None,
            threshold_max: None,
            reverse,
        }
    }

    fn service_type() -> ServiceType {
        ServiceType {
            id: "st-1".to_string(),
            name: "Treatment".to_string(),
            includes_oil: true,
            includes_water: true,
            includes_solids: true,
            oil: Some(settings("40100", false)),
            water: Some(settings("40200", false)),
            solid: Some(settings("40300", false)),
            total: settings("40000", false),
            oil_credit_min_volume: None,
            water_min_pricing_percent: None,
            solid_min_pricing_percent: None,
        }
    }

    fn ticket() -> TicketSnapshot {
        TicketSnapshot {
            ticket_id: TicketId::new("TT-1"),
            facility_id: "FAC-1".to_string(),
            facility_kind: FacilityKind::Cavern,
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

    fn priced(products: &[(&str, &str)]) -> PriceMap {
        products
            .iter()
            .map(|(p, r)| {
                (
                    ProductNumber::new(*p),
                    PricedRate {
                        rate: m(r),
                        rule_id: None,
                    },
                )
            })
            .collect()
    }

    fn config_with(
        zero_suppression: ZeroSuppression,
        services: Vec<AdditionalService>,
    ) -> AdditionalServicesConfig {
        AdditionalServicesConfig {
            id: "cfg-1".to_string(),
            facility_id: "FAC-1".to_string(),
            predicate: MatchPredicate::default(),
            zero_suppression,
            services,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_one_line_per_cut_plus_total() {
        let st = service_type();
        let ticket = ticket();
        let prices = priced(&[
            ("40100", "10"),
            ("40200", "5"),
            ("40300", "7"),
            ("40000", "2"),
        ]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        assert_eq!(lines.len(), 4);
        let cuts: Vec<_> = lines.iter().map(|l| l.cut_type).collect();
        assert_eq!(
            cuts,
            vec![CutType::Oil, CutType::Water, CutType::Solid, CutType::Total]
        );
        assert!(lines.iter().all(|l| l.is_cut_line));
        assert!(lines.iter().all(|l| l.status == LineStatus::Preview));
        assert!(lines.iter().all(|l| l.can_price_be_refreshed));
    }

    #[test]
    fn test_reverse_flag_negates_quantity() {
        let mut st = service_type();
        st.oil = Some(settings("40100", true));
        let ticket = ticket();
        let prices = priced(&[("40100", "10")]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        let oil = lines.iter().find(|l| l.cut_type == CutType::Oil).unwrap();
        assert_eq!(oil.quantity, m("-3"));
        assert_eq!(oil.total_value, m("-30"));
    }

    #[test]
    fn test_zero_suppression_beats_priced_lookup() {
        let st = service_type();
        let ticket = ticket();
        let prices = priced(&[("40100", "10"), ("40200", "5")]);
        let config = config_with(
            ZeroSuppression {
                oil: true,
                ..Default::default()
            },
            vec![],
        );
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: Some(&config),
            prices: &prices,
        })
        .unwrap();

        let oil = lines.iter().find(|l| l.cut_type == CutType::Oil).unwrap();
        assert_eq!(oil.rate, Money::zero());
        assert_eq!(oil.total_value, Money::zero());
        // Suppression is intentional, not an exception.
        assert_eq!(oil.status, LineStatus::Preview);

        let water = lines.iter().find(|l| l.cut_type == CutType::Water).unwrap();
        assert_eq!(water.rate, m("5"));
    }

    #[test]
    fn test_unpriced_product_becomes_exception() {
        let st = service_type();
        let ticket = ticket();
        let prices = priced(&[("40100", "10")]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        let water = lines.iter().find(|l| l.cut_type == CutType::Water).unwrap();
        assert_eq!(water.status, LineStatus::Exception);
        assert_eq!(water.rate, Money::zero());
        assert_eq!(water.total_value, Money::zero());
    }

    #[test]
    fn test_total_line_sums_included_cuts() {
        let mut st = service_type();
        st.includes_water = false;
        st.water = None;
        let ticket = ticket();
        let prices = priced(&[("40100", "10"), ("40300", "7"), ("40000", "2")]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        let total = lines.iter().find(|l| l.cut_type == CutType::Total).unwrap();
        // oil 3 + solid 2, water excluded
        assert_eq!(total.quantity, m("5"));
        assert_eq!(total.quantity_percent, Money::hundred());
    }

    #[test]
    fn test_service_only_total_uses_load_volume() {
        let mut st = service_type();
        st.includes_oil = false;
        st.includes_water = false;
        st.includes_solids = false;
        st.oil = None;
        st.water = None;
        st.solid = None;
        let ticket = ticket();
        let prices = priced(&[("40000", "2")]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].cut_type, CutType::Total);
        assert_eq!(lines[0].quantity, m("10"));
        assert_eq!(lines[0].total_value, m("20"));
    }

    #[test]
    fn test_additional_service_defaults_to_unit_quantity() {
        let st = service_type();
        let ticket = ticket();
        let prices = priced(&[("60010", "150")]);
        let config = config_with(
            ZeroSuppression::default(),
            vec![AdditionalService {
                product_number: ProductNumber::new("60010"),
                product_name: "Wash fee".to_string(),
                unit_of_measure: "ea".to_string(),
                pull_quantity_from_ticket: false,
                zero_rate: false,
                read_only: true,
            }],
        );
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: Some(&config),
            prices: &prices,
        })
        .unwrap();

        let service = lines.iter().find(|l| l.is_additional_service).unwrap();
        assert_eq!(service.quantity, Money::one());
        assert_eq!(service.quantity_percent, Money::hundred());
        assert_eq!(service.total_value, m("150"));
        assert!(service.is_read_only);
        assert!(!service.is_cut_line);
        assert_eq!(service.cut_type, CutType::None);
    }

    #[test]
    fn test_additional_service_pulls_ticket_quantity() {
        let st = service_type();
        // Cavern facility pulls load volume; others pull net weight.
        let mut cavern = ticket();
        cavern.facility_kind = FacilityKind::Cavern;
        let mut landfill = ticket();
        landfill.facility_kind = FacilityKind::Landfill;

        let prices = priced(&[("60020", "3")]);
        let config = config_with(
            ZeroSuppression::default(),
            vec![AdditionalService {
                product_number: ProductNumber::new("60020"),
                product_name: "Handling".to_string(),
                unit_of_measure: "t".to_string(),
                pull_quantity_from_ticket: true,
                zero_rate: false,
                read_only: false,
            }],
        );

        for (ticket, expected) in [(&cavern, m("10")), (&landfill, m("100"))] {
            let lines = build_lines(LineContext {
                ticket,
                service_type: &st,
                config: Some(&config),
                prices: &prices,
            })
            .unwrap();
            let service = lines.iter().find(|l| l.is_additional_service).unwrap();
            assert_eq!(service.quantity, expected);
        }
    }

    #[test]
    fn test_candidate_products_deduplicated() {
        let st = service_type();
        let config = config_with(
            ZeroSuppression::default(),
            vec![AdditionalService {
                product_number: ProductNumber::new("40100"),
                product_name: "Dup of oil product".to_string(),
                unit_of_measure: "ea".to_string(),
                pull_quantity_from_ticket: false,
                zero_rate: false,
                read_only: false,
            }],
        );
        let products = candidate_products(&st, Some(&config));
        assert_eq!(products.len(), 4);
        assert!(products.contains(&ProductNumber::new("40100")));
        assert!(products.contains(&ProductNumber::new("40000")));
    }

    #[test]
    fn test_missing_cut_settings_is_an_error() {
        let mut st = service_type();
        st.oil = None; // still includes_oil
        let ticket = ticket();
        let prices = PriceMap::new();
        let result = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        });
        assert!(matches!(
            result,
            Err(LineBuildError::MissingCutSettings { cut: CutType::Oil, .. })
        ));
    }

    #[test]
    fn test_rounding_applied_to_total_value() {
        let mut st = service_type();
        st.includes_water = false;
        st.includes_solids = false;
        st.water = None;
        st.solid = None;
        let mut ticket = ticket();
        ticket.oil_volume = m("33.336");
        let prices = priced(&[("40100", "22.226"), ("40000", "0")]);
        let lines = build_lines(LineContext {
            ticket: &ticket,
            service_type: &st,
            config: None,
            prices: &prices,
        })
        .unwrap();

        let oil = lines.iter().find(|l| l.cut_type == CutType::Oil).unwrap();
        assert_eq!(oil.total_value, m("741.15"));
    }
}
