//! Specificity-ranked selection of additional-services configurations.

use crate::domain::AdditionalServicesConfig;

/// Select the best-matching configuration for a ticket's dimension values.
///
/// A configuration with an exact facility-service-substance predicate
/// beats one with an exact source-location predicate, which beats
/// well-classification-only and wildcard matches. Equally ranked
/// configurations break on `updated_at` descending, then id ascending,
/// so selection is deterministic regardless of input order.
pub fn select_configuration<'a>(
    candidates: &'a [AdditionalServicesConfig],
    well_classification: &str,
    source_location: &str,
    facility_service_substance: &str,
) -> Option<&'a AdditionalServicesConfig> {
    candidates
        .iter()
        .filter(|config| {
            config.predicate.matches(
                well_classification,
                source_location,
                facility_service_substance,
            )
        })
        .max_by(|a, b| {
            a.predicate
                .specificity()
                .cmp(&b.predicate.specificity())
                .then_with(|| a.updated_at.cmp(&b.updated_at))
                .then_with(|| b.id.cmp(&a.id))
        })
}
