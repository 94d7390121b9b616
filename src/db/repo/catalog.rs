//! Service types and additional-services configuration persistence.

use super::{bool_column, opt_money_column, Repository};
use crate::domain::{
    AdditionalService, AdditionalServicesConfig, CutSettings, MatchDimension, MatchPredicate,
    ProductNumber, ServiceType, ThresholdKind, ZeroSuppression,
};
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn threshold_kind_str(kind: ThresholdKind) -> &'static str {
    match kind {
        ThresholdKind::Fixed => "fixed",
        ThresholdKind::Percentage => "percentage",
    }
}

fn parse_threshold_kind(value: &str) -> ThresholdKind {
    match value {
        "fixed" => ThresholdKind::Fixed,
        _ => ThresholdKind::Percentage,
    }
}

/// Read one cut's settings from its prefixed column group. Absent when
/// the product-number column is NULL.
fn cut_settings_columns(row: &SqliteRow, prefix: &str) -> Option<CutSettings> {
    let product_number: Option<String> = row.get(format!("{}_product_number", prefix).as_str());
    let product_number = product_number?;
    let product_name: Option<String> = row.get(format!("{}_product_name", prefix).as_str());
    let unit_of_measure: Option<String> = row.get(format!("{}_unit_of_measure", prefix).as_str());
    let threshold_kind: Option<String> = row.get(format!("{}_threshold_kind", prefix).as_str());
    let reverse: Option<i64> = row.get(format!("{}_reverse", prefix).as_str());

    Some(CutSettings {
        product_number: ProductNumber::new(product_number),
        product_name: product_name.unwrap_or_default(),
        unit_of_measure: unit_of_measure.unwrap_or_default(),
        threshold_kind: parse_threshold_kind(threshold_kind.as_deref().unwrap_or("percentage")),
        threshold_min: opt_money_column(row, &format!("{}_threshold_min", prefix)),
        threshold_max: opt_money_column(row, &format!("{}_threshold_max", prefix)),
        reverse: reverse.unwrap_or(0) != 0,
    })
}

fn map_service_type(row: &SqliteRow) -> ServiceType {
    ServiceType {
        id: row.get("id"),
        name: row.get("name"),
        includes_oil: bool_column(row, "includes_oil"),
        includes_water: bool_column(row, "includes_water"),
        includes_solids: bool_column(row, "includes_solids"),
        oil: cut_settings_columns(row, "oil"),
        water: cut_settings_columns(row, "water"),
        solid: cut_settings_columns(row, "solid"),
        // total settings are NOT NULL in the schema; the fallback never fires
        // for rows written through insert_service_type.
        total: cut_settings_columns(row, "total").unwrap_or_else(|| CutSettings {
            product_number: ProductNumber::new(""),
            product_name: String::new(),
            unit_of_measure: String::new(),
            threshold_kind: ThresholdKind::Percentage,
            threshold_min: None,
            threshold_max: None,
            reverse: false,
        }),
        oil_credit_min_volume: opt_money_column(row, "oil_credit_min_volume"),
        water_min_pricing_percent: opt_money_column(row, "water_min_pricing_percent"),
        solid_min_pricing_percent: opt_money_column(row, "solid_min_pricing_percent"),
    }
}

fn dimension_columns(row: &SqliteRow, prefix: &str) -> MatchDimension {
    let kind: String = row.get(format!("{}_kind", prefix).as_str());
    match kind.as_str() {
        "any" => MatchDimension::Any,
        "value" => {
            let value: Option<String> = row.get(format!("{}_value", prefix).as_str());
            MatchDimension::Value(value.unwrap_or_default())
        }
        _ => MatchDimension::Unspecified,
    }
}

fn dimension_kind_str(dimension: &MatchDimension) -> &'static str {
    match dimension {
        MatchDimension::Unspecified => "unspecified",
        MatchDimension::Any => "any",
        MatchDimension::Value(_) => "value",
    }
}

fn dimension_value(dimension: &MatchDimension) -> Option<&str> {
    match dimension {
        MatchDimension::Value(v) => Some(v.as_str()),
        _ => None,
    }
}

fn map_service(row: &SqliteRow) -> AdditionalService {
    AdditionalService {
        product_number: ProductNumber::new(row.get::<String, _>("product_number")),
        product_name: row.get("product_name"),
        unit_of_measure: row.get("unit_of_measure"),
        pull_quantity_from_ticket: bool_column(row, "pull_quantity_from_ticket"),
        zero_rate: bool_column(row, "zero_rate"),
        read_only: bool_column(row, "read_only"),
    }
}

impl Repository {
    /// Insert a service type, writing each cut's settings into its
    /// prefixed column group.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_service_type(&self, st: &ServiceType) -> Result<(), sqlx::Error> {
        let mut query = sqlx::query(
            r#"
            INSERT INTO service_types (
                id, name, includes_oil, includes_water, includes_solids,
                oil_credit_min_volume, water_min_pricing_percent, solid_min_pricing_percent,
                oil_product_number, oil_product_name, oil_unit_of_measure,
                oil_threshold_kind, oil_threshold_min, oil_threshold_max, oil_reverse,
                water_product_number, water_product_name, water_unit_of_measure,
                water_threshold_kind, water_threshold_min, water_threshold_max, water_reverse,
                solid_product_number, solid_product_name, solid_unit_of_measure,
                solid_threshold_kind, solid_threshold_min, solid_threshold_max, solid_reverse,
                total_product_number, total_product_name, total_unit_of_measure,
                total_threshold_kind, total_threshold_min, total_threshold_max, total_reverse
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?
            )
            "#,
        )
        .bind(&st.id)
        .bind(&st.name)
        .bind(st.includes_oil)
        .bind(st.includes_water)
        .bind(st.includes_solids)
        .bind(st.oil_credit_min_volume.map(|m| m.to_canonical_string()))
        .bind(st.water_min_pricing_percent.map(|m| m.to_canonical_string()))
        .bind(st.solid_min_pricing_percent.map(|m| m.to_canonical_string()));

        for settings in [st.oil.as_ref(), st.water.as_ref(), st.solid.as_ref()] {
            query = query
                .bind(settings.map(|s| s.product_number.as_str().to_string()))
                .bind(settings.map(|s| s.product_name.clone()))
                .bind(settings.map(|s| s.unit_of_measure.clone()))
                .bind(settings.map(|s| threshold_kind_str(s.threshold_kind)))
                .bind(settings.and_then(|s| s.threshold_min.map(|m| m.to_canonical_string())))
                .bind(settings.and_then(|s| s.threshold_max.map(|m| m.to_canonical_string())))
                .bind(settings.map(|s| s.reverse));
        }

        query
            .bind(st.total.product_number.as_str())
            .bind(&st.total.product_name)
            .bind(&st.total.unit_of_measure)
            .bind(threshold_kind_str(st.total.threshold_kind))
            .bind(st.total.threshold_min.map(|m| m.to_canonical_string()))
            .bind(st.total.threshold_max.map(|m| m.to_canonical_string()))
            .bind(st.total.reverse)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a service type by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_service_type(&self, id: &str) -> Result<Option<ServiceType>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM service_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_service_type))
    }

    /// Insert an additional-services configuration and its service rows.
    ///
    /// # Errors
    /// Returns an error if any insert fails.
    pub async fn insert_config(
        &self,
        config: &AdditionalServicesConfig,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO additional_services_configs (
                id, facility_id,
                well_classification_kind, well_classification_value,
                source_location_kind, source_location_value,
                facility_service_substance_kind, facility_service_substance_value,
                zero_oil, zero_water, zero_solids, zero_total, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&config.id)
        .bind(&config.facility_id)
        .bind(dimension_kind_str(&config.predicate.well_classification))
        .bind(dimension_value(&config.predicate.well_classification))
        .bind(dimension_kind_str(&config.predicate.source_location))
        .bind(dimension_value(&config.predicate.source_location))
        .bind(dimension_kind_str(&config.predicate.facility_service_substance))
        .bind(dimension_value(&config.predicate.facility_service_substance))
        .bind(config.zero_suppression.oil)
        .bind(config.zero_suppression.water)
        .bind(config.zero_suppression.solids)
        .bind(config.zero_suppression.total)
        .bind(config.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        for service in &config.services {
            sqlx::query(
                r#"
                INSERT INTO config_services (
                    config_id, product_number, product_name, unit_of_measure,
                    pull_quantity_from_ticket, zero_rate, read_only
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&config.id)
            .bind(service.product_number.as_str())
            .bind(&service.product_name)
            .bind(&service.unit_of_measure)
            .bind(service.pull_quantity_from_ticket)
            .bind(service.zero_rate)
            .bind(service.read_only)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// List all configurations for a facility, services attached.
    ///
    /// # Errors
    /// Returns an error if a query fails.
    pub async fn list_configs_for_facility(
        &self,
        facility_id: &str,
    ) -> Result<Vec<AdditionalServicesConfig>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM additional_services_configs WHERE facility_id = ? ORDER BY id ASC",
        )
        .bind(facility_id)
        .fetch_all(&self.pool)
        .await?;

        let mut configs = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let service_rows = sqlx::query(
                "SELECT * FROM config_services WHERE config_id = ? ORDER BY product_number ASC",
            )
            .bind(&id)
            .fetch_all(&self.pool)
            .await?;

            let updated_ms: i64 = row.get("updated_at");
            configs.push(AdditionalServicesConfig {
                id,
                facility_id: row.get("facility_id"),
                predicate: MatchPredicate {
                    well_classification: dimension_columns(row, "well_classification"),
                    source_location: dimension_columns(row, "source_location"),
                    facility_service_substance: dimension_columns(
                        row,
                        "facility_service_substance",
                    ),
                },
                zero_suppression: ZeroSuppression {
                    oil: bool_column(row, "zero_oil"),
                    water: bool_column(row, "zero_water"),
                    solids: bool_column(row, "zero_solids"),
                    total: bool_column(row, "zero_total"),
                },
                services: service_rows.iter().map(map_service).collect(),
                updated_at: DateTime::from_timestamp_millis(updated_ms)
                    .unwrap_or(DateTime::UNIX_EPOCH),
            });
        }

        Ok(configs)
    }
}
