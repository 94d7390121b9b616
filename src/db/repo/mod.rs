//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database
//! operations. Methods are organized across submodules by domain:
//! - `lines.rs` - Sales line persistence and queries
//! - `containers.rs` - Invoice and load-confirmation aggregates
//! - `catalog.rs` - Service types and additional-services configurations

mod catalog;
mod containers;
mod lines;

use crate::domain::{
    CutType, InvoiceId, LineStatus, LoadConfirmationId, Money, PriceChange, ProductNumber,
    SalesLine, TicketId,
};
use chrono::DateTime;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

/// Parse a decimal column stored as its canonical string.
pub(crate) fn money_column(row: &SqliteRow, column: &str) -> Money {
    let value: String = row.get(column);
    Money::from_str(&value).unwrap_or_default()
}

/// Parse a nullable decimal column.
pub(crate) fn opt_money_column(row: &SqliteRow, column: &str) -> Option<Money> {
    let value: Option<String> = row.get(column);
    value.and_then(|s| Money::from_str(&s).ok())
}

pub(crate) fn bool_column(row: &SqliteRow, column: &str) -> bool {
    let value: i64 = row.get(column);
    value != 0
}

/// Map a sales_lines row back into the domain type.
pub(crate) fn map_sales_line(row: &SqliteRow) -> SalesLine {
    let invoice_id: Option<String> = row.get("invoice_id");
    let load_confirmation_id: Option<String> = row.get("load_confirmation_id");
    let cut_type: String = row.get("cut_type");
    let status: String = row.get("status");

    let price_changed_at: Option<i64> = row.get("price_changed_at");
    let price_changed_by: Option<String> = row.get("price_changed_by");
    let price_change = match (price_changed_at, price_changed_by) {
        (Some(ms), Some(changed_by)) => Some(PriceChange {
            changed_at: DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH),
            changed_by,
        }),
        _ => None,
    };

    SalesLine {
        id: row.get("id"),
        line_key: row.get("line_key"),
        ticket_id: TicketId::new(row.get::<String, _>("ticket_id")),
        product_number: ProductNumber::new(row.get::<String, _>("product_number")),
        product_name: row.get("product_name"),
        unit_of_measure: row.get("unit_of_measure"),
        cut_type: CutType::from_storage(&cut_type),
        quantity: money_column(row, "quantity"),
        quantity_percent: money_column(row, "quantity_percent"),
        rate: money_column(row, "rate"),
        total_value: money_column(row, "total_value"),
        status: LineStatus::from_storage(&status),
        is_additional_service: bool_column(row, "is_additional_service"),
        is_cut_line: bool_column(row, "is_cut_line"),
        is_reversal: bool_column(row, "is_reversal"),
        is_reversed: bool_column(row, "is_reversed"),
        is_rate_overridden: bool_column(row, "is_rate_overridden"),
        is_read_only: bool_column(row, "is_read_only"),
        can_price_be_refreshed: bool_column(row, "can_price_be_refreshed"),
        invoice_id: invoice_id.map(InvoiceId::new),
        load_confirmation_id: load_confirmation_id.map(LoadConfirmationId::new),
        price_change,
    }
}
