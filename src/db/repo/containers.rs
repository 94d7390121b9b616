//! Invoice and load-confirmation aggregate persistence.

use super::{bool_column, money_column, Repository};
use crate::domain::{
    DeliveryMode, Invoice, InvoiceId, LoadConfirmation, LoadConfirmationId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn map_invoice(row: &SqliteRow) -> Invoice {
    Invoice {
        id: InvoiceId::new(row.get::<String, _>("id")),
        customer_id: row.get("customer_id"),
        sales_line_count: row.get("sales_line_count"),
        invoice_amount: money_column(row, "invoice_amount"),
    }
}

fn map_load_confirmation(row: &SqliteRow) -> LoadConfirmation {
    let delivery_mode: String = row.get("delivery_mode");
    LoadConfirmation {
        id: LoadConfirmationId::new(row.get::<String, _>("id")),
        customer_id: row.get("customer_id"),
        sales_line_count: row.get("sales_line_count"),
        total_cost: money_column(row, "total_cost"),
        field_ticket_upload: bool_column(row, "field_ticket_upload"),
        delivery_mode: match delivery_mode.as_str() {
            "loadConfirmationBatch" => DeliveryMode::LoadConfirmationBatch,
            _ => DeliveryMode::TicketByTicket,
        },
    }
}

impl Repository {
    /// Insert an invoice.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, sales_line_count, invoice_amount)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(invoice.id.as_str())
        .bind(&invoice.customer_id)
        .bind(invoice.sales_line_count)
        .bind(invoice.invoice_amount.to_canonical_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an invoice by id, None when it no longer exists.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM invoices WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_invoice))
    }

    /// Persist an invoice's running totals.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn save_invoice_totals(&self, invoice: &Invoice) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE invoices SET sales_line_count = ?, invoice_amount = ? WHERE id = ?")
            .bind(invoice.sales_line_count)
            .bind(invoice.invoice_amount.to_canonical_string())
            .bind(invoice.id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a load confirmation.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_load_confirmation(
        &self,
        lc: &LoadConfirmation,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO load_confirmations (
                id, customer_id, sales_line_count, total_cost,
                field_ticket_upload, delivery_mode
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(lc.id.as_str())
        .bind(&lc.customer_id)
        .bind(lc.sales_line_count)
        .bind(lc.total_cost.to_canonical_string())
        .bind(lc.field_ticket_upload)
        .bind(match lc.delivery_mode {
            DeliveryMode::LoadConfirmationBatch => "loadConfirmationBatch",
            DeliveryMode::TicketByTicket => "ticketByTicket",
        })
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a load confirmation by id, None when it no longer exists.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_load_confirmation(
        &self,
        id: &LoadConfirmationId,
    ) -> Result<Option<LoadConfirmation>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM load_confirmations WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_load_confirmation))
    }

    /// Persist a load confirmation's running totals.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn save_load_confirmation_totals(
        &self,
        lc: &LoadConfirmation,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE load_confirmations SET sales_line_count = ?, total_cost = ? WHERE id = ?",
        )
        .bind(lc.sales_line_count)
        .bind(lc.total_cost.to_canonical_string())
        .bind(lc.id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
