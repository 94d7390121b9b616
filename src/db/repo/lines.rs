//! Sales line persistence and queries.

use super::{map_sales_line, Repository};
use crate::domain::{SalesLine, TicketId};

impl Repository {
    /// Insert a sales line idempotently, keyed on `line_key`.
    ///
    /// Returns false when a line with the same key already exists, so
    /// regeneration never duplicates rows.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_line(&self, line: &SalesLine) -> Result<bool, sqlx::Error> {
        let now = chrono::Utc::now().timestamp_millis();
        let result = sqlx::query(
            r#"
            INSERT INTO sales_lines (
                id, line_key, ticket_id, product_number, product_name,
                unit_of_measure, cut_type, quantity, quantity_percent, rate,
                total_value, status, is_additional_service, is_cut_line,
                is_reversal, is_reversed, is_rate_overridden, is_read_only,
                can_price_be_refreshed, invoice_id, load_confirmation_id,
                price_changed_at, price_changed_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(line_key) DO NOTHING
            "#,
        )
        .bind(&line.id)
        .bind(&line.line_key)
        .bind(line.ticket_id.as_str())
        .bind(line.product_number.as_str())
        .bind(&line.product_name)
        .bind(&line.unit_of_measure)
        .bind(line.cut_type.as_str())
        .bind(line.quantity.to_canonical_string())
        .bind(line.quantity_percent.to_canonical_string())
        .bind(line.rate.to_canonical_string())
        .bind(line.total_value.to_canonical_string())
        .bind(line.status.as_str())
        .bind(line.is_additional_service)
        .bind(line.is_cut_line)
        .bind(line.is_reversal)
        .bind(line.is_reversed)
        .bind(line.is_rate_overridden)
        .bind(line.is_read_only)
        .bind(line.can_price_be_refreshed)
        .bind(line.invoice_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(
            line.load_confirmation_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
        )
        .bind(
            line.price_change
                .as_ref()
                .map(|c| c.changed_at.timestamp_millis()),
        )
        .bind(line.price_change.as_ref().map(|c| c.changed_by.clone()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert a batch of lines idempotently, returning how many were new.
    ///
    /// # Errors
    /// Returns an error if any insert fails.
    pub async fn insert_lines_batch(&self, lines: &[SalesLine]) -> Result<usize, sqlx::Error> {
        let mut inserted = 0;
        for line in lines {
            if self.insert_line(line).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Persist the mutable fields of an existing line.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_line(&self, line: &SalesLine) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE sales_lines SET
                quantity = ?, quantity_percent = ?, rate = ?, total_value = ?,
                status = ?, is_reversal = ?, is_reversed = ?,
                is_rate_overridden = ?, is_read_only = ?,
                can_price_be_refreshed = ?, invoice_id = ?,
                load_confirmation_id = ?, price_changed_at = ?,
                price_changed_by = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(line.quantity.to_canonical_string())
        .bind(line.quantity_percent.to_canonical_string())
        .bind(line.rate.to_canonical_string())
        .bind(line.total_value.to_canonical_string())
        .bind(line.status.as_str())
        .bind(line.is_reversal)
        .bind(line.is_reversed)
        .bind(line.is_rate_overridden)
        .bind(line.is_read_only)
        .bind(line.can_price_be_refreshed)
        .bind(line.invoice_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(
            line.load_confirmation_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
        )
        .bind(
            line.price_change
                .as_ref()
                .map(|c| c.changed_at.timestamp_millis()),
        )
        .bind(line.price_change.as_ref().map(|c| c.changed_by.clone()))
        .bind(chrono::Utc::now().timestamp_millis())
        .bind(&line.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a sales line by its id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_line(&self, id: &str) -> Result<Option<SalesLine>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM sales_lines WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_sales_line))
    }

    /// Get a sales line by its stable line key.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_line_by_key(&self, line_key: &str) -> Result<Option<SalesLine>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM sales_lines WHERE line_key = ?")
            .bind(line_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_sales_line))
    }

    /// Query all lines for a ticket in stable order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_lines_by_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<SalesLine>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM sales_lines WHERE ticket_id = ? ORDER BY created_at ASC, line_key ASC",
        )
        .bind(ticket_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_sales_line).collect())
    }
}
