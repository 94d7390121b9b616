use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::domain::{DeliveryMode, InvoiceId, LoadConfirmationId};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub customer_id: String,
    pub sales_line_count: i64,
    pub invoice_amount: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadConfirmationDto {
    pub id: String,
    pub customer_id: String,
    pub sales_line_count: i64,
    pub total_cost: String,
    pub field_ticket_upload: bool,
    pub delivery_mode: String,
}

/// GET /v1/invoices/:id: an invoice with its running totals.
pub async fn get_invoice(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InvoiceDto>, AppError> {
    let invoice = state
        .repo
        .get_invoice(&InvoiceId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice {} not found", id)))?;

    Ok(Json(InvoiceDto {
        id: invoice.id.as_str().to_string(),
        customer_id: invoice.customer_id,
        sales_line_count: invoice.sales_line_count,
        invoice_amount: invoice.invoice_amount.to_canonical_string(),
    }))
}

/// GET /v1/load-confirmations/:id: a load confirmation with its running
/// totals and billing configuration.
pub async fn get_load_confirmation(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LoadConfirmationDto>, AppError> {
    let lc = state
        .repo
        .get_load_confirmation(&LoadConfirmationId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Load confirmation {} not found", id)))?;

    Ok(Json(LoadConfirmationDto {
        id: lc.id.as_str().to_string(),
        customer_id: lc.customer_id,
        sales_line_count: lc.sales_line_count,
        total_cost: lc.total_cost.to_canonical_string(),
        field_ticket_upload: lc.field_ticket_upload,
        delivery_mode: match lc.delivery_mode {
            DeliveryMode::LoadConfirmationBatch => "loadConfirmationBatch".to_string(),
            DeliveryMode::TicketByTicket => "ticketByTicket".to_string(),
        },
    }))
}
