use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{SalesLine, TicketId, TicketSnapshot};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub ticket: TicketSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub ticket: TicketSnapshot,
    pub line: SalesLine,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesQuery {
    pub ticket_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesResponse {
    pub lines: Vec<LineDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub id: String,
    pub line_key: String,
    pub ticket_id: String,
    pub product_number: String,
    pub product_name: String,
    pub unit_of_measure: String,
    pub cut_type: String,
    pub quantity: String,
    pub quantity_percent: String,
    pub rate: String,
    pub total_value: String,
    pub status: String,
    pub is_additional_service: bool,
    pub is_cut_line: bool,
    pub is_rate_overridden: bool,
    pub is_read_only: bool,
    pub can_price_be_refreshed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_confirmation_id: Option<String>,
}

impl LineDto {
    pub fn of(line: &SalesLine) -> Self {
        LineDto {
            id: line.id.clone(),
            line_key: line.line_key.clone(),
            ticket_id: line.ticket_id.as_str().to_string(),
            product_number: line.product_number.as_str().to_string(),
            product_name: line.product_name.clone(),
            unit_of_measure: line.unit_of_measure.clone(),
            cut_type: line.cut_type.as_str().to_string(),
            quantity: line.quantity.to_canonical_string(),
            quantity_percent: line.quantity_percent.to_canonical_string(),
            rate: line.rate.to_canonical_string(),
            total_value: line.total_value.to_canonical_string(),
            status: line.status.as_str().to_string(),
            is_additional_service: line.is_additional_service,
            is_cut_line: line.is_cut_line,
            is_rate_overridden: line.is_rate_overridden,
            is_read_only: line.is_read_only,
            can_price_be_refreshed: line.can_price_be_refreshed,
            invoice_id: line.invoice_id.as_ref().map(|id| id.as_str().to_string()),
            load_confirmation_id: line
                .load_confirmation_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
        }
    }
}

/// POST /v1/lines/generate: price a ticket and persist its line batch.
pub async fn generate_lines(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<LinesResponse>, AppError> {
    let lines = state.billing.generate_sales_lines(&request.ticket).await?;
    Ok(Json(LinesResponse {
        lines: lines.iter().map(LineDto::of).collect(),
    }))
}

/// GET /v1/lines?ticketId=...: list a ticket's persisted lines.
pub async fn get_lines(
    Query(params): Query<LinesQuery>,
    State(state): State<AppState>,
) -> Result<Json<LinesResponse>, AppError> {
    if params.ticket_id.trim().is_empty() {
        return Err(AppError::BadRequest("ticketId must not be empty".into()));
    }
    let ticket_id = TicketId::new(params.ticket_id);
    let lines = state.repo.query_lines_by_ticket(&ticket_id).await?;
    Ok(Json(LinesResponse {
        lines: lines.iter().map(LineDto::of).collect(),
    }))
}

/// PUT /v1/lines: save an edited line through the refresh policy.
pub async fn update_line(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<LineDto>, AppError> {
    let saved = state
        .billing
        .save_sales_line(&request.ticket, request.line)
        .await?;
    Ok(Json(LineDto::of(&saved)))
}

/// POST /v1/lines/:id/void: void a line and debit its containers.
pub async fn void_line(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LineDto>, AppError> {
    let voided = state.billing.void_sales_line(&id).await?;
    Ok(Json(LineDto::of(&voided)))
}
