//! Billing flows: generate lines for a ticket, save a line, void a line.
//!
//! All decisions are delegated to the pure engine modules; this layer
//! loads catalog data, calls the price source, persists results and
//! applies the planned container adjustments.

use crate::db::Repository;
use crate::domain::{LineStatus, Money, SalesLine, TicketSnapshot};
use crate::engine::{
    build_lines, candidate_products, plan_adjustments, select_configuration,
    should_refresh_pricing, ContainerAdjustment, ContainerRef, LineBuildError, LineContext,
    LineFinancials,
};
use crate::pricing::{PriceSource, PricingError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Clone)]
pub struct BillingEngine {
    repo: Arc<Repository>,
    pricing: Arc<dyn PriceSource>,
}

impl BillingEngine {
    pub fn new(repo: Arc<Repository>, pricing: Arc<dyn PriceSource>) -> Self {
        Self { repo, pricing }
    }

    /// Generate and persist the full line batch for a ticket.
    ///
    /// Regeneration is idempotent: lines are keyed per (ticket, cut,
    /// product), so rerunning for the same ticket inserts nothing new and
    /// returns the persisted batch.
    pub async fn generate_sales_lines(
        &self,
        ticket: &TicketSnapshot,
    ) -> Result<Vec<SalesLine>, BillingError> {
        let service_type = self
            .repo
            .get_service_type(&ticket.service_type_id)
            .await?
            .ok_or_else(|| BillingError::UnknownServiceType(ticket.service_type_id.clone()))?;

        let configs = self.repo.list_configs_for_facility(&ticket.facility_id).await?;
        let config = select_configuration(
            &configs,
            &ticket.well_classification,
            &ticket.source_location_id,
            &ticket.facility_service_substance_id,
        );

        let products = candidate_products(&service_type, config);
        let prices = self.pricing.fetch_prices(&products, &ticket.pricing).await?;

        let lines = build_lines(LineContext {
            ticket,
            service_type: &service_type,
            config,
            prices: &prices,
        })?;

        let inserted = self.repo.insert_lines_batch(&lines).await?;
        info!(
            "Generated {} sales lines for ticket {} ({} new)",
            lines.len(),
            ticket.ticket_id.as_str(),
            inserted
        );

        // Return the persisted state so a rerun yields the existing rows.
        let mut persisted = Vec::with_capacity(lines.len());
        for line in &lines {
            if let Some(stored) = self.repo.get_line_by_key(&line.line_key).await? {
                persisted.push(stored);
            }
        }
        Ok(persisted)
    }

    /// Save an edited line, refreshing its price when the policy allows
    /// and reconciling container totals against the prior state.
    pub async fn save_sales_line(
        &self,
        ticket: &TicketSnapshot,
        updated: SalesLine,
    ) -> Result<SalesLine, BillingError> {
        let old = self
            .repo
            .get_line(&updated.id)
            .await?
            .ok_or_else(|| BillingError::LineNotFound(updated.id.clone()))?;

        let mut line = updated;
        // The override audit trail is server-owned; carry it forward
        // unless this save records a new change.
        if line.price_change.is_none() {
            line.price_change = old.price_change.clone();
        }

        let load_confirmation = match &line.load_confirmation_id {
            Some(id) => self.repo.get_load_confirmation(id).await?,
            None => None,
        };
        let service_type = self.repo.get_service_type(&ticket.service_type_id).await?;

        if should_refresh_pricing(&line, load_confirmation.as_ref(), service_type.as_ref()) {
            let prices = self
                .pricing
                .fetch_prices(std::slice::from_ref(&line.product_number), &ticket.pricing)
                .await?;
            match prices.get(&line.product_number) {
                Some(priced) => {
                    line.reprice(priced.rate);
                    if line.status == LineStatus::Exception {
                        line.status = LineStatus::Preview;
                    }
                }
                None => {
                    line.rate = Money::zero();
                    line.total_value = Money::zero();
                    line.status = LineStatus::Exception;
                }
            }
        } else if !line.is_rate_overridden {
            // Frozen price: keep the stored rate, recompute the total for
            // whatever quantity this save carries.
            line.rate = old.rate;
            line.total_value = Money::extend(line.quantity, old.rate);
        }

        self.repo.update_line(&line).await?;

        let adjustments =
            plan_adjustments(Some(&LineFinancials::of(&old)), &LineFinancials::of(&line));
        self.apply_adjustments(adjustments).await?;

        Ok(line)
    }

    /// Void a line: terminal status, detached from its containers, with
    /// its value debited out of their running totals.
    pub async fn void_sales_line(&self, line_id: &str) -> Result<SalesLine, BillingError> {
        let old = self
            .repo
            .get_line(line_id)
            .await?
            .ok_or_else(|| BillingError::LineNotFound(line_id.to_string()))?;

        if old.status == LineStatus::Void {
            return Ok(old);
        }

        let mut line = old.clone();
        line.status = LineStatus::Void;
        line.invoice_id = None;
        line.load_confirmation_id = None;

        self.repo.update_line(&line).await?;

        let adjustments =
            plan_adjustments(Some(&LineFinancials::of(&old)), &LineFinancials::of(&line));
        self.apply_adjustments(adjustments).await?;

        Ok(line)
    }

    /// Apply planned totals adjustments, skipping containers that no
    /// longer exist.
    async fn apply_adjustments(
        &self,
        adjustments: Vec<ContainerAdjustment>,
    ) -> Result<(), BillingError> {
        for adjustment in adjustments {
            match adjustment.target {
                ContainerRef::Invoice(id) => match self.repo.get_invoice(&id).await? {
                    Some(mut invoice) => {
                        invoice.apply(adjustment.delta);
                        self.repo.save_invoice_totals(&invoice).await?;
                    }
                    None => {
                        warn!(
                            "Invoice {} missing, skipping totals adjustment",
                            id.as_str()
                        );
                    }
                },
                ContainerRef::LoadConfirmation(id) => {
                    match self.repo.get_load_confirmation(&id).await? {
                        Some(mut lc) => {
                            lc.apply(adjustment.delta);
                            self.repo.save_load_confirmation_totals(&lc).await?;
                        }
                        None => {
                            warn!(
                                "Load confirmation {} missing, skipping totals adjustment",
                                id.as_str()
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),
    #[error("Sales line not found: {0}")]
    LineNotFound(String),
    #[error(transparent)]
    Build(#[from] LineBuildError),
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
