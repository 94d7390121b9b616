//! SalesLine type representing a single billable row.

use crate::domain::{
    CutType, InvoiceId, LineStatus, LoadConfirmationId, Money, ProductNumber, TicketId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record for a manual price change on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

/// One billable row derived from a ticket's cuts or additional services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLine {
    /// Unique identifier (uuid).
    pub id: String,
    /// Stable key for idempotent regeneration: one line per
    /// (ticket, cut, product).
    pub line_key: String,
    /// Owning truck ticket.
    pub ticket_id: TicketId,
    pub product_number: ProductNumber,
    pub product_name: String,
    pub unit_of_measure: String,
    pub cut_type: CutType,
    /// Signed quantity; negated for reversal-convention cuts (credits).
    pub quantity: Money,
    /// Share of the load this cut represents, 0-100 nominal.
    pub quantity_percent: Money,
    /// Currency per unit.
    pub rate: Money,
    /// `round2(round2(quantity) * round2(rate))` whenever the engine
    /// set the rate; manual overrides may break this and must set
    /// `is_rate_overridden`.
    pub total_value: Money,
    pub status: LineStatus,
    pub is_additional_service: bool,
    pub is_cut_line: bool,
    pub is_reversal: bool,
    pub is_reversed: bool,
    pub is_rate_overridden: bool,
    pub is_read_only: bool,
    pub can_price_be_refreshed: bool,
    pub invoice_id: Option<InvoiceId>,
    pub load_confirmation_id: Option<LoadConfirmationId>,
    /// Set when an operator manually changed the price.
    pub price_change: Option<PriceChange>,
}

impl SalesLine {
    /// Generate a stable unique key for a line.
    ///
    /// One line exists per (ticket, cut, product); the key hashes those
    /// three so regeneration is idempotent.
    pub fn compute_line_key(
        ticket_id: &TicketId,
        cut_type: CutType,
        product_number: &ProductNumber,
    ) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(ticket_id.as_str());
        hasher.update([0u8]);
        hasher.update(cut_type.as_str());
        hasher.update([0u8]);
        hasher.update(product_number.as_str());
        let hash = hasher.finalize();
        format!("line:{}", hex::encode(&hash[..16]))
    }

    /// Borrow the precomputed line key.
    pub fn line_key(&self) -> &str {
        &self.line_key
    }

    /// True when this line participates in container totals.
    ///
    /// Reversal pairs cancel each other and are excluded from running
    /// totals and counts.
    pub fn counts_toward_totals(&self) -> bool {
        !self.is_reversal && !self.is_reversed
    }

    /// Recompute the total from quantity and rate using field-office
    /// rounding, and clear any override flag.
    pub fn reprice(&mut self, rate: Money) {
        self.rate = rate;
        self.total_value = Money::extend(self.quantity, rate);
        self.is_rate_overridden = false;
    }

    /// Apply a manual rate override with its audit trail.
    pub fn override_rate(&mut self, rate: Money, total: Money, changed_by: &str) {
        self.rate = rate;
        self.total_value = total;
        self.is_rate_overridden = true;
        self.price_change = Some(PriceChange {
            changed_at: Utc::now(),
            changed_by: changed_by.to_string(),
        });
    }
}
