//! Aggregate containers: invoices and load confirmations.
//!
//! Both carry a running sales-line count and monetary total that must at
//! all times equal the sum over their currently assigned, non-reversed
//! lines. The aggregator adjusts them through `apply`.

use crate::domain::{InvoiceId, LoadConfirmationId, Money};
use serde::{Deserialize, Serialize};

/// A signed adjustment to a container's running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsDelta {
    pub count: i64,
    pub amount: Money,
}

impl TotalsDelta {
    pub fn credit(amount: Money) -> Self {
        TotalsDelta { count: 1, amount }
    }

    pub fn debit(amount: Money) -> Self {
        TotalsDelta {
            count: -1,
            amount: -amount,
        }
    }

    /// Value-only change within the same container.
    pub fn amount_only(delta: Money) -> Self {
        TotalsDelta {
            count: 0,
            amount: delta,
        }
    }
}

/// Invoice aggregate: a billing-period container of sales lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: String,
    pub sales_line_count: i64,
    pub invoice_amount: Money,
}

impl Invoice {
    pub fn apply(&mut self, delta: TotalsDelta) {
        self.sales_line_count += delta.count;
        self.invoice_amount = self.invoice_amount + delta.amount;
    }
}

/// Field-ticket delivery mode on a load confirmation's billing
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryMode {
    /// Proof-of-service documents batched per load confirmation.
    LoadConfirmationBatch,
    /// Documents delivered ticket by ticket.
    TicketByTicket,
}

/// Load confirmation aggregate: a billing-cycle container of sales lines
/// sent to the customer for confirmation before invoicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfirmation {
    pub id: LoadConfirmationId,
    pub customer_id: String,
    pub sales_line_count: i64,
    pub total_cost: Money,
    /// Billing configuration: field-ticket upload enabled.
    pub field_ticket_upload: bool,
    pub delivery_mode: DeliveryMode,
}

impl LoadConfirmation {
    pub fn apply(&mut self, delta: TotalsDelta) {
        self.sales_line_count += delta.count;
        self.total_cost = self.total_cost + delta.amount;
    }

    /// True when lines on this confirmation fall under the field-ticket
    /// price freeze (upload enabled with batch delivery).
    pub fn freezes_field_ticket_pricing(&self) -> bool {
        self.field_ticket_upload && self.delivery_mode == DeliveryMode::LoadConfirmationBatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn m(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn invoice() -> Invoice {
        Invoice {
            id: InvoiceId::new("INV-1"),
            customer_id: "CUST-1".to_string(),
            sales_line_count: 2,
            invoice_amount: m("100"),
        }
    }

    #[test]
    fn test_invoice_credit_and_debit() {
        let mut inv = invoice();
        inv.apply(TotalsDelta::credit(m("50")));
        assert_eq!(inv.sales_line_count, 3);
        assert_eq!(inv.invoice_amount, m("150"));

        inv.apply(TotalsDelta::debit(m("100")));
        assert_eq!(inv.sales_line_count, 2);
        assert_eq!(inv.invoice_amount, m("50"));
    }

    #[test]
    fn test_amount_only_adjustment_keeps_count() {
        let mut inv = invoice();
        inv.apply(TotalsDelta::amount_only(m("-25.50")));
        assert_eq!(inv.sales_line_count, 2);
        assert_eq!(inv.invoice_amount, m("74.50"));
    }

    #[test]
    fn test_field_ticket_freeze_requires_upload_and_batch() {
        let mut lc = LoadConfirmation {
            id: LoadConfirmationId::new("LC-1"),
            customer_id: "CUST-1".to_string(),
            sales_line_count: 0,
            total_cost: Money::zero(),
            field_ticket_upload: true,
            delivery_mode: DeliveryMode::LoadConfirmationBatch,
        };
        assert!(lc.freezes_field_ticket_pricing());

        lc.delivery_mode = DeliveryMode::TicketByTicket;
        assert!(!lc.freezes_field_ticket_pricing());

        lc.delivery_mode = DeliveryMode::LoadConfirmationBatch;
        lc.field_ticket_upload = false;
        assert!(!lc.freezes_field_ticket_pricing());
    }
}
