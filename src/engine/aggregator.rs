//! Container reconciliation: keeps invoice and load-confirmation running
//! totals consistent as a sales line changes value or moves between
//! billing periods.
//!
//! Expressed as a pure planner: old/new line financials in, a list of
//! container adjustments out. Applying the adjustments (and tolerating a
//! missing container) is the orchestration layer's job.

use crate::domain::{InvoiceId, LoadConfirmationId, Money, SalesLine, TotalsDelta};

/// The container-relevant slice of a sales line's state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineFinancials {
    pub invoice_id: Option<InvoiceId>,
    pub load_confirmation_id: Option<LoadConfirmationId>,
    pub total_value: Money,
    /// False for reversal/reversed lines, which never touch totals.
    pub counts_toward_totals: bool,
}

impl LineFinancials {
    pub fn of(line: &SalesLine) -> Self {
        LineFinancials {
            invoice_id: line.invoice_id.clone(),
            load_confirmation_id: line.load_confirmation_id.clone(),
            total_value: line.total_value,
            counts_toward_totals: line.counts_toward_totals(),
        }
    }
}

/// Which container an adjustment targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    Invoice(InvoiceId),
    LoadConfirmation(LoadConfirmationId),
}

/// One planned change to a container's running totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerAdjustment {
    pub target: ContainerRef,
    pub delta: TotalsDelta,
}

/// Plan the adjustments needed to reconcile a line save.
///
/// `old` is the previously persisted state (None for a brand-new line).
/// Reversal/reversed lines and saves that change none of invoice,
/// load confirmation or total value yield no adjustments.
pub fn plan_adjustments(
    old: Option<&LineFinancials>,
    new: &LineFinancials,
) -> Vec<ContainerAdjustment> {
    if !new.counts_toward_totals {
        return Vec::new();
    }

    let old_invoice = old.and_then(|o| o.invoice_id.clone());
    let old_lc = old.and_then(|o| o.load_confirmation_id.clone());
    let old_value = old.map(|o| o.total_value).unwrap_or_else(Money::zero);

    if old_invoice == new.invoice_id
        && old_lc == new.load_confirmation_id
        && old_value == new.total_value
    {
        return Vec::new();
    }

    let mut adjustments = Vec::new();

    plan_side(
        &mut adjustments,
        old_invoice,
        new.invoice_id.clone(),
        old_value,
        new.total_value,
        ContainerRef::Invoice,
    );
    plan_side(
        &mut adjustments,
        old_lc,
        new.load_confirmation_id.clone(),
        old_value,
        new.total_value,
        ContainerRef::LoadConfirmation,
    );

    adjustments
}

/// Reconcile one container dimension (invoice or load confirmation).
fn plan_side<I: PartialEq>(
    adjustments: &mut Vec<ContainerAdjustment>,
    old_id: Option<I>,
    new_id: Option<I>,
    old_value: Money,
    new_value: Money,
    make_ref: impl Fn(I) -> ContainerRef,
) {
    match (old_id, new_id) {
        (Some(old_id), Some(new_id)) if old_id == new_id => {
            // Same container; adjust by the value delta only.
            if old_value != new_value {
                adjustments.push(ContainerAdjustment {
                    target: make_ref(new_id),
                    delta: TotalsDelta::amount_only(new_value - old_value),
                });
            }
        }
        (Some(old_id), Some(new_id)) => {
            adjustments.push(ContainerAdjustment {
                target: make_ref(old_id),
                delta: TotalsDelta::debit(old_value),
            });
            adjustments.push(ContainerAdjustment {
                target: make_ref(new_id),
                delta: TotalsDelta::credit(new_value),
            });
        }
        (Some(old_id), None) => {
            adjustments.push(ContainerAdjustment {
                target: make_ref(old_id),
                delta: TotalsDelta::debit(old_value),
            });
        }
        (None, Some(new_id)) => {
            adjustments.push(ContainerAdjustment {
                target: make_ref(new_id),
                delta: TotalsDelta::credit(new_value),
            });
        }
        (None, None) => {}
    }
}
