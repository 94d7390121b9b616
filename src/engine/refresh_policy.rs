//! Status-keyed policy deciding whether a stored price may be
//! recomputed before a save.
//!
//! Precedence inside the active statuses: manual override > field-ticket
//! freeze (with the source-measured product exemption) > per-cut
//! threshold gate > default refresh. The full decision table is
//! exercised in `tests/refresh_policy_test.rs`.

use crate::domain::{LineStatus, LoadConfirmation, SalesLine, ServiceType};
use crate::engine::cut_rules;

/// Policy selected for a line's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Posted or Void: the price is frozen for good.
    Terminal,
    /// Exception: retry pricing on every touch.
    AlwaysRefresh,
    /// Preview, Approved, SentToFo: refresh unless a freeze condition
    /// holds.
    Active,
}

/// Select the policy for a status.
pub fn policy_for(status: LineStatus) -> RefreshPolicy {
    match status {
        LineStatus::Posted | LineStatus::Void => RefreshPolicy::Terminal,
        LineStatus::Exception => RefreshPolicy::AlwaysRefresh,
        LineStatus::Preview | LineStatus::Approved | LineStatus::SentToFo => RefreshPolicy::Active,
    }
}

/// Decide whether a line's stored price must be recomputed.
///
/// `load_confirmation` is the container the line is assigned to (if any);
/// `service_type` supplies the per-cut minimum gates and may be absent
/// for non-cut lines. Absent context fails open: the price refreshes
/// rather than going silently stale.
pub fn should_refresh_pricing(
    line: &SalesLine,
    load_confirmation: Option<&LoadConfirmation>,
    service_type: Option<&ServiceType>,
) -> bool {
    match policy_for(line.status) {
        RefreshPolicy::Terminal => false,
        RefreshPolicy::AlwaysRefresh => true,
        RefreshPolicy::Active => !active_freeze_holds(line, load_confirmation, service_type),
    }
}

/// The active-status freeze: a manually overridden price is never
/// touched; otherwise the price is frozen only while the line sits on a
/// field-ticket batch load confirmation, bills a product that is not
/// measured at source, and its cut rests below the pricing minimum with
/// a zero rate.
fn active_freeze_holds(
    line: &SalesLine,
    load_confirmation: Option<&LoadConfirmation>,
    service_type: Option<&ServiceType>,
) -> bool {
    if line.price_change.is_some() {
        return true;
    }

    let field_ticket_batch = load_confirmation
        .map(|lc| lc.freezes_field_ticket_pricing())
        .unwrap_or(false);
    if !field_ticket_batch {
        return false;
    }
    if line.product_number.is_source_measured() {
        return false;
    }

    let Some(service_type) = service_type else {
        return false;
    };
    cut_rules::rule_for(service_type, line.cut_type).below_pricing_minimum(
        line.quantity,
        line.quantity_percent,
        line.rate,
    )
}
