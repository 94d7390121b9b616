//! Domain primitives: identifiers, cut types, line statuses.

use serde::{Deserialize, Serialize};

/// Truck ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        TicketId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog product number (e.g. "40110", "70015").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductNumber(pub String);

impl ProductNumber {
    pub fn new(number: impl Into<String>) -> Self {
        ProductNumber(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Products numbered 7xxxx are measured at source and stay exempt
    /// from the field-ticket price freeze.
    pub fn is_source_measured(&self) -> bool {
        self.0.starts_with('7')
    }
}

impl std::fmt::Display for ProductNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invoice identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

impl InvoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        InvoiceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Load confirmation identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadConfirmationId(pub String);

impl LoadConfirmationId {
    pub fn new(id: impl Into<String>) -> Self {
        LoadConfirmationId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LoadConfirmationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Waste-stream component a sales line bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    Oil,
    Water,
    Solid,
    /// Sum of the active cuts (or the raw load for service-only tickets).
    Total,
    /// Additional-service and other non-cut lines.
    None,
}

impl CutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CutType::Oil => "oil",
            CutType::Water => "water",
            CutType::Solid => "solid",
            CutType::Total => "total",
            CutType::None => "none",
        }
    }

    /// Parse from the storage representation; unknown values map to None.
    pub fn from_storage(s: &str) -> Self {
        match s {
            "oil" => CutType::Oil,
            "water" => CutType::Water,
            "solid" => CutType::Solid,
            "total" => CutType::Total,
            _ => CutType::None,
        }
    }
}

impl std::fmt::Display for CutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing lifecycle status of a sales line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStatus {
    /// Freshly generated, awaiting operator review.
    Preview,
    /// Pricing could not be resolved; needs manual attention.
    Exception,
    Approved,
    SentToFo,
    Posted,
    Void,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Preview => "preview",
            LineStatus::Exception => "exception",
            LineStatus::Approved => "approved",
            LineStatus::SentToFo => "sentToFo",
            LineStatus::Posted => "posted",
            LineStatus::Void => "void",
        }
    }

    /// Parse from the storage representation; unknown values map to Preview.
    pub fn from_storage(s: &str) -> Self {
        match s {
            "exception" => LineStatus::Exception,
            "approved" => LineStatus::Approved,
            "sentToFo" => LineStatus::SentToFo,
            "posted" => LineStatus::Posted,
            "void" => LineStatus::Void,
            _ => LineStatus::Preview,
        }
    }
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of receiving facility; drives how additional-service quantities
/// are pulled from the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Cavern,
    Landfill,
    Terminal,
}

/// How cut quantities were entered on the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMethod {
    /// Volumes entered directly; percents derived.
    Volume,
    /// Percents entered; volumes derived.
    Percent,
}
