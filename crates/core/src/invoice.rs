use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

pub const EXTRACTION_FAILED_VENDOR: &str = "Extraction Failed";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub i64);

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vendor invoice fields as produced by the extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub vendor_name: String,
    pub invoice_number: String,
    pub total_amount: Money,
    pub due_date: String,
}

impl Invoice {
    pub fn new(vendor_name: &str, invoice_number: &str, total_amount: Money, due_date: &str) -> Self {
        Invoice {
            vendor_name: vendor_name.to_string(),
            invoice_number: invoice_number.to_string(),
            total_amount,
            due_date: due_date.to_string(),
        }
    }

    /// Placeholder returned when extraction fails. Safe to feed to the matcher.
    pub fn extraction_failed() -> Self {
        Invoice::new(EXTRACTION_FAILED_VENDOR, NOT_AVAILABLE, Money::zero(), NOT_AVAILABLE)
    }

    pub fn is_extraction_failure(&self) -> bool {
        self.vendor_name == EXTRACTION_FAILED_VENDOR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Reconciled,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "Pending"),
            InvoiceStatus::Reconciled => write!(f, "Reconciled"),
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(InvoiceStatus::Pending),
            "Reconciled" => Ok(InvoiceStatus::Reconciled),
            other => Err(format!("Unknown invoice status: '{other}'")),
        }
    }
}

/// A stored invoice together with its reconciliation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub invoice: Invoice,
    pub status: InvoiceStatus,
}
