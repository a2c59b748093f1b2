//! Data models for storage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column headers of the lead ledger, in storage order
pub const LEAD_COLUMNS: [&str; 7] = [
    "Date",
    "Name",
    "Origin",
    "Status",
    "Pain",
    "Estimated Value",
    "Notes",
];

/// Column headers of the payment ledger, in storage order
pub const PAYMENT_COLUMNS: [&str; 7] = [
    "Date", "Client", "Service", "Value", "Status", "Method", "Document",
];

/// A confirmed lead. Rows are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Row id assigned by the store (0 until appended)
    #[serde(default)]
    pub id: i64,

    /// Local date/time at append
    pub timestamp: String,

    pub name: String,

    pub origin: String,

    /// Temperature as returned by the model
    pub status: String,

    pub pain_point: String,

    /// Estimated deal value as returned by the model
    pub estimated_value: String,

    pub notes: String,
}

impl LeadRecord {
    /// Values in column order
    pub fn columns(&self) -> [&str; 7] {
        [
            &self.timestamp,
            &self.name,
            &self.origin,
            &self.status,
            &self.pain_point,
            &self.estimated_value,
            &self.notes,
        ]
    }
}

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Scheduled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::CreditCard => "credit-card",
            Self::DebitCard => "debit-card",
            Self::Cash => "cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pix" => Ok(Self::Pix),
            "credit-card" => Ok(Self::CreditCard),
            "debit-card" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flat ledger row for money received or expected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default)]
    pub id: i64,

    pub timestamp: String,

    pub client: String,

    pub service: String,

    pub value: f64,

    pub status: PaymentStatus,

    pub method: PaymentMethod,

    /// External document reference (receipt, invoice link)
    pub document_ref: Option<String>,
}

impl PaymentRecord {
    pub fn new(
        timestamp: String,
        client: String,
        service: String,
        value: f64,
        status: PaymentStatus,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: 0, // Will be set by database
            timestamp,
            client,
            service,
            value,
            status,
            method,
            document_ref: None,
        }
    }
}
