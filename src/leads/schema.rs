//! Canonical lead-analysis schema and temperature vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named position in the six-field analysis contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    /// JSON key, also used as the column key in storage
    pub key: &'static str,
    /// Label shown to the model in the delimited contract
    pub label: &'static str,
}

/// Number of fields every analysis carries.
pub const FIELD_COUNT: usize = 6;

/// The one canonical ordering of the analysis contract. Field 5 is the
/// estimated deal value.
pub const LEAD_ANALYSIS_SCHEMA: [SchemaField; FIELD_COUNT] = [
    SchemaField {
        key: "name",
        label: "LEAD NAME",
    },
    SchemaField {
        key: "origin",
        label: "ORIGIN (Instagram/Google/Referral)",
    },
    SchemaField {
        key: "temperature",
        label: "TEMPERATURE (Cold/Warm/Hot/Closed)",
    },
    SchemaField {
        key: "pain_point",
        label: "MAIN PAIN POINT (summary)",
    },
    SchemaField {
        key: "estimated_value",
        label: "ESTIMATED VALUE (numeric or 0)",
    },
    SchemaField {
        key: "suggested_reply",
        label: "SUGGESTED REPLY (persuasive)",
    },
];

/// Buying readiness of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperature {
    Cold,
    Warm,
    Hot,
    Closed,
}

impl Temperature {
    pub const ALL: [Temperature; 4] = [Self::Cold, Self::Warm, Self::Hot, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Warm => "Warm",
            Self::Hot => "Hot",
            Self::Closed => "Closed",
        }
    }

    /// Lenient, case-insensitive match. Accepts the Portuguese labels
    /// earlier deployments asked the model for.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cold" | "frio" => Some(Self::Cold),
            "warm" | "morno" => Some(Self::Warm),
            "hot" | "quente" => Some(Self::Hot),
            "closed" | "won" | "sale" | "venda" | "fechado" => Some(Self::Closed),
            _ => None,
        }
    }

    /// The vocabulary as it appears in prompts: `Cold/Warm/Hot/Closed`.
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(Temperature::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
