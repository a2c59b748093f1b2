//! Turning a reviewed analysis into an appended ledger row

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::leads::analysis::LeadAnalysis;
use crate::storage::{Database, LeadRecord};
use crate::{BlueSdrError, Result};

/// Anything that can take a new lead row. Implementations must only ever
/// add rows; existing rows are never touched.
pub trait LeadStore {
    /// Append one row and return the id the store assigned
    fn append_lead(&self, record: &LeadRecord) -> anyhow::Result<i64>;
}

impl LeadStore for Database {
    fn append_lead(&self, record: &LeadRecord) -> anyhow::Result<i64> {
        self.insert_lead(record)
    }
}

/// Format `now` for the Date column.
pub fn format_timestamp<Tz>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(format).to_string()
}

/// Map an analysis onto the fixed column order of the lead ledger.
pub fn build_record(analysis: &LeadAnalysis, timestamp: String) -> LeadRecord {
    LeadRecord {
        id: 0,
        timestamp,
        name: analysis.name.clone(),
        origin: analysis.origin.clone(),
        status: analysis.temperature.clone(),
        pain_point: analysis.pain_point.clone(),
        estimated_value: analysis.estimated_value.clone(),
        notes: format!(
            "Origin: {}. Pain: {}. Suggested reply: {}",
            analysis.origin, analysis.pain_point, analysis.suggested_reply
        ),
    }
}

/// Append one record built from `analysis`. No duplicate check is made:
/// appending the same analysis twice yields two rows.
pub fn append_analysis<S>(store: &S, analysis: &LeadAnalysis, timestamp: String) -> Result<LeadRecord>
where
    S: LeadStore + ?Sized,
{
    let mut record = build_record(analysis, timestamp);
    record.id = store
        .append_lead(&record)
        .map_err(|e| BlueSdrError::Append(format!("{e:#}")))?;

    tracing::info!(id = record.id, name = %record.name, "Lead appended");
    Ok(record)
}
