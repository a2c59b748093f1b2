//! Response parsing for the six-field analysis contract

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::leads::analysis::LeadAnalysis;
use crate::leads::schema::{FIELD_COUNT, LEAD_ANALYSIS_SCHEMA};
use crate::{BlueSdrError, Result};

/// Field delimiter of the legacy contract
pub const DELIMITER: char = '|';

/// Value every field carries when the generation call failed
pub const SENTINEL_FIELD: &str = "Error";

/// Raw response substituted for a failed generation call
pub const GENERATION_SENTINEL: &str = "Error|Error|Error|Error|Error|Error";

/// Split a raw response on `|` and keep the first six fields.
///
/// Fields are not trimmed or validated. Extra trailing fields are ignored;
/// fewer than six is an error and nothing partial is returned.
pub fn parse_response(raw: &str) -> Result<LeadAnalysis> {
    let parts: Vec<&str> = raw.split(DELIMITER).collect();
    if parts.len() < FIELD_COUNT {
        return Err(BlueSdrError::InsufficientContext {
            expected: FIELD_COUNT,
            found: parts.len(),
        });
    }

    let fields: [String; FIELD_COUNT] = std::array::from_fn(|i| parts[i].to_string());
    Ok(LeadAnalysis::from_fields(fields))
}

/// Parse a JSON object response. Text that is not an object is read with
/// the delimited contract; an object that does not decode is rejected.
pub fn parse_structured(raw: &str) -> Result<LeadAnalysis> {
    let body = strip_code_fence(raw.trim());
    if !body.starts_with('{') {
        tracing::debug!("Response is not a JSON lead object, falling back to delimited parsing");
        return parse_response(raw);
    }

    decode_json(body)
}

#[derive(Debug, Deserialize)]
struct StructuredLead {
    name: String,
    origin: String,
    temperature: String,
    pain_point: String,
    estimated_value: Value,
    suggested_reply: String,
}

fn decode_json(body: &str) -> Result<LeadAnalysis> {
    let incomplete = || BlueSdrError::InsufficientContext {
        expected: FIELD_COUNT,
        found: usable_keys(body),
    };

    let lead: StructuredLead = serde_json::from_str(body).map_err(|e| {
        tracing::debug!("JSON lead object did not decode: {}", e);
        incomplete()
    })?;

    let estimated_value = match lead.estimated_value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => "0".to_string(),
        _ => return Err(incomplete()),
    };

    Ok(LeadAnalysis::from_fields([
        lead.name,
        lead.origin,
        lead.temperature,
        lead.pain_point,
        estimated_value,
        lead.suggested_reply,
    ]))
}

/// Schema keys present in `body` with a value of the expected shape.
fn usable_keys(body: &str) -> usize {
    let Ok(object) = serde_json::from_str::<Map<String, Value>>(body) else {
        return 0;
    };

    LEAD_ANALYSIS_SCHEMA
        .iter()
        .filter(|field| match object.get(field.key) {
            Some(Value::String(_)) => true,
            Some(Value::Number(_) | Value::Null) => field.key == "estimated_value",
            _ => false,
        })
        .count()
}

/// Models sometimes wrap JSON in a Markdown fence even when told not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
