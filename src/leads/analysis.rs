//! The transient result of one analysis call

use serde::Serialize;

use crate::leads::schema::{Temperature, FIELD_COUNT};

/// Six fields extracted from a conversation, held only until the operator
/// saves or discards them. Values are kept exactly as the model returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadAnalysis {
    pub name: String,
    pub origin: String,
    pub temperature: String,
    pub pain_point: String,
    pub estimated_value: String,
    pub suggested_reply: String,
}

impl LeadAnalysis {
    pub(crate) fn from_fields(fields: [String; FIELD_COUNT]) -> Self {
        let [name, origin, temperature, pain_point, estimated_value, suggested_reply] = fields;
        Self {
            name,
            origin,
            temperature,
            pain_point,
            estimated_value,
            suggested_reply,
        }
    }

    /// Fields in schema order
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            &self.name,
            &self.origin,
            &self.temperature,
            &self.pain_point,
            &self.estimated_value,
            &self.suggested_reply,
        ]
    }

    /// Temperature if the model used a recognised label
    pub fn temperature(&self) -> Option<Temperature> {
        Temperature::parse(&self.temperature)
    }

    /// True when every field is the failure placeholder.
    pub fn is_sentinel(&self) -> bool {
        self.fields().iter().all(|f| *f == super::parser::SENTINEL_FIELD)
    }
}
