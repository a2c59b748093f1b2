use serde::{Deserialize, Serialize};

use crate::leads::schema::{Temperature, LEAD_ANALYSIS_SCHEMA};

/// Output contract requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// A JSON object keyed by the schema, parsed with a delimiter fallback
    #[default]
    Json,
    /// Legacy `field1|field2|...|field6` line
    Delimited,
}

const PERSONA: &str = "Act as 'BlueSDR AI', a consultative sales specialist for high-ticket deals.\n\
Analyze the conversation below.";

/// Build the analysis prompt. The transcript is embedded verbatim; a `|`
/// inside it is not escaped.
pub fn build_analysis_prompt(transcript: &str, format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Delimited => build_delimited_prompt(transcript),
        ResponseFormat::Json => build_json_prompt(transcript),
    }
}

fn build_delimited_prompt(transcript: &str) -> String {
    let contract = LEAD_ANALYSIS_SCHEMA
        .iter()
        .map(|field| field.label)
        .collect::<Vec<_>>()
        .join("|");
    let temperatures = Temperature::vocabulary();

    format!(
        "{PERSONA}\n\
\n\
STRICT OUTPUT (a single line, fields separated by |):\n\
{contract}\n\
\n\
Rules:\n\
- TEMPERATURE must be one of: {temperatures}.\n\
- Do not use the | character inside a field.\n\
- Return nothing except that line.\n\
\n\
Conversation:\n\
{transcript}"
    )
}

fn build_json_prompt(transcript: &str) -> String {
    let keys = LEAD_ANALYSIS_SCHEMA
        .iter()
        .map(|field| format!("- \"{}\": {}", field.key, field.label))
        .collect::<Vec<_>>()
        .join("\n");
    let temperatures = Temperature::vocabulary();

    format!(
        "{PERSONA}\n\
\n\
STRICT OUTPUT: a single JSON object with exactly these keys:\n\
{keys}\n\
\n\
Rules:\n\
- \"temperature\" must be one of: {temperatures}.\n\
- \"estimated_value\" is a number, or 0 when unknown.\n\
- Return only the JSON object, no Markdown.\n\
\n\
Conversation:\n\
{transcript}"
    )
}
