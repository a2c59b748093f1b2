//! Lead extraction pipeline
//!
//! transcript -> prompt -> generation -> parser -> review -> append.

mod analysis;
pub mod analyzer;
pub mod appender;
pub mod parser;
pub mod prompt;
pub mod schema;
pub mod session;

pub use analysis::LeadAnalysis;
pub use analyzer::{FailurePolicy, LeadAnalyzer};
pub use appender::{append_analysis, build_record, format_timestamp, LeadStore};
pub use parser::{parse_response, parse_structured, GENERATION_SENTINEL};
pub use prompt::{build_analysis_prompt, ResponseFormat};
pub use schema::{Temperature, LEAD_ANALYSIS_SCHEMA};
pub use session::{ReviewSession, ReviewState};
