//! LLM module for bluesdr
//!
//! Provider abstraction and the Gemini client used for lead analysis.

mod client;
mod gemini;

pub use client::{build_provider, GenerationRequest, LlmProvider};
pub use gemini::GeminiClient;
