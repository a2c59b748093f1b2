use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::leads::analysis::LeadAnalysis;
use crate::leads::parser::{parse_response, parse_structured, GENERATION_SENTINEL};
use crate::leads::prompt::{build_analysis_prompt, ResponseFormat};
use crate::llm::{build_provider, GenerationRequest, LlmProvider};
use crate::{BlueSdrError, Result};

/// Handling of a failed generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return `BlueSdrError::Generation`
    #[default]
    Propagate,
    /// Substitute the all-"Error" sentinel response
    Sentinel,
}

/// Runs one transcript through prompt building, generation, and parsing.
pub struct LeadAnalyzer {
    provider: Box<dyn LlmProvider>,
    format: ResponseFormat,
    on_failure: FailurePolicy,
}

impl LeadAnalyzer {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        format: ResponseFormat,
        on_failure: FailurePolicy,
    ) -> Self {
        Self {
            provider,
            format,
            on_failure,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let provider =
            build_provider(settings).map_err(|e| BlueSdrError::Config(format!("{e:#}")))?;
        Ok(Self::new(
            provider,
            settings.llm.response_format,
            settings.llm.on_failure,
        ))
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Analyze a transcript. Parse failures always surface; generation
    /// failures follow the configured policy.
    pub async fn analyze(&self, transcript: &str) -> Result<LeadAnalysis> {
        let prompt = build_analysis_prompt(transcript, self.format);
        let request = GenerationRequest {
            prompt: &prompt,
            json_output: self.format == ResponseFormat::Json,
        };

        let raw = match self.provider.generate(request).await {
            Ok(text) => text,
            Err(e) => match self.on_failure {
                FailurePolicy::Propagate => {
                    return Err(BlueSdrError::Generation(format!("{e:#}")));
                }
                FailurePolicy::Sentinel => {
                    tracing::warn!("Generation failed, substituting sentinel response: {:#}", e);
                    GENERATION_SENTINEL.to_string()
                }
            },
        };

        let analysis = match self.format {
            ResponseFormat::Json => parse_structured(&raw),
            ResponseFormat::Delimited => parse_response(&raw),
        };

        if let Err(e) = &analysis {
            tracing::warn!("Could not parse analysis response: {}", e);
        }

        analysis
    }
}
