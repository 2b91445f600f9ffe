//! Tubeinfo Extractor - Schema-driven structured extraction
//!
//! Wraps an LLM behind a small "cast" engine: each target schema describes
//! its fields to the model, the model answers with one JSON object, and the
//! answer is validated at this boundary. A non-conformant answer is a
//! permanent extraction error; loosely-typed data never leaks past this
//! crate.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use tubeinfo_core::{ExtractionConfig, LlmClient, Result, TubeInfoError};

pub mod classify;
pub mod game;
pub mod llm;
pub mod song;
pub mod text;

pub use classify::Classifier;
pub use game::GameExtractor;
pub use llm::{create_llm_client, OllamaClient, OpenAiClient};
pub use song::SongExtractor;

const CAST_SYSTEM_PROMPT: &str = include_str!("prompts/cast_system.txt");

// ============================================================================
// Schema Trait
// ============================================================================

/// A target schema the extraction service can populate from free text.
///
/// `describe_fields` is shown verbatim to the model; deserialization of the
/// model's answer into the implementing type is the validation step.
pub trait Extractable: DeserializeOwned {
    /// Schema name shown to the model
    const NAME: &'static str;

    /// Field-by-field description of the expected JSON object
    fn describe_fields() -> &'static str;
}

// ============================================================================
// Extraction Client
// ============================================================================

/// Adapter around the LLM collaborator performing one schema cast per call
#[derive(Clone)]
pub struct ExtractionClient {
    llm: Arc<dyn LlmClient>,
    max_description_chars: usize,
}

impl ExtractionClient {
    pub fn new(llm: Arc<dyn LlmClient>, config: &ExtractionConfig) -> Self {
        Self {
            llm,
            max_description_chars: config.max_description_chars,
        }
    }

    /// Upper bound applied to description text before submission
    pub fn max_description_chars(&self) -> usize {
        self.max_description_chars
    }

    /// Cast the payload into the schema `T`.
    ///
    /// Raises a permanent error when the service cannot produce a
    /// conformant instance.
    pub async fn cast<T: Extractable>(&self, payload: &Value) -> Result<T> {
        let prompt = build_cast_prompt::<T>(payload);
        tracing::debug!(schema = T::NAME, prompt_chars = prompt.len(), "casting");

        let response = self.llm.generate(&prompt).await?;
        parse_cast_response(&response)
    }
}

/// Build the extraction prompt for schema `T`
fn build_cast_prompt<T: Extractable>(payload: &Value) -> String {
    format!(
        "{}\nSchema: {}\nFields:\n{}\n\nInput:\n{}\n\nReturn the {} JSON object:",
        CAST_SYSTEM_PROMPT,
        T::NAME,
        T::describe_fields(),
        payload,
        T::NAME,
    )
}

/// Parse and validate the model's answer
fn parse_cast_response<T: Extractable>(response: &str) -> Result<T> {
    let body = strip_code_fences(response);

    serde_json::from_str(body).map_err(|e| {
        TubeInfoError::Extraction(format!(
            "response does not conform to schema {}: {e}",
            T::NAME
        ))
    })
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Opening fence may carry a language tag ("```json")
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

// ============================================================================
// Tests
// ============================================================================
