//! Language model enrichment.
//!
//! Enrichment is optional and never fatal. The pipeline depends only on the
//! [`LanguageModelClient`] trait; [`OpenAiClient`] talks to a chat-completions
//! endpoint and [`DisabledLanguageModel`] stands in when no key is configured.

mod openai;
mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error_handling::EnrichmentError;
use crate::parse::{ImageInventory, LinkInventory, Metadata};

pub use openai::OpenAiClient;
pub use prompt::{build_analysis_prompt, parse_model_response, SYSTEM_PROMPT};

/// Structured model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightPayload {
    /// Whether a JSON object could be parsed from the response.
    pub success: bool,
    /// Parsed JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    /// Why parsing failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unmodified model text.
    pub raw_response: String,
}

/// Enrichment field of an analysis record.
///
/// Serialized untagged: either the payload itself or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Enrichment {
    /// The model answered.
    Completed(InsightPayload),
    /// The call failed; the analysis continued without it.
    Failed {
        /// Error message.
        error: String,
    },
}

impl Enrichment {
    /// Builds the error marker for a failed call.
    pub fn failed(error: &EnrichmentError) -> Self {
        Enrichment::Failed {
            error: crate::utils::sanitize_and_truncate_error_message(&error.to_string()),
        }
    }
}

/// Produces narrative insight about a page.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Whether calls can be made. The pipeline skips enrichment when false.
    fn enabled(&self) -> bool;

    /// Analyzes page text together with its extracted signals.
    async fn analyze(
        &self,
        content: &str,
        metadata: Option<&Metadata>,
        links: Option<&LinkInventory>,
        images: Option<&ImageInventory>,
    ) -> Result<InsightPayload, EnrichmentError>;
}

/// A client that is never enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLanguageModel;

#[async_trait]
impl LanguageModelClient for DisabledLanguageModel {
    fn enabled(&self) -> bool {
        false
    }

    async fn analyze(
        &self,
        _content: &str,
        _metadata: Option<&Metadata>,
        _links: Option<&LinkInventory>,
        _images: Option<&ImageInventory>,
    ) -> Result<InsightPayload, EnrichmentError> {
        Err(EnrichmentError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_disabled_model() {
        let model = DisabledLanguageModel;
        assert!(!model.enabled());
        let result = model.analyze("text", None, None, None).await;
        assert_eq!(result, Err(EnrichmentError::NotConfigured));
    }

    #[test]
    fn test_failed_enrichment_serializes_as_error_marker() {
        let marker = Enrichment::failed(&EnrichmentError::Request("timeout".to_string()));
        assert_eq!(
            serde_json::to_value(&marker).expect("serialize"),
            json!({"error": "AI analysis failed: timeout"})
        );
    }

    #[test]
    fn test_enrichment_deserializes_both_shapes() {
        let failed: Enrichment =
            serde_json::from_value(json!({"error": "boom"})).expect("failed shape");
        assert_eq!(
            failed,
            Enrichment::Failed {
                error: "boom".to_string()
            }
        );

        let completed: Enrichment = serde_json::from_value(json!({
            "success": true,
            "analysis": {"summary": "s"},
            "raw_response": "{\"summary\": \"s\"}"
        }))
        .expect("completed shape");
        assert!(matches!(completed, Enrichment::Completed(p) if p.success));
    }
}
