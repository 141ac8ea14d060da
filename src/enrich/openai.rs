//! Chat-completions client.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::prompt::{build_analysis_prompt, parse_model_response, SYSTEM_PROMPT};
use super::{InsightPayload, LanguageModelClient};
use crate::config::{Config, LLM_MAX_TOKENS, LLM_TEMPERATURE};
use crate::error_handling::{EnrichmentError, InitializationError};
use crate::initialization::init_llm_client;
use crate::parse::{ImageInventory, LinkInventory, Metadata};
use crate::utils::sanitize_and_truncate_error_message;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Calls an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    client: Arc<reqwest::Client>,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a client for `endpoint` authenticated with `api_key`.
    pub fn new(
        client: Arc<reqwest::Client>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Builds a client from `config`, or `None` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Option<Self>, InitializationError> {
        let Some(api_key) = config.llm_api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        Ok(Some(Self::new(
            init_llm_client(config)?,
            api_key,
            config.llm_endpoint.clone(),
            config.llm_model.clone(),
        )))
    }
}

#[async_trait]
impl LanguageModelClient for OpenAiClient {
    fn enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn analyze(
        &self,
        content: &str,
        metadata: Option<&Metadata>,
        links: Option<&LinkInventory>,
        images: Option<&ImageInventory>,
    ) -> Result<InsightPayload, EnrichmentError> {
        let prompt = build_analysis_prompt(content, metadata, links, images);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: LLM_MAX_TOKENS,
            temperature: LLM_TEMPERATURE,
        };

        debug!("Requesting AI analysis from {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                body: sanitize_and_truncate_error_message(&body),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::InvalidResponse(e.to_string()))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EnrichmentError::InvalidResponse("no choices returned".to_string()))?;

        Ok(parse_model_response(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_key_is_none() {
        let config = Config::default();
        assert!(OpenAiClient::from_config(&config).expect("build").is_none());

        let blank = Config {
            llm_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(OpenAiClient::from_config(&blank).expect("build").is_none());
    }

    #[test]
    fn test_from_config_with_key_is_enabled() {
        let config = Config {
            llm_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let client = OpenAiClient::from_config(&config)
            .expect("build")
            .expect("enabled");
        assert!(client.enabled());
    }
}
