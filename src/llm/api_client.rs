//! Gemini API client
//!
//! Direct HTTP client for the Gemini generateContent endpoint, wrapped as a
//! [`ModelExecutor`] so agent steps can be driven by a live model. Tests run
//! against a mock server only; no test reaches the real API.

use crate::llm::executor::{AgentReply, ExecutorError, ModelExecutor};
use crate::llm::gemini_types::{
    GeminiApiRequest, GeminiApiResponse, GenerationConfig, RequestContent, RequestPart,
};
use async_trait::async_trait;

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for the Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the given key and model, using the shared
    /// reqwest client for connection pooling
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (for tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a prompt and return the model's text output
    ///
    /// # Errors
    /// * `ExecutorError::EmptyApiKey` - no API key configured
    /// * `ExecutorError::Transport` - request could not be sent
    /// * `ExecutorError::Api` - non-success HTTP status
    /// * `ExecutorError::Blocked` - prompt feedback contained a block reason
    /// * `ExecutorError::Malformed` - body unparsable or no usable candidate
    pub async fn generate(&self, prompt: &str) -> Result<String, ExecutorError> {
        if self.api_key.is_empty() {
            return Err(ExecutorError::EmptyApiKey);
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request_body = GeminiApiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
            }),
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ExecutorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                "Gemini API returned error status"
            );
            return Err(ExecutorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExecutorError::Transport(e.to_string()))?;

        let parsed: GeminiApiResponse = serde_json::from_str(&body)
            .map_err(|e| ExecutorError::Malformed(format!("{} - body: {}", e, body)))?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(ExecutorError::Blocked(reason.clone()));
            }
        }

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ExecutorError::Malformed("response contains no candidates".to_string()))?;

        if text.is_empty() {
            return Err(ExecutorError::Malformed("response text is empty".to_string()));
        }

        tracing::debug!(response_len = text.len(), "Gemini API reply received");
        Ok(text)
    }
}

#[async_trait]
impl ModelExecutor for GeminiClient {
    async fn reply(&self, agent_name: &str, prompt: &str) -> Result<AgentReply, ExecutorError> {
        tracing::debug!(agent = %agent_name, "Dispatching prompt to Gemini");
        let text = self.generate(prompt).await?;
        // A live model replies with free text only; structured actions come
        // from the scripted executor or a future tool-calling integration.
        Ok(AgentReply::text(text))
    }
}
