//! HTTP client for the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use fabler_core::blueprint::StoryBlueprint;
use fabler_core::error::EngineError;
use fabler_core::generator::StoryGenerator;

use crate::parse::parse_blueprint;
use crate::types::{Message, MessagesRequest, MessagesResponse};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

const SYSTEM_PROMPT: &str = "You write branching choose-your-own-adventure stories. \
Respond with a single JSON object and nothing else, following this schema exactly: \
{\"title\": string, \"rootNode\": node} where node is {\"content\": string, \
\"isEnding\": bool, \"isWinningEnding\": bool, \"options\": [{\"text\": string, \
\"nextNode\": node}]}. Non-ending nodes must offer 2-3 options; ending nodes must \
have an empty options array. Include at least one winning ending. Keep the tree at \
most 4 levels deep.";

/// `StoryGenerator` backed by the Anthropic Messages API.
pub struct AnthropicGenerator {
    api_key: String,
    client: Client,
    base_url: String,
    model: String,
}

impl AnthropicGenerator {
    /// Creates a generator against the production endpoint.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Creates a generator against a custom endpoint (useful for testing).
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens with a broken TLS backend.
    #[must_use]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn send(&self, theme: &str) -> Result<MessagesResponse, EngineError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("Write a branching story with this theme: {theme}"),
            }],
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::GenerationFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(EngineError::GenerationFailed(format!(
                "model API returned {status}: {message}"
            )));
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| EngineError::GenerationFailed(format!("unreadable API response: {e}")))
    }
}

#[async_trait]
impl StoryGenerator for AnthropicGenerator {
    #[instrument(skip(self), fields(theme_len = theme.len()))]
    async fn generate(&self, theme: &str) -> Result<StoryBlueprint, EngineError> {
        let response = self.send(theme).await?;

        let text = response
            .content
            .iter()
            .find(|block| block.content_type == "text")
            .map(|block| block.text.as_str())
            .ok_or_else(|| {
                EngineError::GenerationFailed("response contained no text block".into())
            })?;

        debug!(bytes = text.len(), "received model output");
        parse_blueprint(text)
    }
}
