//! Wire types for the Anthropic Messages API, reduced to the fields this
//! adapter uses.

use serde::{Deserialize, Serialize};

/// Request body for the `/v1/messages` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens in the generated response.
    pub max_tokens: u32,
    /// System prompt establishing the response contract.
    pub system: String,
    /// Conversation messages.
    pub messages: Vec<Message>,
}

/// One message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Response body from the `/v1/messages` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Content blocks, normally a single text block.
    pub content: Vec<ContentBlock>,
}

/// One content block of the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block kind; this adapter only consumes "text".
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text payload.
    #[serde(default)]
    pub text: String,
}
