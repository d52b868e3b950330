//! Messages-style wire format for the text generation endpoint.

use serde::{Deserialize, Serialize};

/// Single chat message with typed content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::text(text)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Content block. Only text is produced or consumed; other block types in a
/// response are tolerated and skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        }
    }
}

/// Request body sent to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    pub system: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
    pub temperature: f64,
    pub stop_sequences: Vec<String>,
}

/// Response body; only `content` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessagesResponse {
    /// First generated segment, when it is text.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(ContentBlock::as_text)
    }
}
