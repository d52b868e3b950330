//! Deterministic prompt construction.

use super::message::{Message, MessagesRequest};
use super::SamplingParams;

/// System instruction constraining the reply to the poem itself.
pub const SYSTEM_PROMPT: &str = "Respond with just the poem, nothing else.";

const INSTRUCTION: &str = "Write a short poem inspired by the artwork described by the <document>";

/// Wrap an artwork description in document delimiters and append the instruction.
pub fn craft_prompt(document: &str) -> String {
    format!("<document>{}</document>\n\n{}", document, INSTRUCTION)
}

/// Build the full request body for one artwork description.
pub fn build_request(document: &str, params: &SamplingParams) -> MessagesRequest {
    MessagesRequest {
        anthropic_version: params.api_version.clone(),
        system: SYSTEM_PROMPT.to_string(),
        messages: vec![Message::user(craft_prompt(document))],
        max_tokens: params.max_tokens,
        top_p: params.top_p,
        top_k: params.top_k,
        temperature: params.temperature,
        stop_sequences: params.stop_sequences.clone(),
    }
}
