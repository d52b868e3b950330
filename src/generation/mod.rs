//! Poem generation.
//!
//! [`PoemGenerator`] turns an artwork description into poem text. The
//! production implementation, [`HttpPoemGenerator`], posts a Messages-style
//! request to a hosted inference endpoint and returns the first text segment
//! of the reply verbatim.

mod http;
pub mod message;
pub mod prompt;

pub use http::{HttpPoemGenerator, HttpPoemGeneratorBuilder, DEFAULT_MODEL_ID};
pub use prompt::{build_request, craft_prompt, SYSTEM_PROMPT};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PoemGenerator: Send + Sync {
    /// Generate a poem for one artwork description.
    ///
    /// Fails with `GenerationFailed`; no partial text is ever returned.
    async fn generate(&self, description: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
    pub temperature: f64,
    pub stop_sequences: Vec<String>,
    /// Value for the body's `anthropic_version` field, if the endpoint wants one.
    pub api_version: Option<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            top_p: 0.999,
            top_k: 250,
            temperature: 1.0,
            stop_sequences: Vec::new(),
            api_version: Some("bedrock-2023-05-31".to_string()),
        }
    }
}
