use super::message::MessagesResponse;
use super::{prompt, PoemGenerator, SamplingParams};
use crate::transport::HttpSettings;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use tracing::debug;

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Generator backed by a hosted Messages-style inference endpoint.
///
/// The endpoint may contain a `{model}` placeholder, which is replaced with
/// the configured model id (e.g. `https://host/model/{model}/invoke`).
pub struct HttpPoemGenerator {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    params: SamplingParams,
}

impl HttpPoemGenerator {
    pub fn builder() -> HttpPoemGeneratorBuilder {
        HttpPoemGeneratorBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    fn url(&self) -> String {
        self.endpoint.replace("{model}", &self.model)
    }
}

#[async_trait]
impl PoemGenerator for HttpPoemGenerator {
    async fn generate(&self, description: &str) -> Result<String> {
        let body = prompt::build_request(description, &self.params);

        let mut request = self
            .http_client
            .post(self.url())
            .header("Accept", "application/json")
            .json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::generation_failed(format!("generation request failed: {}", e), None))?;

        let status = response.status();
        let body_str = response.text().await.map_err(|e| {
            Error::generation_failed(
                format!("failed to read generation response: {}", e),
                Some(status.as_u16()),
            )
        })?;
        if !status.is_success() {
            return Err(Error::generation_failed(
                format!("generation endpoint error ({}): {}", status, body_str),
                Some(status.as_u16()),
            ));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body_str).map_err(|e| {
            Error::generation_failed(
                format!("unable to decode generation response: {}", e),
                Some(status.as_u16()),
            )
        })?;
        debug!(stop_reason = ?parsed.stop_reason, "generation finished");

        parsed
            .first_text()
            .map(String::from)
            .ok_or_else(|| {
                Error::generation_failed("generation response has no text content", Some(status.as_u16()))
            })
    }

    fn name(&self) -> &'static str {
        "http_messages"
    }
}

pub struct HttpPoemGeneratorBuilder {
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    params: SamplingParams,
    settings: Option<HttpSettings>,
    http_client: Option<reqwest::Client>,
}

impl HttpPoemGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            model: None,
            api_key: None,
            params: SamplingParams::default(),
            settings: None,
            http_client: None,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    pub fn settings(mut self, settings: HttpSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpPoemGenerator> {
        let endpoint = self
            .endpoint
            .or_else(|| std::env::var("POEMS_LLM_ENDPOINT").ok())
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| Error::config_missing("POEMS_LLM_ENDPOINT"))?;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::configuration_with_context(
                "generation endpoint must be an http(s) url",
                ErrorContext::new()
                    .with_field_path("POEMS_LLM_ENDPOINT")
                    .with_details(endpoint)
                    .with_source("http_generator"),
            ));
        }
        let model = self
            .model
            .or_else(|| std::env::var("POEMS_LLM_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let api_key = self
            .api_key
            .or_else(|| std::env::var("POEMS_LLM_API_KEY").ok())
            .filter(|k| !k.is_empty());

        let http_client = match self.http_client {
            Some(client) => client,
            None => self
                .settings
                .unwrap_or_else(HttpSettings::from_env)
                .build_client()?,
        };

        Ok(HttpPoemGenerator {
            http_client,
            endpoint,
            model,
            api_key,
            params: self.params,
        })
    }
}

impl Default for HttpPoemGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
