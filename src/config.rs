//! Service configuration loaded from the environment.
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | `POEMS_TABLE_NAME` | (required) | Poem table; startup fails without it |
//! | `POEMS_DATABASE_URL` | `sqlite://poems.db?mode=rwc` | SQLite database |
//! | `POEMS_DB_MAX_CONNECTIONS` | `5` | Pool size |
//! | `POEMS_CATALOG_URL` | CMA Open Access API | Artwork catalog base url |
//! | `POEMS_LLM_ENDPOINT` | (required) | Generation endpoint, `{model}` placeholder allowed |
//! | `POEMS_LLM_MODEL` | `anthropic.claude-3-haiku-20240307-v1:0` | |
//! | `POEMS_LLM_API_KEY` | unset | Sent as a bearer token |
//! | `POEMS_REQUEST_TIMEOUT_SECS` | `60` | Whole-request deadline, `0` disables |
//! | `POEMS_LISTEN_ADDR` | `127.0.0.1:3000` | |
//!
//! HTTP client knobs (`POEMS_HTTP_*`) are read by [`HttpSettings::from_env`].

use crate::artwork::ClevelandArtSource;
use crate::generation::{HttpPoemGenerator, DEFAULT_MODEL_ID};
use crate::transport::HttpSettings;
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://poems.db?mode=rwc";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub table_name: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub catalog_url: String,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub request_timeout: Option<Duration>,
    pub listen_addr: SocketAddr,
    pub http: HttpSettings,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let mut config = Self::from_vars(&vars)?;
        config.http = HttpSettings::from_env();
        Ok(config)
    }

    /// Build from an explicit variable map; unknown keys are ignored.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let table_name = get("POEMS_TABLE_NAME")
            .ok_or_else(|| Error::config_missing("POEMS_TABLE_NAME"))?
            .to_string();
        let llm_endpoint = get("POEMS_LLM_ENDPOINT")
            .ok_or_else(|| Error::config_missing("POEMS_LLM_ENDPOINT"))?
            .to_string();

        let db_max_connections = match get("POEMS_DB_MAX_CONNECTIONS") {
            Some(raw) => parse_number(raw, "POEMS_DB_MAX_CONNECTIONS")?,
            None => 5,
        };
        let request_timeout = match get("POEMS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>(raw, "POEMS_REQUEST_TIMEOUT_SECS")?,
            None => 60,
        };
        let listen_raw = get("POEMS_LISTEN_ADDR").unwrap_or(DEFAULT_LISTEN_ADDR);
        let listen_addr = listen_raw.parse::<SocketAddr>().map_err(|e| {
            Error::configuration_with_context(
                format!("invalid listen address: {}", e),
                ErrorContext::new()
                    .with_field_path("POEMS_LISTEN_ADDR")
                    .with_details(listen_raw.to_string()),
            )
        })?;

        Ok(Self {
            table_name,
            database_url: get("POEMS_DATABASE_URL")
                .unwrap_or(DEFAULT_DATABASE_URL)
                .to_string(),
            db_max_connections,
            catalog_url: get("POEMS_CATALOG_URL")
                .unwrap_or(crate::artwork::DEFAULT_CATALOG_URL)
                .to_string(),
            llm_endpoint,
            llm_model: get("POEMS_LLM_MODEL").unwrap_or(DEFAULT_MODEL_ID).to_string(),
            llm_api_key: get("POEMS_LLM_API_KEY").map(String::from),
            request_timeout: (request_timeout > 0).then(|| Duration::from_secs(request_timeout)),
            listen_addr,
            http: HttpSettings::default(),
        })
    }

    /// Catalog client sharing `client`'s connection pool.
    pub fn artwork_source(&self, client: reqwest::Client) -> Result<ClevelandArtSource> {
        ClevelandArtSource::builder()
            .base_url(&self.catalog_url)
            .http_client(client)
            .build()
    }

    pub fn poem_generator(&self, client: reqwest::Client) -> Result<HttpPoemGenerator> {
        let mut builder = HttpPoemGenerator::builder()
            .endpoint(&self.llm_endpoint)
            .model(&self.llm_model)
            .http_client(client);
        if let Some(ref key) = self.llm_api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        Error::configuration_with_context(
            format!("{} is not a valid number: {}", key, e),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(raw.to_string()),
        )
    })
}
