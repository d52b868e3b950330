use super::ArtworkSource;
use crate::transport::HttpSettings;
use crate::types::Artwork;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://openaccess-api.clevelandart.org/api/";

/// Client for `GET {catalog}/artworks/{id}`.
pub struct ClevelandArtSource {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ClevelandArtSource {
    pub fn builder() -> ClevelandArtSourceBuilder {
        ClevelandArtSourceBuilder::new()
    }

    fn artwork_url(&self, id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::upstream_unavailable("catalog url cannot take a path", None))?
            .pop_if_empty()
            .push("artworks")
            .push(id);
        Ok(url)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

#[async_trait]
impl ArtworkSource for ClevelandArtSource {
    async fn fetch(&self, id: &str) -> Result<Artwork> {
        let url = self.artwork_url(id)?;
        debug!(%url, "fetching artwork");

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("catalog request failed: {}", e), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream_unavailable(
                format!("could not fetch artwork {}: {}", id, status),
                Some(status.as_u16()),
            ));
        }

        let body = response.text().await.map_err(|e| {
            Error::upstream_unavailable(
                format!("could not read catalog response: {}", e),
                Some(status.as_u16()),
            )
        })?;

        parse_catalog_body(&body)
    }

    fn name(&self) -> &'static str {
        "cleveland_art"
    }
}

/// Decode a catalog response of the form `{"data": {"id": .., "accession_number": .., ..}}`.
///
/// The `data` object is kept verbatim as the artwork's document.
pub fn parse_catalog_body(body: &str) -> Result<Artwork> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| Error::upstream_malformed(format!("catalog body is not JSON: {}", e)))?;

    let data = root
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| Error::upstream_malformed("catalog body has no data object"))?;

    let mut artwork: Artwork = serde_json::from_value(data.clone())
        .map_err(|e| Error::upstream_malformed(format!("catalog artwork does not decode: {}", e)))?;

    if artwork.accession_number.trim().is_empty() {
        return Err(Error::upstream_malformed("catalog artwork has an empty accession number"));
    }

    artwork.document = data.to_string();
    Ok(artwork)
}

pub struct ClevelandArtSourceBuilder {
    base_url: Option<String>,
    settings: Option<HttpSettings>,
    http_client: Option<reqwest::Client>,
}

impl ClevelandArtSourceBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            settings: None,
            http_client: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn settings(mut self, settings: HttpSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Share an already-built client instead of creating one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<ClevelandArtSource> {
        let raw = self
            .base_url
            .or_else(|| std::env::var("POEMS_CATALOG_URL").ok())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let base_url = Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid catalog url: {}", e),
                ErrorContext::new()
                    .with_field_path("POEMS_CATALOG_URL")
                    .with_details(raw.clone())
                    .with_source("cleveland_art"),
            )
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => self
                .settings
                .unwrap_or_else(HttpSettings::from_env)
                .build_client()?,
        };

        Ok(ClevelandArtSource {
            http_client,
            base_url,
        })
    }
}

impl Default for ClevelandArtSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
