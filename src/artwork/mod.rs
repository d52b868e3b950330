//! Artwork catalog access.
//!
//! [`ArtworkSource`] is the seam the pipeline depends on; [`ClevelandArtSource`]
//! is the production implementation against the Cleveland Museum of Art
//! Open Access API. Implementations do no caching and no retries.

mod cleveland;

pub use cleveland::{
    parse_catalog_body, ClevelandArtSource, ClevelandArtSourceBuilder, DEFAULT_CATALOG_URL,
};

use crate::types::Artwork;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ArtworkSource: Send + Sync {
    /// Fetch one artwork by a caller-supplied identifier (primary id or
    /// accession number). One outbound call per invocation.
    ///
    /// Fails with `UpstreamUnavailable` on transport errors or non-success
    /// statuses and with `UpstreamMalformed` when the body does not decode.
    async fn fetch(&self, id: &str) -> Result<Artwork>;

    fn name(&self) -> &'static str;
}
