//! # artwork-poems
//!
//! Cache-through poem generation for museum artworks.
//!
//! ## Overview
//!
//! A caller names an artwork by its numeric catalog id or by its accession
//! number. If a poem for that artwork is already stored it is returned as is.
//! Otherwise the artwork record is fetched from the catalog, a short poem is
//! generated from it, and the poem is written once under the artwork's primary
//! id before being returned.
//!
//! The three collaborators are traits injected into [`GenerationPipeline`]:
//! [`ArtworkSource`], [`PoemGenerator`] and [`PoemStore`]. Every failure is an
//! [`Error`] whose [`ErrorKind`](error_code::ErrorKind) decides the HTTP status
//! at the boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artwork_poems::{
//!     ClevelandArtSource, GenerationPipeline, HttpPoemGenerator, MemoryPoemStore,
//!     RequestContext,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> artwork_poems::Result<()> {
//!     let pipeline = GenerationPipeline::new(
//!         Arc::new(ClevelandArtSource::builder().build()?),
//!         Arc::new(
//!             HttpPoemGenerator::builder()
//!                 .endpoint("https://llm.example/model/{model}/invoke")
//!                 .build()?,
//!         ),
//!         Arc::new(MemoryPoemStore::new()),
//!     );
//!
//!     let outcome = pipeline.run("160729", &RequestContext::new()).await?;
//!     println!("{}", outcome.poem.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Artwork, poem and lookup key |
//! | [`artwork`] | Artwork catalog client |
//! | [`generation`] | Prompt construction and the text generation client |
//! | [`store`] | Poem persistence backends |
//! | [`pipeline`] | Lookup, fetch, generate, persist |
//! | [`api`] | axum router and response bodies |
//! | [`config`] | Environment configuration |
//! | [`transport`] | Shared HTTP client settings |

pub mod api;
pub mod artwork;
pub mod config;
pub mod error_code;
pub mod generation;
pub mod pipeline;
pub mod store;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use artwork::{ArtworkSource, ClevelandArtSource};
pub use config::ServiceConfig;
pub use generation::{HttpPoemGenerator, PoemGenerator};
pub use pipeline::{GenerationPipeline, OutcomeSource, PoemOutcome, RequestContext};
pub use store::{MemoryPoemStore, PoemStore};
pub use types::{Artwork, LookupKey, Poem};

#[cfg(feature = "sqlite")]
pub use store::SqlitePoemStore;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
