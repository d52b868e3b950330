//! Cache-through poem generation.
//!
//! # Generation Pipeline
//!
//! [`GenerationPipeline`] composes the three collaborators for one request:
//!
//! ```text
//! identifier → classify → store lookup ──hit──────────────────────────→ Cached
//!                               │
//!                              miss → catalog fetch → generate → put_if_absent
//!                                                                  │
//!                                            ok / store error ─────┼──→ Generated
//!                                            AlreadyExists → re-read → RaceLoser
//! ```
//!
//! Steps run strictly in order and stop at the first failure. Nothing is
//! retried here: generation is metered, and the store, not the pipeline, is
//! the durability boundary. A poem that was generated but could not be
//! persisted is still returned; the failed write is only logged. The write
//! itself is not raced against the request deadline.
//!
//! The stored id and accession number always come from the fetched
//! [`Artwork`](crate::types::Artwork), never from caller input.

mod context;
mod stats;

pub use context::RequestContext;
pub use stats::PipelineStats;

use crate::artwork::ArtworkSource;
use crate::generation::PoemGenerator;
use crate::store::PoemStore;
use crate::types::{LookupKey, Poem};
use crate::{Error, Result};
use stats::AtomicStats;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// How a returned poem was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// Found in the store; no external calls beyond the lookup.
    Cached,
    /// Generated during this request.
    Generated,
    /// Generated during this request, but a concurrent request persisted
    /// first; the stored poem is returned instead.
    RaceLoser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemOutcome {
    pub poem: Poem,
    pub source: OutcomeSource,
}

impl PoemOutcome {
    pub fn is_cached(&self) -> bool {
        self.source == OutcomeSource::Cached
    }
}

pub struct GenerationPipeline {
    source: Arc<dyn ArtworkSource>,
    generator: Arc<dyn PoemGenerator>,
    store: Arc<dyn PoemStore>,
    stats: Arc<AtomicStats>,
}

impl GenerationPipeline {
    pub fn new(
        source: Arc<dyn ArtworkSource>,
        generator: Arc<dyn PoemGenerator>,
        store: Arc<dyn PoemStore>,
    ) -> Self {
        Self {
            source,
            generator,
            store,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats.to_stats()
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Produce the poem for `identifier`, generating and persisting it on a miss.
    pub async fn run(&self, identifier: &str, ctx: &RequestContext) -> Result<PoemOutcome> {
        let result = match LookupKey::classify(identifier) {
            Ok(key) => {
                let span = info_span!("poem_request", request_id = %ctx.request_id(), key = %key);
                self.run_classified(&key, ctx).instrument(span).await
            }
            Err(e) => Err(e),
        };
        if result.is_err() {
            AtomicStats::bump(&self.stats.failures);
        }
        result
    }

    async fn run_classified(&self, key: &LookupKey, ctx: &RequestContext) -> Result<PoemOutcome> {
        if let Some(poem) = ctx.run("lookup", self.store.lookup(key)).await? {
            AtomicStats::bump(&self.stats.hits);
            info!(id = %poem.id, "we already have the poem");
            return Ok(PoemOutcome {
                poem,
                source: OutcomeSource::Cached,
            });
        }
        AtomicStats::bump(&self.stats.misses);
        debug!("cache miss");

        let artwork = ctx.run("fetch", self.source.fetch(key.as_str())).await?;
        info!(id = artwork.id, accession_number = %artwork.accession_number, "artwork fetched");

        let text = ctx
            .run("generate", self.generator.generate(artwork.description_blob()))
            .await?;
        AtomicStats::bump(&self.stats.generated);
        info!(generator = self.generator.name(), chars = text.len(), "poem generated");
        debug!(poem = %text);

        let poem = Poem::new(artwork.primary_id(), artwork.accession_number, text);
        Ok(self.persist(poem).await)
    }

    /// Best-effort write-once persist. Never fails the request.
    ///
    /// Runs outside the request deadline: the poem is already paid for.
    async fn persist(&self, poem: Poem) -> PoemOutcome {
        match self.store.put_if_absent(&poem).await {
            Ok(()) => {
                info!(id = %poem.id, store = self.store.name(), "poem persisted");
                PoemOutcome {
                    poem,
                    source: OutcomeSource::Generated,
                }
            }
            Err(Error::AlreadyExists { .. }) => {
                AtomicStats::bump(&self.stats.race_losses);
                let primary = LookupKey::PrimaryId(poem.id.clone());
                match self.store.lookup(&primary).await {
                    Ok(Some(winner)) => {
                        info!(id = %winner.id, "concurrent request persisted first; returning its poem");
                        PoemOutcome {
                            poem: winner,
                            source: OutcomeSource::RaceLoser,
                        }
                    }
                    Ok(None) => {
                        warn!(id = %poem.id, "poem reported as existing but re-read found nothing");
                        PoemOutcome {
                            poem,
                            source: OutcomeSource::Generated,
                        }
                    }
                    Err(e) => {
                        warn!(id = %poem.id, error = %e, "could not re-read existing poem");
                        PoemOutcome {
                            poem,
                            source: OutcomeSource::Generated,
                        }
                    }
                }
            }
            Err(e) => {
                AtomicStats::bump(&self.stats.persist_failures);
                warn!(id = %poem.id, error = %e, code = e.kind().code(), "could not cache poem; returning it uncached");
                PoemOutcome {
                    poem,
                    source: OutcomeSource::Generated,
                }
            }
        }
    }
}
