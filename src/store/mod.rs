//! Poem persistence.
//!
//! A [`PoemStore`] maps an artwork's primary id to its poem and keeps a
//! secondary index on accession number.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryPoemStore`] | In-process store, records kept serialized |
//! | [`SqlitePoemStore`] | SQLite table plus accession index (feature `sqlite`) |
//!
//! Stores provide no transactions. `put` overwrites; `put_if_absent` is the
//! conditional write the pipeline uses so that at most one poem per id is
//! ever persisted.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryPoemStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePoemStore;

use crate::types::{LookupKey, Poem};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PoemStore: Send + Sync {
    /// Primary ids use a direct key get; accession numbers query the
    /// secondary index and take the earliest-written match.
    ///
    /// `Ok(None)` means no record. Fails with `StoreUnavailable` or
    /// `StoreCorrupt`.
    async fn lookup(&self, key: &LookupKey) -> Result<Option<Poem>>;

    /// Unconditional write; an existing record with the same id is replaced.
    async fn put(&self, poem: &Poem) -> Result<()>;

    /// Write only if no record with this id exists, else `AlreadyExists`.
    async fn put_if_absent(&self, poem: &Poem) -> Result<()>;

    fn name(&self) -> &'static str;
}
