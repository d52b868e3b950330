//! Core data model shared by the catalog, generator, store and pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Artwork`] | Catalog record for one artwork, held for a single request |
//! | [`Poem`] | The cached artifact, keyed by the artwork's primary id |
//! | [`LookupKey`] | Caller identifier classified as primary id or accession number |

pub mod artwork;
pub mod lookup;
pub mod poem;

pub use artwork::Artwork;
pub use lookup::LookupKey;
pub use poem::Poem;
