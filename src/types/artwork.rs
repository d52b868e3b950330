//! Artwork records as returned by the public catalog.

use serde::{Deserialize, Serialize};

/// One artwork from the catalog. Never persisted; lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: u64,
    pub accession_number: String,
    /// Curatorial description, when the catalog has one.
    #[serde(default)]
    pub description: Option<String>,
    /// The catalog's full JSON document for this artwork.
    #[serde(skip)]
    pub document: String,
}

impl Artwork {
    pub fn new(id: u64, accession_number: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            id,
            accession_number: accession_number.into(),
            description: None,
            document: document.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text handed to the generator: the whole catalog document, falling
    /// back to the bare description when no document was captured.
    pub fn description_blob(&self) -> &str {
        if self.document.is_empty() {
            self.description.as_deref().unwrap_or_default()
        } else {
            &self.document
        }
    }

    /// Primary id in the string form the store keys on.
    pub fn primary_id(&self) -> String {
        self.id.to_string()
    }
}
