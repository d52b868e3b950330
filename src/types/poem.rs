use serde::{Deserialize, Serialize};

/// A generated poem as persisted by the store.
///
/// `id` is the artwork's primary id and the store's primary key;
/// `accession_number` is the denormalized secondary key. Both come from the
/// catalog record that produced the poem, never from caller input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub id: String,
    pub accession_number: String,
    #[serde(rename = "poem")]
    pub text: String,
}

impl Poem {
    pub fn new(
        id: impl Into<String>,
        accession_number: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            accession_number: accession_number.into(),
            text: text.into(),
        }
    }
}
