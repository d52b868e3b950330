use crate::{Error, Result};
use std::fmt;

/// A caller-supplied identifier, classified once at pipeline entry.
///
/// Anything that parses as an integer is a primary id, kept in canonical
/// decimal form; everything else is an accession number. The classification picks the store path: direct key
/// get for primary ids, secondary-index query for accession numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    PrimaryId(String),
    AccessionNumber(String),
}

impl LookupKey {
    /// Classify a raw identifier. Surrounding whitespace is ignored; a blank
    /// identifier is rejected.
    pub fn classify(raw: &str) -> Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(Error::invalid_request("artwork identifier is empty"));
        }
        if let Ok(n) = id.parse::<i64>() {
            Ok(LookupKey::PrimaryId(n.to_string()))
        } else {
            Ok(LookupKey::AccessionNumber(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LookupKey::PrimaryId(s) | LookupKey::AccessionNumber(s) => s,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, LookupKey::PrimaryId(_))
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::PrimaryId(id) => write!(f, "id:{}", id),
            LookupKey::AccessionNumber(acc) => write!(f, "accession:{}", acc),
        }
    }
}
