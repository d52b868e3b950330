//! In-process poem store.

use super::PoemStore;
use crate::types::{LookupKey, Poem};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Default)]
struct Tables {
    /// Primary table: id -> serialized record.
    records: HashMap<String, Vec<u8>>,
    /// Secondary index: accession number -> ids in write order.
    by_accession: HashMap<String, Vec<String>>,
}

impl Tables {
    fn write(&mut self, poem: &Poem, data: Vec<u8>) {
        if let Some(previous) = self.records.insert(poem.id.clone(), data) {
            match serde_json::from_slice::<Poem>(&previous) {
                Ok(old) if old.accession_number == poem.accession_number => return,
                Ok(old) => self.unindex(&old.accession_number, &old.id),
                // Old accession number unknown; drop the id from every list.
                Err(_) => self.unindex_everywhere(&poem.id),
            }
        }
        let ids = self
            .by_accession
            .entry(poem.accession_number.clone())
            .or_default();
        if !ids.contains(&poem.id) {
            ids.push(poem.id.clone());
        }
    }

    fn unindex_everywhere(&mut self, id: &str) {
        self.by_accession.retain(|_, ids| {
            ids.retain(|i| i != id);
            !ids.is_empty()
        });
    }

    fn unindex(&mut self, accession_number: &str, id: &str) {
        if let Some(ids) = self.by_accession.get_mut(accession_number) {
            ids.retain(|i| i != id);
            if ids.is_empty() {
                self.by_accession.remove(accession_number);
            }
        }
    }
}

/// Poem store held in memory. Records are kept serialized, so a record that
/// no longer decodes surfaces as `StoreCorrupt` just as it would from a
/// persistent backend.
pub struct MemoryPoemStore {
    tables: RwLock<Tables>,
}

impl MemoryPoemStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn decode(id: &str, data: &[u8]) -> Result<Option<Poem>> {
        let poem: Poem = serde_json::from_slice(data).map_err(|e| {
            Error::store_corrupt(format!("record does not decode: {}", e), Some(id.to_string()))
        })?;
        if poem.id.is_empty() {
            return Ok(None);
        }
        Ok(Some(poem))
    }

    fn encode(poem: &Poem) -> Result<Vec<u8>> {
        serde_json::to_vec(poem)
            .map_err(|e| Error::store_unavailable(format!("could not encode poem: {}", e)))
    }

    #[cfg(test)]
    async fn insert_raw(&self, id: &str, accession_number: &str, data: &[u8]) {
        let mut tables = self.tables.write().await;
        tables.records.insert(id.to_string(), data.to_vec());
        tables
            .by_accession
            .entry(accession_number.to_string())
            .or_default()
            .push(id.to_string());
    }
}

impl Default for MemoryPoemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PoemStore for MemoryPoemStore {
    async fn lookup(&self, key: &LookupKey) -> Result<Option<Poem>> {
        let tables = self.tables.read().await;
        match key {
            LookupKey::PrimaryId(id) => match tables.records.get(id) {
                Some(data) => Self::decode(id, data),
                None => Ok(None),
            },
            LookupKey::AccessionNumber(acc) => {
                let Some(ids) = tables.by_accession.get(acc) else {
                    return Ok(None);
                };
                if ids.len() > 1 {
                    warn!(accession_number = %acc, matches = ids.len(), "accession number shared by several poems; using the earliest");
                }
                match ids.first().and_then(|id| tables.records.get(id).map(|d| (id, d))) {
                    Some((id, data)) => Self::decode(id, data),
                    None => Ok(None),
                }
            }
        }
    }

    async fn put(&self, poem: &Poem) -> Result<()> {
        let data = Self::encode(poem)?;
        self.tables.write().await.write(poem, data);
        Ok(())
    }

    async fn put_if_absent(&self, poem: &Poem) -> Result<()> {
        let data = Self::encode(poem)?;
        let mut tables = self.tables.write().await;
        if tables.records.contains_key(&poem.id) {
            return Err(Error::AlreadyExists {
                id: poem.id.clone(),
            });
        }
        tables.write(poem, data);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
