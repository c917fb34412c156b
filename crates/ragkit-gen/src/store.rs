//! In-memory document store.
//!
//! Stands in for an external document database during tests and CLI runs;
//! the pipeline only ever treats the store as an opaque sink/source.

use ragkit_core::traits::DocumentStore;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    records: Vec<(String, Value)>,
    next_id: u64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(&mut self, record: Value) -> anyhow::Result<String> {
        self.next_id += 1;
        let id = self.next_id.to_string();
        self.records.push((id.clone(), record));
        Ok(id)
    }

    /// A record matches when every key in `filter` equals the record's
    /// value for that key.
    fn find(&self, filter: &Value) -> anyhow::Result<Vec<Value>> {
        let Some(filter) = filter.as_object() else {
            anyhow::bail!("filter must be a JSON object");
        };
        Ok(self
            .records
            .iter()
            .filter(|(_, record)| filter.iter().all(|(k, v)| record.get(k) == Some(v)))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
