//! In-process vector index.
//!
//! Stores (vector, chunk text) pairs for one document-set session and
//! answers k-NN queries by cosine similarity. There is no delete or
//! update: a new document set means a new index built with a freshly
//! fitted embedder, which is what keeps the dimensionality constant for
//! the life of the index.

use ragkit_core::error::{Error, Result};
use ragkit_core::traits::{Embedder, VectorSearch};
use ragkit_core::types::ScoredChunk;

#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Chunks at or below this trimmed length are not indexed.
    pub min_chunk_len: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { min_chunk_len: 30 }
    }
}

struct IndexEntry {
    vector: Vec<f32>,
    text: String,
}

pub struct MemoryVectorIndex {
    embedder: Box<dyn Embedder>,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for MemoryVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryVectorIndex")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl MemoryVectorIndex {
    /// Build an index over `chunks`, fitting `embedder` on the valid set.
    ///
    /// Fails with `Error::EmptyInput` when no chunk survives the
    /// minimum-length filter; embedding failures surface as
    /// `Error::Operation`.
    pub fn build(
        chunks: &[String],
        mut embedder: Box<dyn Embedder>,
        cfg: &IndexConfig,
    ) -> Result<Self> {
        let valid: Vec<String> = chunks
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| c.chars().count() > cfg.min_chunk_len)
            .collect();
        if valid.is_empty() {
            return Err(Error::EmptyInput);
        }

        let vectors = embedder
            .embed_batch(&valid)
            .map_err(|e| Error::Operation(format!("embedding failed: {e}")))?;
        let dim = embedder.dim();
        let mut entries = Vec::with_capacity(valid.len());
        for (vector, text) in vectors.into_iter().zip(valid) {
            if vector.len() != dim {
                return Err(Error::Operation(format!(
                    "embedding dimension {} does not match index dimension {dim}",
                    vector.len()
                )));
            }
            entries.push(IndexEntry { vector, text });
        }
        Ok(Self { embedder, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.embedder.dim()
    }

    /// Top `k` stored chunks by cosine similarity to `text`, best first.
    pub fn query(&self, text: &str, k: usize) -> anyhow::Result<Vec<ScoredChunk>> {
        let query_vec = self.embedder.embed_query(text);
        let mut hits: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.text.clone(),
                score: cosine_similarity(&query_vec, &entry.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

impl VectorSearch for MemoryVectorIndex {
    fn query(&self, text: &str, k: usize) -> anyhow::Result<Vec<ScoredChunk>> {
        Self::query(self, text, k)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine similarity; 0.0 for mismatched dimensions or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
