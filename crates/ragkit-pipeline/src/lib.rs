//! Retrieval pipeline: an over-fetching retriever with exact-content
//! deduplication, and the per-session context object that owns one fitted
//! embedder + vector index pair.

use std::collections::HashSet;
use std::hash::Hasher;

use ragkit_core::chunker::{chunk_text, ChunkerConfig};
use ragkit_core::error::Result;
use ragkit_core::traits::VectorSearch;
use ragkit_core::types::Document;
use ragkit_embed::{EmbedConfig, TfidfEmbedder};
use ragkit_gen::generator::Generator;
use ragkit_vector::{IndexConfig, MemoryVectorIndex};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunker: ChunkerConfig,
    pub embed: EmbedConfig,
    pub index: IndexConfig,
    /// Unique chunks per retrieved context block.
    pub retrieve_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            embed: EmbedConfig::default(),
            index: IndexConfig::default(),
            retrieve_k: 6,
        }
    }
}

/// Hash used for exact-content deduplication. Near-duplicate chunks that
/// are not byte-identical hash differently and are kept.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(text.as_bytes());
    hasher.finish()
}

/// Retrieve a combined context block for `query`.
///
/// Over-fetches twice the requested count, drops exact duplicates by
/// content hash, and joins the first `k` unique chunks in rank order with
/// blank lines. Failures collapse to an empty context: "no relevant
/// information found", not an error.
pub fn retrieve(index: &dyn VectorSearch, query: &str, k: usize) -> String {
    match try_retrieve(index, query, k) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, "retrieval failed, returning empty context");
            String::new()
        }
    }
}

fn try_retrieve(index: &dyn VectorSearch, query: &str, k: usize) -> anyhow::Result<String> {
    let hits = index.query(query, k * 2)?;
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for hit in hits {
        if seen.insert(content_hash(&hit.text)) {
            unique.push(hit.text);
        }
        if unique.len() >= k {
            break;
        }
    }
    Ok(unique.join("\n\n"))
}

/// One document set's worth of retrieval state.
///
/// Owns the fitted embedder and the index together, so vector
/// dimensionality stays constant for the life of the index. `ingest`
/// replaces both wholesale; there is no incremental update.
pub struct RagSession {
    cfg: PipelineConfig,
    index: Option<MemoryVectorIndex>,
    sources: Vec<String>,
}

impl RagSession {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self { cfg, index: None, sources: Vec::new() }
    }

    /// Chunk and index `documents`, replacing any previous index. Returns
    /// the number of chunks indexed. Documents with empty text are
    /// skipped; fails with `Error::EmptyInput` when no chunk survives the
    /// validity filters.
    pub fn ingest(&mut self, documents: &[Document]) -> Result<usize> {
        let mut chunks = Vec::new();
        let mut sources = Vec::new();
        for doc in documents {
            if doc.text.trim().is_empty() {
                continue;
            }
            let doc_chunks = chunk_text(&doc.text, &self.cfg.chunker);
            if doc_chunks.is_empty() {
                continue;
            }
            chunks.extend(doc_chunks);
            sources.push(doc.name.clone());
        }
        let embedder = Box::new(TfidfEmbedder::new(self.cfg.embed.clone()));
        let index = MemoryVectorIndex::build(&chunks, embedder, &self.cfg.index)?;
        let count = index.len();
        self.index = Some(index);
        self.sources = sources;
        Ok(count)
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Names of the documents behind the current index.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Drop the current index; the next `ingest` starts fresh.
    pub fn reset(&mut self) {
        self.index = None;
        self.sources.clear();
    }

    /// Retrieved context for `question`, or an empty string when nothing
    /// is indexed or retrieval fails.
    pub fn context_for(&self, question: &str) -> String {
        match &self.index {
            Some(index) => retrieve(index, question, self.cfg.retrieve_k),
            None => {
                tracing::warn!("context requested before any document was ingested");
                String::new()
            }
        }
    }

    /// Answer `question` from the indexed documents. `Ok(None)` means no
    /// relevant context was found; the caller decides how to phrase that.
    pub fn ask(&self, question: &str, generator: &Generator) -> Result<Option<String>> {
        let context = self.context_for(question);
        if context.trim().is_empty() {
            return Ok(None);
        }
        generator.answer(&context, question).map(Some)
    }
}
