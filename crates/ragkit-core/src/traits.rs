use std::path::Path;

use crate::error::BackendError;
use crate::types::ScoredChunk;

pub trait Embedder: Send + Sync {
    /// Output dimensionality: the fitted vocabulary size, or the configured
    /// fallback width before fitting.
    fn dim(&self) -> usize;
    fn is_fitted(&self) -> bool;
    /// Fits the model on the first call, transforms on every call.
    fn embed_batch(&mut self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
    /// Never fails: before fitting it degrades to a random vector.
    fn embed_query(&self, text: &str) -> Vec<f32>;
}

pub trait VectorSearch: Send + Sync {
    fn query(&self, text: &str, k: usize) -> anyhow::Result<Vec<ScoredChunk>>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait GenerativeBackend: Send + Sync {
    fn generate(&self, prompt: &str, model_id: &str) -> Result<String, BackendError>;
}

/// Opaque record sink/source. Never a concurrency primitive.
pub trait DocumentStore: Send + Sync {
    fn insert(&mut self, record: serde_json::Value) -> anyhow::Result<String>;
    fn find(&self, filter: &serde_json::Value) -> anyhow::Result<Vec<serde_json::Value>>;
}

pub trait TextSource: Send + Sync {
    /// Best-effort extraction; returns an empty string on total failure.
    fn extract_text(&self, path: &Path) -> String;
}
