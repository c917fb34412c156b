//! Domain types shared by the pipeline crates.

use serde::{Deserialize, Serialize};

/// A source document queued for indexing.
///
/// - `name`: filename or external source id
/// - `text`: raw extracted text (possibly empty when extraction failed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// A ranked hit returned by a vector index.
///
/// `score` is similarity under the index's metric; higher is always better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}
