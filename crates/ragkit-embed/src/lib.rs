//! Statistical text embedder.
//!
//! TF-IDF over a bounded vocabulary of unigrams and adjacent bigrams,
//! fitted once per index lifetime. Batch vectors carry a small Gaussian
//! jitter so near-identical chunks never collapse to byte-identical
//! vectors; query vectors are the plain transform.

use std::collections::HashMap;

use rand::Rng;

use ragkit_core::traits::Embedder;

/// Common English terms excluded from the vocabulary.
const STOP_WORDS: [&str; 120] = [
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your", "yours", "yourself",
];

#[derive(Debug, Clone)]
pub struct EmbedConfig {
    /// Vocabulary cap; also the width of the unfit-query fallback vector.
    pub max_features: usize,
    /// Terms appearing in more than this fraction of documents are pruned.
    pub max_df: f32,
    /// Standard deviation of the Gaussian jitter added to batch vectors.
    pub jitter_std: f32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self { max_features: 1000, max_df: 0.95, jitter_std: 0.001 }
    }
}

struct Vocabulary {
    index: HashMap<String, usize>,
    idf: Vec<f32>,
}

pub struct TfidfEmbedder {
    cfg: EmbedConfig,
    vocab: Option<Vocabulary>,
}

impl Default for TfidfEmbedder {
    fn default() -> Self {
        Self::new(EmbedConfig::default())
    }
}

impl TfidfEmbedder {
    pub fn new(cfg: EmbedConfig) -> Self {
        Self { cfg, vocab: None }
    }

    pub fn vocabulary_contains(&self, term: &str) -> bool {
        self.vocab
            .as_ref()
            .is_some_and(|v| v.index.contains_key(term))
    }

    fn fit(&mut self, texts: &[String]) -> anyhow::Result<()> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| terms_of(&preprocess(t))).collect();
        let n_docs = docs.len();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, u64> = HashMap::new();
        for doc in &docs {
            let mut counts: HashMap<&str, u64> = HashMap::new();
            for term in doc {
                *counts.entry(term.as_str()).or_insert(0) += 1;
            }
            for (term, count) in counts {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
                *corpus_freq.entry(term.to_string()).or_insert(0) += count;
            }
        }
        if doc_freq.is_empty() {
            anyhow::bail!("empty vocabulary: no usable terms in {n_docs} document(s)");
        }

        let df_cap = self.cfg.max_df * n_docs as f32;
        let mut kept: Vec<(&String, usize)> = doc_freq
            .iter()
            .filter(|(_, df)| (**df as f32) <= df_cap)
            .map(|(term, df)| (term, *df))
            .collect();
        if kept.is_empty() {
            // A tiny corpus can put every term above the document-frequency
            // cap; keep the full vocabulary rather than failing the fit.
            tracing::debug!(n_docs, "document-frequency pruning skipped (would empty vocabulary)");
            kept = doc_freq.iter().map(|(term, df)| (term, *df)).collect();
        }
        kept.sort_by(|a, b| {
            let fa = corpus_freq.get(a.0).copied().unwrap_or(0);
            let fb = corpus_freq.get(b.0).copied().unwrap_or(0);
            fb.cmp(&fa).then_with(|| a.0.cmp(b.0))
        });
        kept.truncate(self.cfg.max_features);

        let mut index = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (i, (term, df)) in kept.iter().enumerate() {
            index.insert((*term).clone(), i);
            idf.push(((1 + n_docs) as f32 / (1 + df) as f32).ln() + 1.0);
        }
        self.vocab = Some(Vocabulary { index, idf });
        Ok(())
    }
}

impl Embedder for TfidfEmbedder {
    fn dim(&self) -> usize {
        match &self.vocab {
            Some(vocab) => vocab.idf.len(),
            None => self.cfg.max_features,
        }
    }

    fn is_fitted(&self) -> bool {
        self.vocab.is_some()
    }

    fn embed_batch(&mut self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        if self.vocab.is_none() {
            self.fit(texts)?;
        }
        let Some(vocab) = self.vocab.as_ref() else {
            anyhow::bail!("embedder failed to fit");
        };
        let mut rng = rand::thread_rng();
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let mut vector = transform(vocab, text);
            for x in &mut vector {
                *x += gaussian(&mut rng, self.cfg.jitter_std);
            }
            out.push(vector);
        }
        Ok(out)
    }

    fn embed_query(&self, text: &str) -> Vec<f32> {
        match self.vocab.as_ref() {
            Some(vocab) => transform(vocab, text),
            None => {
                tracing::warn!("embed_query before fit; returning a random fallback vector");
                let mut rng = rand::thread_rng();
                (0..self.cfg.max_features).map(|_| rng.gen::<f32>()).collect()
            }
        }
    }
}

/// Lowercase, strip everything but letters/digits/spaces, collapse runs of
/// whitespace.
fn preprocess(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                cleaned.push(lower);
            }
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unigrams plus adjacent bigrams, stop words removed before pairing.
fn terms_of(text: &str) -> Vec<String> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();
    let mut terms: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
    for pair in words.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

fn transform(vocab: &Vocabulary, text: &str) -> Vec<f32> {
    let mut vector = vec![0f32; vocab.idf.len()];
    for term in terms_of(&preprocess(text)) {
        if let Some(&i) = vocab.index.get(&term) {
            vector[i] += 1.0;
        }
    }
    for (i, x) in vector.iter_mut().enumerate() {
        *x *= vocab.idf[i];
    }
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Box-Muller draw from N(0, std_dev).
fn gaussian(rng: &mut impl Rng, std_dev: f32) -> f32 {
    let u1: f32 = rng.gen::<f32>().max(f32::MIN_POSITIVE);
    let u2: f32 = rng.gen();
    std_dev * (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}
