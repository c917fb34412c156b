use ragkit_core::error::{BackendError, Error};
use ragkit_core::traits::{GenerativeBackend, VectorSearch};
use ragkit_core::types::{Document, ScoredChunk};
use ragkit_embed::TfidfEmbedder;
use ragkit_gen::generator::Generator;
use ragkit_pipeline::{content_hash, retrieve, PipelineConfig, RagSession};
use ragkit_vector::{IndexConfig, MemoryVectorIndex};

fn small_pipeline() -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    cfg.chunker.chunk_size = 200;
    cfg.chunker.min_chunk_len = 10;
    cfg.index.min_chunk_len = 10;
    cfg.retrieve_k = 3;
    cfg
}

/// Offline stand-in for a generative backend: answers with the context
/// sentence sharing the most words with the question.
struct ExtractiveBackend;

impl GenerativeBackend for ExtractiveBackend {
    fn generate(&self, prompt: &str, _model_id: &str) -> Result<String, BackendError> {
        let context = prompt
            .split("CONTEXT:")
            .nth(1)
            .and_then(|rest| rest.split("QUESTION:").next())
            .unwrap_or("");
        let question = prompt.split("QUESTION:").nth(1).unwrap_or("");
        let question_words: Vec<String> = question
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let best = context
            .split(['.', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .max_by_key(|sentence| {
                let lower = sentence.to_lowercase();
                question_words.iter().filter(|w| lower.contains(w.as_str())).count()
            })
            .unwrap_or("");
        Ok(format!("{best}."))
    }
}

#[test]
fn duplicate_chunks_collapse_in_the_context() {
    let chunks = vec![
        "apple pie recipe".to_string(),
        "apple pie recipe".to_string(),
        "banana bread instructions".to_string(),
    ];
    let index = MemoryVectorIndex::build(
        &chunks,
        Box::new(TfidfEmbedder::default()),
        &IndexConfig { min_chunk_len: 5 },
    )
    .unwrap();

    let context = retrieve(&index, "apple pie", 3);
    assert!(!context.is_empty());
    let parts: Vec<&str> = context.split("\n\n").collect();
    assert!(parts.len() <= 2, "duplicates must collapse: {parts:?}");
    let unique: std::collections::HashSet<&str> = parts.iter().copied().collect();
    assert_eq!(unique.len(), parts.len());
}

#[test]
fn retrieval_preserves_rank_order() {
    let chunks = vec![
        "the reactor cooling loop uses borated water".to_string(),
        "a gardening almanac covering tomatoes and squash".to_string(),
    ];
    let index = MemoryVectorIndex::build(
        &chunks,
        Box::new(TfidfEmbedder::default()),
        &IndexConfig { min_chunk_len: 5 },
    )
    .unwrap();

    let context = retrieve(&index, "reactor cooling water", 2);
    let parts: Vec<&str> = context.split("\n\n").collect();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("reactor"), "best match must come first: {parts:?}");
}

#[test]
fn retrieval_failures_collapse_to_empty_context() {
    struct FailingIndex;
    impl VectorSearch for FailingIndex {
        fn query(&self, _text: &str, _k: usize) -> anyhow::Result<Vec<ScoredChunk>> {
            anyhow::bail!("index not built")
        }
        fn len(&self) -> usize {
            0
        }
    }

    assert_eq!(retrieve(&FailingIndex, "anything", 3), "");
}

#[test]
fn content_hash_is_exact_match_only() {
    assert_eq!(content_hash("apple pie"), content_hash("apple pie"));
    assert_ne!(content_hash("apple pie"), content_hash("apple  pie"));
    assert_ne!(content_hash("apple pie"), content_hash("Apple pie"));
}

#[test]
fn ingest_rejects_document_sets_with_no_valid_chunks() {
    let mut session = RagSession::new(small_pipeline());
    let err = session.ingest(&[Document::new("empty.txt", "   ")]).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
    assert!(!session.is_indexed());
}

#[test]
fn session_rebuilds_wholesale_on_ingest_and_reset() {
    let mut session = RagSession::new(small_pipeline());
    session
        .ingest(&[Document::new(
            "a.txt",
            "The reactor manual describes cooling procedures in detail.",
        )])
        .unwrap();
    assert!(session.is_indexed());
    assert_eq!(session.sources(), ["a.txt"]);

    session
        .ingest(&[Document::new(
            "b.txt",
            "A gardening almanac covering tomatoes, beans, and squash.",
        )])
        .unwrap();
    assert_eq!(session.sources(), ["b.txt"], "ingest replaces the previous set");
    let context = session.context_for("cooling procedures");
    assert!(!context.contains("reactor"), "old documents must be gone after rebuild");

    session.reset();
    assert!(!session.is_indexed());
    assert_eq!(session.context_for("anything"), "");
}

#[test]
fn ask_reports_no_context_as_none() {
    let session = RagSession::new(small_pipeline());
    let generator = Generator::new(Box::new(ExtractiveBackend));
    let answer = session.ask("anything", &generator).unwrap();
    assert!(answer.is_none());
}

#[test]
fn end_to_end_sky_question_retrieves_and_answers_blue() {
    let mut cfg = PipelineConfig::default();
    cfg.chunker.min_chunk_len = 10;
    cfg.index.min_chunk_len = 10;
    let mut session = RagSession::new(cfg);
    session
        .ingest(&[Document::new("facts.txt", "The sky is blue. Water is wet.")])
        .unwrap();

    let context = session.context_for("What color is the sky?");
    assert!(context.contains("The sky is blue."), "context was: {context:?}");

    let generator = Generator::new(Box::new(ExtractiveBackend));
    let answer = session
        .ask("What color is the sky?", &generator)
        .unwrap()
        .expect("context must not be empty");
    assert!(answer.to_lowercase().contains("blue"), "answer was: {answer:?}");
}
