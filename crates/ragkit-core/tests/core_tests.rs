use std::fs;

use tempfile::TempDir;

use ragkit_core::chunker::{chunk_text, ChunkerConfig};
use ragkit_core::source::{load_directory, stage_bytes};

fn cfg(size: usize, overlap: usize, min: usize) -> ChunkerConfig {
    ChunkerConfig { chunk_size: size, chunk_overlap: overlap, min_chunk_len: min }
}

#[test]
fn empty_input_yields_no_chunks() {
    assert!(chunk_text("", &ChunkerConfig::default()).is_empty());
    assert!(chunk_text("   \n\n  ", &ChunkerConfig::default()).is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let text = "A paragraph that easily fits inside one chunk and is long enough to keep.";
    let chunks = chunk_text(text, &ChunkerConfig::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], text);
}

#[test]
fn chunks_never_exceed_target_size() {
    let sentence =
        "The quick brown fox jumps over the lazy dog and keeps running through the field. ";
    let text = sentence.repeat(40);
    let chunks = chunk_text(&text, &cfg(200, 40, 0));
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 200, "chunk too long: {chunk}");
    }
}

#[test]
fn sub_minimum_chunks_are_dropped() {
    let long = "many words fill this paragraph until it passes the limit";
    let text = format!("abc\n\n{long}");
    let chunks = chunk_text(&text, &cfg(50, 0, 20));
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(chunk.chars().count() > 20, "kept a sub-minimum chunk: {chunk}");
        assert_ne!(chunk, "abc");
    }
}

#[test]
fn chunking_covers_all_content() {
    let words: Vec<String> = (0..120).map(|i| format!("word{i}")).collect();
    let text = words.join(" ");
    let chunks = chunk_text(&text, &cfg(80, 20, 0));
    let joined = chunks.join(" ");
    for word in &words {
        assert!(joined.contains(word.as_str()), "missing {word}");
    }
    // every chunk is a contiguous span of the original text
    for chunk in &chunks {
        assert!(text.contains(chunk.as_str()), "not a span of the input: {chunk}");
    }
}

#[test]
fn consecutive_chunks_share_overlap() {
    let text = (0..40).map(|i| format!("w{i:02}")).collect::<Vec<_>>().join(" ");
    let chunks = chunk_text(&text, &cfg(40, 12, 0));
    assert!(chunks.len() >= 2, "expected several chunks, got {chunks:?}");
    for pair in chunks.windows(2) {
        let first_word = pair[1].split_whitespace().next().unwrap();
        assert!(
            pair[0].contains(first_word),
            "no overlap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn hard_cut_applies_when_no_separator_exists() {
    let text = "x".repeat(250);
    let chunks = chunk_text(&text, &cfg(100, 10, 0));
    assert!(chunks.len() >= 3);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 100);
    }
}

#[test]
fn load_directory_reads_txt_files_sorted() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("b.txt"), "bravo content").unwrap();
    fs::write(tmp.path().join("a.txt"), "alpha content").unwrap();
    fs::write(tmp.path().join("ignored.md"), "not text").unwrap();

    let docs = load_directory(tmp.path()).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name, "a.txt");
    assert_eq!(docs[0].text, "alpha content");
    assert_eq!(docs[1].name, "b.txt");
}

#[test]
fn load_directory_tolerates_invalid_utf8() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("weird.txt"), [b'o', b'k', 0xFF, b'!']).unwrap();

    let docs = load_directory(tmp.path()).unwrap();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].text.starts_with("ok"));
}

#[test]
fn plain_text_source_is_best_effort() {
    use ragkit_core::source::PlainTextSource;
    use ragkit_core::traits::TextSource;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("doc.txt");
    fs::write(&path, "extracted body").unwrap();
    assert_eq!(PlainTextSource.extract_text(&path), "extracted body");
    assert_eq!(PlainTextSource.extract_text(&tmp.path().join("missing.txt")), "");
}

#[test]
fn stage_bytes_removes_the_file_on_success() {
    let mut staged_path = None;
    stage_bytes(b"payload", ".pdf", |path| {
        assert_eq!(fs::read(path).unwrap(), b"payload");
        staged_path = Some(path.to_path_buf());
        Ok(())
    })
    .unwrap();
    assert!(!staged_path.unwrap().exists());
}

#[test]
fn stage_bytes_removes_the_file_on_error() {
    let mut staged_path = None;
    let result: anyhow::Result<()> = stage_bytes(b"payload", ".pdf", |path| {
        staged_path = Some(path.to_path_buf());
        anyhow::bail!("extraction blew up")
    });
    assert!(result.is_err());
    assert!(!staged_path.unwrap().exists());
}
