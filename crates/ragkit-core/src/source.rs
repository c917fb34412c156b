//! Document loading and on-disk staging.

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::traits::TextSource;
use crate::types::Document;

/// Plain-text source: the trivial member of the `TextSource` family.
/// PDF/DOCX extractors plug in behind the same trait.
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract_text(&self, path: &Path) -> String {
        read_text_lossy(path).unwrap_or_default()
    }
}

/// Read a file as UTF-8, falling back to lossy conversion for files with
/// invalid sequences.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

/// Collect `.txt` files under `root` in sorted order.
pub fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

/// Load every `.txt` document under `dir`. Unreadable files are skipped
/// with a warning; documents whose extracted text is empty are kept so the
/// caller can report them.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in list_txt_files(dir) {
        let text = match read_text_lossy(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(Document::new(name, text));
    }
    Ok(documents)
}

/// Stage raw bytes in a named temporary file and hand the path to `f`.
/// The file is removed when this returns, on success and on error alike.
pub fn stage_bytes<T>(
    bytes: &[u8],
    suffix: &str,
    f: impl FnOnce(&Path) -> Result<T>,
) -> Result<T> {
    let mut staged = tempfile::Builder::new().suffix(suffix).tempfile()?;
    staged.write_all(bytes)?;
    staged.flush()?;
    f(staged.path())
}
