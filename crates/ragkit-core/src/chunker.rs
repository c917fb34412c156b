//! Recursive character chunker.
//!
//! Splits raw text on the coarsest separator available (paragraph break,
//! line break, sentence end, space) and only falls back to finer separators
//! or a hard character cut when a segment still exceeds the target size.
//! Adjacent splits are merged back together up to `chunk_size` characters,
//! carrying at most `chunk_overlap` trailing characters into the next
//! chunk. Lengths are measured in characters throughout.

const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_len: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { chunk_size: 800, chunk_overlap: 100, min_chunk_len: 50 }
    }
}

/// Split `text` into trimmed chunks. Chunks whose trimmed length does not
/// exceed `min_chunk_len` are dropped. Empty input yields an empty vec,
/// never an error.
pub fn chunk_text(text: &str, cfg: &ChunkerConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    split_recursive(text, &SEPARATORS, cfg)
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| char_len(c) > cfg.min_chunk_len)
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_recursive(text: &str, separators: &[&str], cfg: &ChunkerConfig) -> Vec<String> {
    let mut chosen = None;
    for (i, sep) in separators.iter().enumerate() {
        if text.contains(sep) {
            chosen = Some((*sep, &separators[i + 1..]));
            break;
        }
    }
    let Some((sep, rest)) = chosen else {
        return hard_cut(text, cfg);
    };

    let mut chunks = Vec::new();
    let mut fitting: Vec<&str> = Vec::new();
    for part in text.split(sep) {
        if char_len(part) <= cfg.chunk_size {
            fitting.push(part);
        } else {
            if !fitting.is_empty() {
                merge_splits(&fitting, sep, cfg, &mut chunks);
                fitting.clear();
            }
            chunks.extend(split_recursive(part, rest, cfg));
        }
    }
    if !fitting.is_empty() {
        merge_splits(&fitting, sep, cfg, &mut chunks);
    }
    chunks
}

/// Greedy merge of splits that individually fit, re-joined with the
/// separator they were split on. When a chunk fills up, trailing splits
/// totalling at most `chunk_overlap` characters seed the next one.
fn merge_splits(parts: &[&str], sep: &str, cfg: &ChunkerConfig, out: &mut Vec<String>) {
    let sep_len = char_len(sep);
    let joined_len = |window: &[&str]| -> usize {
        if window.is_empty() {
            return 0;
        }
        window.iter().map(|p| char_len(p)).sum::<usize>() + sep_len * (window.len() - 1)
    };

    let mut window: Vec<&str> = Vec::new();
    for &part in parts {
        let added = char_len(part) + if window.is_empty() { 0 } else { sep_len };
        if joined_len(&window) + added > cfg.chunk_size && !window.is_empty() {
            out.push(window.join(sep));
            while !window.is_empty()
                && (joined_len(&window) > cfg.chunk_overlap
                    || joined_len(&window) + char_len(part) + sep_len > cfg.chunk_size)
            {
                window.remove(0);
            }
        }
        window.push(part);
    }
    if !window.is_empty() {
        out.push(window.join(sep));
    }
}

/// Fixed-size character windows; last resort when no separator is left.
fn hard_cut(text: &str, cfg: &ChunkerConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= cfg.chunk_size {
        return vec![text.to_string()];
    }
    let step = cfg.chunk_size.saturating_sub(cfg.chunk_overlap).max(1);
    let mut out = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + cfg.chunk_size).min(chars.len());
        out.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    out
}
