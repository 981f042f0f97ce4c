//! Corpus chunking.
//!
//! Blank lines are the semantic boundary: each paragraph becomes one
//! passage. A paragraph longer than `chunk_size` characters falls back to a
//! sliding window with `overlap` characters shared between consecutive
//! windows, so no passage exceeds the size the embedding provider was sized
//! for.

use crate::models::Passage;
use crate::{RagError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// `overlap` must be strictly smaller than `chunk_size`, otherwise the
    /// sliding window could not advance.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(RagError::InvalidInput(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split `text` into passages. `source` is recorded as provenance on
    /// every passage, along with the byte offset of the chunk within `text`.
    ///
    /// Empty or all-whitespace input produces zero passages; the ingestion
    /// pipeline turns that into an `EmptyCorpus` error rather than an empty
    /// index.
    pub fn split(&self, text: &str, source: &str) -> Vec<Passage> {
        let mut passages = Vec::new();
        for (offset, para) in paragraph_spans(text) {
            if para.chars().count() <= self.chunk_size {
                passages.push(make_passage(para, source, offset));
            } else {
                self.window(para, source, offset, &mut passages);
            }
        }
        passages
    }

    /// Sliding-window fallback for a separator-free span longer than
    /// `chunk_size`. Consecutive windows share exactly `overlap` characters,
    /// except at the final boundary where the last window simply ends at the
    /// end of the span.
    fn window(&self, span: &str, source: &str, base_offset: usize, out: &mut Vec<Passage>) {
        // Byte position of every char boundary, plus the end of the span.
        let mut bounds: Vec<usize> = span.char_indices().map(|(i, _)| i).collect();
        bounds.push(span.len());
        let n_chars = bounds.len() - 1;

        let step = self.chunk_size - self.overlap;
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(n_chars);
            let piece = &span[bounds[start]..bounds[end]];
            out.push(make_passage(piece, source, base_offset + bounds[start]));
            if end == n_chars {
                break;
            }
            start += step;
        }
    }
}

fn make_passage(text: &str, source: &str, offset: usize) -> Passage {
    let mut metadata = BTreeMap::new();
    metadata.insert("source".to_string(), source.to_string());
    metadata.insert("offset".to_string(), offset.to_string());
    Passage::new(text.to_string(), metadata)
}

/// Paragraph spans of `text`: maximal runs of non-blank lines, with the byte
/// offset where each run starts. Blank (all-whitespace) lines separate
/// paragraphs and are never part of one.
fn paragraph_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut para_start: Option<usize> = None;
    let mut para_end = 0;
    let mut pos = 0;

    for line in text.split_inclusive('\n') {
        let blank = line.chars().all(char::is_whitespace);
        if blank {
            if let Some(start) = para_start.take() {
                spans.push((start, text[start..para_end].trim_end()));
            }
        } else {
            if para_start.is_none() {
                para_start = Some(pos);
            }
            para_end = pos + line.len();
        }
        pos += line.len();
    }
    if let Some(start) = para_start {
        spans.push((start, text[start..para_end].trim_end()));
    }
    spans
}
