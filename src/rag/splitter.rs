//! Recursive character text splitting.
//!
//! Text is cut on the coarsest separator present (paragraphs, then lines,
//! then words, then characters), and the pieces are greedily merged back into
//! chunks of at most `chunk_size` characters. Each new chunk starts with up to
//! `chunk_overlap` characters carried over from the end of the previous one.

use std::collections::VecDeque;

use crate::core::config::RagConfig;

pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (idx, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[idx + 1..];
                break;
            }
        }

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keep_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                if let Some(chunk) = trimmed(piece) {
                    final_chunks.push(chunk);
                }
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    // Separators stay attached to their pieces, so merging joins with "".
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in splits {
            let len = char_len(piece);
            if total + len > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join_trimmed(&current) {
                    docs.push(doc);
                }
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(front);
                }
            }
            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_trimmed(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for RecursiveTextSplitter {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl TextSplitter for RecursiveTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }
}

/// Splits so that every occurrence of `separator` begins the following piece.
fn split_keep_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(idx, ch)| &text[idx..idx + ch.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join_trimmed(parts: &VecDeque<&str>) -> Option<String> {
    let joined: String = parts.iter().copied().collect();
    trimmed(&joined)
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_trimmed_chunk() {
        let splitter = RecursiveTextSplitter::new(1000, 100);
        let chunks = splitter.split_text("  A short page of text.\n");
        assert_eq!(chunks, vec!["A short page of text."]);
    }

    #[test]
    fn blank_text_yields_no_chunks() {
        let splitter = RecursiveTextSplitter::default();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn words_merge_with_overlap() {
        let splitter = RecursiveTextSplitter::new(20, 8);
        let chunks =
            splitter.split_text("one two three four five six seven eight nine ten");
        assert_eq!(
            chunks,
            vec![
                "one two three four",
                "four five six seven",
                "seven eight nine",
                "nine ten",
            ]
        );
    }

    #[test]
    fn paragraphs_are_preferred_boundaries() {
        let first = "a".repeat(60);
        let second = "b".repeat(60);
        let splitter = RecursiveTextSplitter::new(100, 10);
        let chunks = splitter.split_text(&format!("{}\n\n{}", first, second));
        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn long_text_respects_chunk_size_and_overlaps() {
        let text = (0..600)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let splitter = RecursiveTextSplitter::new(1000, 100);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split(' ').last().unwrap();
            assert!(pair[1].contains(tail_word));
        }
    }

    #[test]
    fn unbroken_text_falls_back_to_characters() {
        let text = "x".repeat(25);
        let splitter = RecursiveTextSplitter::new(10, 2);
        let chunks = splitter.split_text(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn multibyte_text_is_measured_in_characters() {
        let text = "é".repeat(15);
        let splitter = RecursiveTextSplitter::new(10, 0);
        let chunks = splitter.split_text(&text);
        assert_eq!(chunks, vec!["é".repeat(10), "é".repeat(5)]);
    }

    #[test]
    fn overlap_is_clamped_below_chunk_size() {
        let splitter = RecursiveTextSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap(), 9);
        assert_eq!(splitter.chunk_size(), 10);
    }
}
