//! Recursive character text splitter.
//!
//! Text is cut on the first separator that occurs in it (paragraph, line,
//! word, then character), pieces that are still too long are split again with
//! the remaining separators, and the small pieces are merged back into chunks
//! of at most `chunk_size` characters that overlap by up to `chunk_overlap`.

use std::collections::VecDeque;

use serde::Serialize;

use super::loader::PageText;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A text chunk with source information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextChunk {
    /// The text content
    pub text: String,
    /// 1-based page number the chunk was cut from
    pub page: u32,
    /// Chunk index within the document
    pub chunk_index: usize,
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// `chunk_overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every page and number the chunks across the whole document.
    pub fn split_pages(&self, pages: &[PageText]) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        for page in pages {
            for text in self.split_text(&page.text) {
                chunks.push(TextChunk {
                    text,
                    page: page.page,
                    chunk_index: chunks.len(),
                });
            }
        }
        chunks
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().cloned().unwrap_or_default();
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate.clone();
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.clone();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator.as_str())
                .filter(|piece| !piece.is_empty())
                .map(String::from)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut short_splits: Vec<String> = Vec::new();
        for piece in splits {
            if char_len(&piece) < self.chunk_size {
                short_splits.push(piece);
                continue;
            }

            if !short_splits.is_empty() {
                chunks.extend(self.merge_splits(&short_splits, &separator));
                short_splits.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }
        if !short_splits.is_empty() {
            chunks.extend(self.merge_splits(&short_splits, &separator));
        }

        chunks
    }

    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner > self.chunk_size && !current.is_empty() {
                push_joined(&mut chunks, &current, separator);

                // Drop from the front until the kept tail fits the overlap
                // budget and leaves room for the incoming piece.
                loop {
                    let joiner = if current.is_empty() { 0 } else { separator_len };
                    let over_overlap = total > self.chunk_overlap;
                    let no_room = total > 0 && total + len + joiner > self.chunk_size;
                    if !over_overlap && !no_room {
                        break;
                    }
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(front);
                    if !current.is_empty() {
                        total -= separator_len;
                    }
                }
            }

            if !current.is_empty() {
                total += separator_len;
            }
            current.push_back(piece);
            total += len;
        }

        push_joined(&mut chunks, &current, separator);
        chunks
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(600, 100)
    }
}

fn push_joined(chunks: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, text: &str) -> PageText {
        PageText {
            page,
            text: text.to_string(),
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.split_text("hello world"), vec!["hello world"]);
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        let splitter = TextSplitter::default();
        assert!(splitter.split_text("   \n\n \n ").is_empty());
        assert!(splitter.split_text("").is_empty());
    }

    #[test]
    fn chunks_never_exceed_chunk_size() {
        let splitter = TextSplitter::new(100, 20);
        let text = "This is a test sentence with several words. ".repeat(40);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let splitter = TextSplitter::new(50, 15);
        let words: Vec<String> = (0..60).map(|i| format!("w{:02}", i)).collect();
        let text = words.join(" ");
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap();
            assert!(
                pair[1].contains(last_word),
                "expected {:?} to carry over into {:?}",
                last_word,
                pair[1]
            );
        }
    }

    #[test]
    fn paragraphs_are_preferred_split_points() {
        let splitter = TextSplitter::new(40, 0);
        let text = "First paragraph is here.\n\nSecond paragraph is here.";
        let chunks = splitter.split_text(text);

        assert_eq!(
            chunks,
            vec!["First paragraph is here.", "Second paragraph is here."]
        );
    }

    #[test]
    fn unbroken_text_falls_back_to_characters() {
        let splitter = TextSplitter::new(10, 2);
        let text = "x".repeat(35);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() >= 4);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn multibyte_text_is_measured_in_characters() {
        let splitter = TextSplitter::new(5, 0);
        let chunks = splitter.split_text("ああああああああああ");
        assert_eq!(chunks, vec!["あああああ", "あああああ"]);
    }

    #[test]
    fn split_pages_keeps_page_numbers_and_global_index() {
        let splitter = TextSplitter::new(20, 0);
        let pages = vec![page(1, "alpha beta"), page(2, ""), page(3, "gamma delta")];
        let chunks = splitter.split_pages(&pages);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].page, 3);
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn overlap_is_clamped_below_chunk_size() {
        let splitter = TextSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap(), 9);
        assert_eq!(splitter.chunk_size(), 10);
    }
}
