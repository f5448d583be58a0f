//! Content chunking for RAG retrieval.
//!
//! Text is split recursively: first on paragraph breaks, then line breaks,
//! then spaces, and finally between characters, until every piece fits the
//! chunk size. Neighbouring pieces are then merged back into chunks of at most
//! `chunk_size` characters, each sharing up to `chunk_overlap` characters with
//! the previous one.

use ricewise_config::DocumentsConfig;
use ricewise_core::{ChunkMetadata, DocumentChunk};
use std::collections::VecDeque;

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum size of each chunk in characters.
    pub chunk_size: usize,
    /// Number of characters to overlap between chunks.
    pub chunk_overlap: usize,
    /// Separators tried in order; an empty separator splits between characters.
    pub separators: Vec<String>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: default_separators(),
        }
    }
}

impl ChunkConfig {
    /// Create config from document settings.
    pub fn from_documents_config(config: &DocumentsConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separators: default_separators(),
        }
    }
}

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect()
}

/// Content chunker for splitting text.
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Create a chunker with default configuration.
    pub fn default_chunker() -> Self {
        Self::new(ChunkConfig::default())
    }

    /// Split one page of a document into chunks carrying their origin.
    pub fn chunk_page(&self, source: &str, page: u32, text: &str) -> Vec<DocumentChunk> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(i, content)| {
                DocumentChunk::new(
                    content,
                    ChunkMetadata {
                        source: source.to_string(),
                        page,
                        chunk_index: i as u32,
                    },
                )
            })
            .collect()
    }

    /// Split text into chunk strings.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.config.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Use the first separator present in the text; the rest are for
        // pieces that are still too long.
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.config.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_pieces(&fitting));
                fitting.clear();
            }

            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting));
        }

        chunks
    }

    /// Merge small pieces into chunks, carrying an overlap window forward.
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.config.chunk_size && !current.is_empty() {
                if let Some(chunk) = join_trimmed(&current) {
                    chunks.push(chunk);
                }

                // Drop from the front until only the overlap window remains
                // and the next piece fits.
                while total > self.config.chunk_overlap
                    || (total + len > self.config.chunk_size && total > 0)
                {
                    match current.pop_front() {
                        Some(dropped) => total -= char_len(dropped),
                        None => break,
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&current) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// Split text so each separator stays attached to the start of the piece after it.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
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

fn join_trimmed(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, chunk_overlap: usize) -> Chunker {
        Chunker::new(ChunkConfig {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
        })
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunker = Chunker::default_chunker();
        let chunks = chunker.split_text("Rice blast is caused by a fungus.");

        assert_eq!(chunks, vec!["Rice blast is caused by a fungus.".to_string()]);
    }

    #[test]
    fn test_overlap_between_words() {
        let chunks = chunker(10, 5).split_text("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);

        let chunks = chunker(10, 3).split_text("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let text = "Bacterial leaf blight spreads through irrigation water. \
                    Symptoms start at the leaf tips.\n\nBrown spot is linked to poor soils. \
                    Apply balanced fertilizer.\nLeaf scald shows zonate lesions."
            .repeat(20);

        for chunk in chunker(120, 30).split_text(&text) {
            assert!(chunk.chars().count() <= 120, "chunk too long: {}", chunk.len());
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let text = "First paragraph about seedlings.\n\nSecond paragraph about harvest.";
        let chunks = chunker(40, 0).split_text(text);
        assert_eq!(
            chunks,
            vec!["First paragraph about seedlings.", "Second paragraph about harvest."]
        );
    }

    #[test]
    fn test_unbroken_text_splits_by_character() {
        let text = "x".repeat(25);
        let chunks = chunker(10, 2).split_text(&text);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
    }

    #[test]
    fn test_utf8_text() {
        let text = "稲のいもち病は糸状菌によって引き起こされる病気です。".repeat(10);
        let chunks = chunker(30, 5).split_text(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30);
        }
    }

    #[test]
    fn test_empty_text() {
        let chunker = Chunker::default_chunker();
        assert!(chunker.split_text("").is_empty());
        assert!(chunker.split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn test_chunk_page_metadata() {
        let chunks = chunker(10, 0).chunk_page("papers/a.pdf", 3, "aaaa bbbb cccc dddd");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.source, "papers/a.pdf");
        assert_eq!(chunks[0].metadata.page, 3);
        assert_eq!(chunks[1].metadata.chunk_index, 1);
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(split_keeping_separator("a b c", " "), vec!["a", " b", " c"]);
        assert_eq!(split_keeping_separator(" a", " "), vec![" a"]);
        assert_eq!(split_keeping_separator("ab", ""), vec!["a", "b"]);
    }
}
