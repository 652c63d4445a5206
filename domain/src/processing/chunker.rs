//! Token-bounded document chunking
//!
//! Splits a document into overlapping windows of at most `chunk_size`
//! tokens. Window `k` starts at token `k * (chunk_size - overlap)`.
//!
//! ```text
//! tokens:  |0 ................................................ N|
//! chunk 0: [0, size)
//! chunk 1:        [size - overlap, 2*size - overlap)
//! chunk 2:                [2*(size - overlap), ...)     (last may be shorter)
//! ```

use super::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Default window size in tokens
pub const DEFAULT_CHUNK_SIZE: usize = 4000;
/// Default overlap between consecutive windows in tokens
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    OverlapTooLarge { chunk_size: usize, overlap: usize },
}

/// One window of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position in the document
    pub index: usize,
    pub content: String,
    pub token_count: usize,
    /// Filled in by the map phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Chunk {
    pub fn new(index: usize, content: impl Into<String>, token_count: usize) -> Self {
        Self {
            index,
            content: content.into(),
            token_count,
            result: None,
        }
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }
}

/// Splits text into token-bounded, overlapping chunks.
#[derive(Clone)]
pub struct Chunker {
    tokenizer: Arc<dyn Tokenizer>,
}

impl Chunker {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Approximate token count of `text`.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count(text)
    }

    /// Split `text` into windows of at most `chunk_size` tokens.
    ///
    /// Text that already fits is returned verbatim as a single chunk.
    /// `overlap` must be strictly smaller than `chunk_size`, otherwise the
    /// window would never advance.
    pub fn split(
        &self,
        text: &str,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<Vec<Chunk>, ChunkingError> {
        validate_window(chunk_size, overlap)?;

        let tokens = self.tokenizer.encode(text);
        if tokens.len() <= chunk_size {
            return Ok(vec![Chunk::new(0, text, tokens.len())]);
        }

        let stride = chunk_size - overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            let end = (start + chunk_size).min(tokens.len());
            let window = &tokens[start..end];
            chunks.push(Chunk::new(
                chunks.len(),
                self.tokenizer.decode(window),
                window.len(),
            ));

            if end == tokens.len() {
                break;
            }
            start += stride;
        }

        Ok(chunks)
    }
}

/// Check that a window configuration makes forward progress.
pub fn validate_window(chunk_size: usize, overlap: usize) -> Result<(), ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::ZeroChunkSize);
    }
    if overlap >= chunk_size {
        return Err(ChunkingError::OverlapTooLarge {
            chunk_size,
            overlap,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::tokenizer::TokenId;
    use std::sync::Mutex;

    /// One token per whitespace-separated word; ids index into a shared vocabulary.
    #[derive(Default)]
    struct WordTokenizer {
        vocab: Mutex<Vec<String>>,
    }

    impl Tokenizer for WordTokenizer {
        fn encode(&self, text: &str) -> Vec<TokenId> {
            let mut vocab = self.vocab.lock().unwrap();
            text.split_whitespace()
                .map(|word| match vocab.iter().position(|w| w == word) {
                    Some(i) => i as TokenId,
                    None => {
                        vocab.push(word.to_string());
                        (vocab.len() - 1) as TokenId
                    }
                })
                .collect()
        }

        fn decode(&self, tokens: &[TokenId]) -> String {
            let vocab = self.vocab.lock().unwrap();
            tokens
                .iter()
                .map(|&t| vocab[t as usize].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    fn chunker() -> Chunker {
        Chunker::new(Arc::new(WordTokenizer::default()))
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_small_text_is_single_verbatim_chunk() {
        let text = "  keep   the original\nspacing ";
        let chunks = chunker().split(text, 10, 2).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].token_count, 4);
    }

    #[test]
    fn test_text_exactly_chunk_size_is_not_split() {
        let chunks = chunker().split(&words(10), 10, 3).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_windows_overlap_and_cover_everything() {
        // 10 tokens, size 4, overlap 1 -> starts 0, 3, 6 ; last window [6, 10)
        let chunks = chunker().split(&words(10), 4, 1).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "w0 w1 w2 w3");
        assert_eq!(chunks[1].content, "w3 w4 w5 w6");
        assert_eq!(chunks[2].content, "w6 w7 w8 w9");
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_last_window_may_be_shorter() {
        // 11 tokens, size 4, no overlap -> [0,4) [4,8) [8,11)
        let chunks = chunker().split(&words(11), 4, 0).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].content, "w8 w9 w10");
        assert_eq!(chunks[2].token_count, 3);
    }

    #[test]
    fn test_overlap_not_smaller_than_size_rejected() {
        let c = chunker();
        assert_eq!(
            c.split(&words(20), 4, 4),
            Err(ChunkingError::OverlapTooLarge {
                chunk_size: 4,
                overlap: 4
            })
        );
        assert!(c.split(&words(20), 4, 9).is_err());
        // Rejected even when the text would fit in one chunk
        assert!(c.split("tiny", 4, 5).is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert_eq!(
            chunker().split("a b c", 0, 0),
            Err(ChunkingError::ZeroChunkSize)
        );
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(chunker().count_tokens(&words(7)), 7);
        assert_eq!(chunker().count_tokens(""), 0);
    }
}
