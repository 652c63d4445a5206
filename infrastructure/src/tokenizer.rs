//! BPE tokenizer backed by tiktoken
//!
//! Uses the `cl100k_base` encoding. None of the backends share it exactly,
//! but it bounds chunk sizes closely enough for every model we talk to.

use consensus_domain::{TokenId, Tokenizer};
use thiserror::Error;
use tiktoken_rs::{CoreBPE, cl100k_base};
use tracing::debug;

/// A window boundary can split a character across at most this many tokens
const MAX_PARTIAL_TOKENS: usize = 3;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Failed to load tokenizer encoding: {0}")]
    Load(String),
}

pub struct TiktokenTokenizer {
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = cl100k_base().map_err(|e| TokenizerError::Load(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Decode token by token, dropping fragments that never form valid UTF-8.
    fn decode_lossy(&self, tokens: &[TokenId]) -> String {
        let mut out = String::new();
        let mut pending = Vec::new();

        for &token in tokens {
            pending.push(token as _);
            loop {
                match self.bpe.decode(pending.clone()) {
                    Ok(text) => {
                        out.push_str(&text);
                        pending.clear();
                        break;
                    }
                    Err(_) if pending.len() > MAX_PARTIAL_TOKENS => {
                        pending.remove(0);
                    }
                    Err(_) => break,
                }
            }
        }

        // Whatever is left: drop undecodable fragments, keep every span that decodes
        let mut dropped = 0;
        let mut start = 0;
        while start < pending.len() {
            let decoded = (start + 1..=pending.len()).rev().find_map(|end| {
                self.bpe
                    .decode(pending[start..end].to_vec())
                    .ok()
                    .map(|text| (end, text))
            });
            match decoded {
                Some((end, text)) => {
                    out.push_str(&text);
                    start = end;
                }
                None => {
                    dropped += 1;
                    start += 1;
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "Dropped partial tokens at window edge");
        }
        out
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<TokenId> {
        self.bpe
            .encode_with_special_tokens(text)
            .into_iter()
            .map(|t| t as TokenId)
            .collect()
    }

    fn decode(&self, tokens: &[TokenId]) -> String {
        match self.bpe.decode(tokens.iter().map(|&t| t as _).collect()) {
            Ok(text) => text,
            Err(_) => self.decode_lossy(tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::Chunker;
    use std::sync::Arc;

    fn tokenizer() -> TiktokenTokenizer {
        TiktokenTokenizer::new().unwrap()
    }

    #[test]
    fn test_encode_decode_ascii() {
        let t = tokenizer();
        let text = "The quick brown fox jumps over the lazy dog.";
        let tokens = t.encode(text);
        assert!(!tokens.is_empty());
        assert!(tokens.len() < text.len());
        assert_eq!(t.decode(&tokens), text);
        assert_eq!(t.count(text), tokens.len());
    }

    #[test]
    fn test_decode_window_splitting_multibyte_chars() {
        let t = tokenizer();
        let text = "合意形成のためのエージェント評価";
        let tokens = t.encode(text);

        // Every sub-window decodes to valid text without panicking
        for start in 0..tokens.len() {
            for end in start + 1..=tokens.len() {
                let decoded = t.decode(&tokens[start..end]);
                assert!(decoded.chars().all(|c| c != '\u{FFFD}'));
            }
        }
    }

    #[test]
    fn test_decode_keeps_complete_tokens_after_leading_fragment() {
        let t = tokenizer();
        let text = "合意形成のためのエージェント評価 ok go";
        let tokens = t.encode(text);

        for start in 0..tokens.len() {
            for end in start + 1..=tokens.len() {
                let Ok(last) = t.bpe.decode(vec![tokens[end - 1] as _]) else {
                    continue;
                };
                let decoded = t.decode(&tokens[start..end]);
                assert!(
                    decoded.ends_with(&last),
                    "window {start}..{end} decoded to {decoded:?}, lost {last:?}"
                );
            }
        }
    }

    #[test]
    fn test_chunker_with_tiktoken() {
        let chunker = Chunker::new(Arc::new(tokenizer()));
        let text = "word ".repeat(100);

        let chunks = chunker.split(&text, 30, 5).unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.token_count <= 30));
        assert_eq!(chunks.last().unwrap().index, chunks.len() - 1);
    }
}
