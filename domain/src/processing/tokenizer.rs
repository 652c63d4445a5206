//! Tokenizer abstraction used for chunking

/// Token id as produced by a BPE tokenizer
pub type TokenId = u32;

/// Approximate subword tokenizer.
///
/// Implementations need not match any particular backend's tokenizer; token
/// counts only have to be stable enough to bound chunk sizes.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<TokenId>;

    /// Decode a window of token ids back into text.
    ///
    /// Windows may start or end in the middle of a multi-byte character;
    /// implementations must still return the best textual rendering.
    fn decode(&self, tokens: &[TokenId]) -> String;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}
