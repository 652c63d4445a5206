//! Document processing primitives
//!
//! - [`Tokenizer`] — approximate token accounting (implemented in infrastructure)
//! - [`Chunker`] / [`Chunk`] — overlapping token windows for map-reduce

pub mod chunker;
pub mod tokenizer;

pub use chunker::{
    Chunk, Chunker, ChunkingError, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, validate_window,
};
pub use tokenizer::{TokenId, Tokenizer};
