//! Prompt construction
//!
//! - [`PromptTemplate`] — evaluation, refinement and map-reduce prompts
//! - [`Persona`] — role instructions prepended by persona agents

pub mod persona;
pub mod template;

pub use persona::Persona;
pub use template::{CHUNK_FAILURE_PLACEHOLDER, PromptTemplate};
