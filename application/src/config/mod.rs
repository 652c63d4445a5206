//! Application-level configuration.
//!
//! Static parameters that control how use cases behave:
//!
//! - [`OrchestrationParams`] — iteration cap and consensus threshold
//! - [`ChunkingParams`] — token windows for document processing

pub mod chunking_params;
pub mod orchestration_params;

pub use chunking_params::ChunkingParams;
pub use orchestration_params::OrchestrationParams;
