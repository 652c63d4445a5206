//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod evaluate;
pub mod process_document;
pub mod run_consensus;
pub mod session_details;
