//! Core domain concepts shared across all subdomains.
//!
//! - [`agent::AgentId`] — identity of one generation backend + model
//! - [`string`] — UTF-8 safe text helpers

pub mod agent;
pub mod string;
