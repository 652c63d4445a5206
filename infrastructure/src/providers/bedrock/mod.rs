//! AWS Bedrock Converse API provider
//!
//! Provides access to Bedrock-hosted models via AWS IAM authentication
//! through the Bedrock Converse API.

mod provider;
mod types;

pub use provider::{BEDROCK_PROVIDER, BedrockProvider};
