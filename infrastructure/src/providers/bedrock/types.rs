//! Type conversions between the AWS Bedrock SDK and application types

use aws_sdk_bedrockruntime::types as bedrock;
use consensus_application::ProviderError;
use serde_json::{Value, json};

// ─── Bedrock → Application ──────────────────────────────────────

/// Concatenate every text block of a Converse output.
///
/// Non-text blocks (images, tool use, ...) are skipped.
pub fn output_text(output: &bedrock::ConverseOutput) -> String {
    match output {
        bedrock::ConverseOutput::Message(message) => message
            .content()
            .iter()
            .filter_map(|block| match block {
                bedrock::ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

/// Token usage as a JSON object for response metadata.
pub fn usage_json(usage: &bedrock::TokenUsage) -> Value {
    json!({
        "input_tokens": usage.input_tokens(),
        "output_tokens": usage.output_tokens(),
        "total_tokens": usage.total_tokens(),
    })
}

/// Convert a Bedrock SDK error to a ProviderError.
pub fn convert_converse_error(
    err: &aws_sdk_bedrockruntime::error::SdkError<
        aws_sdk_bedrockruntime::operation::converse::ConverseError,
    >,
) -> ProviderError {
    use aws_sdk_bedrockruntime::operation::converse::ConverseError;

    match err {
        aws_sdk_bedrockruntime::error::SdkError::ServiceError(service_err) => {
            match service_err.err() {
                ConverseError::ThrottlingException(e) => {
                    ProviderError::Other(format!("Bedrock throttled: {}", e))
                }
                ConverseError::ModelNotReadyException(e) => {
                    ProviderError::Other(format!("Bedrock model not ready: {}", e))
                }
                ConverseError::ValidationException(e) => {
                    ProviderError::InvalidResponse(format!("Bedrock validation error: {}", e))
                }
                ConverseError::ModelTimeoutException(_) => ProviderError::Timeout,
                other => ProviderError::Other(format!("Bedrock error: {:?}", other)),
            }
        }
        aws_sdk_bedrockruntime::error::SdkError::TimeoutError(_) => ProviderError::Timeout,
        other => ProviderError::ConnectionError(format!("Bedrock SDK error: {}", other)),
    }
}
