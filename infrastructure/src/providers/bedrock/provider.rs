//! Bedrock provider
//!
//! Handles AWS credential initialization and single-turn Converse calls.

use super::types;
use crate::config::FileBedrockConfig;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types as bedrock;
use consensus_application::{Generation, LlmProvider, ProviderError};
use tracing::{debug, info, warn};

pub const BEDROCK_PROVIDER: &str = "bedrock";

pub struct BedrockProvider {
    client: BedrockClient,
    region: String,
    max_tokens: i32,
}

impl BedrockProvider {
    /// Create a new Bedrock provider.
    ///
    /// Initializes AWS credentials and creates a Bedrock Runtime client.
    pub async fn new(config: &FileBedrockConfig) -> Self {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref profile) = config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;
        info!(region = %config.region, "Bedrock provider initialized");

        Self {
            client: BedrockClient::new(&aws_config),
            region: config.region.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        BEDROCK_PROVIDER
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError> {
        let message = bedrock::Message::builder()
            .role(bedrock::ConversationRole::User)
            .content(bedrock::ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to build message: {}", e)))?;

        debug!(model, region = %self.region, "Calling Bedrock Converse API");

        let response = self
            .client
            .converse()
            .model_id(model)
            .messages(message)
            .inference_config(
                bedrock::InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| types::convert_converse_error(&e))?;

        let output = response.output().ok_or_else(|| {
            ProviderError::InvalidResponse("No output in Bedrock response".to_string())
        })?;

        let content = types::output_text(output);
        if content.is_empty() {
            warn!(model, "Bedrock returned no text content");
        }

        let mut generation = Generation::new(content).with_metadata(
            "stop_reason",
            serde_json::Value::from(response.stop_reason().as_str()),
        );
        if let Some(usage) = response.usage() {
            generation = generation.with_metadata("usage", types::usage_json(usage));
        }
        Ok(generation)
    }

    /// Credentials resolve lazily inside the SDK; failures surface per call.
    fn is_configured(&self) -> bool {
        true
    }
}
