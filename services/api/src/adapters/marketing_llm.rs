//! services/api/src/adapters/marketing_llm.rs
//!
//! This module contains the adapter for one-shot promotional copy.
//! It implements the `MarketingCopyService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use bookstore_core::ports::{MarketingCopyService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MarketingCopyService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct LlmMarketingAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmMarketingAdapter {
    /// Creates a new `LlmMarketingAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `MarketingCopyService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MarketingCopyService for LlmMarketingAdapter {
    /// Generates a short social-media post about the given topic.
    async fn generate_marketing_copy(&self, topic: &str) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(format!(
                "Write a short, engaging social media post (max 100 words) for Kavithedal Publication about: {topic}. Use emojis and hashtags."
            ))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let copy = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "Could not generate content.".to_string());

        Ok(copy)
    }
}
