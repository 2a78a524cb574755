//! services/api/src/adapters/llm.rs
//!
//! This module contains the adapter for the text-generation LLM.
//! It implements the `GenerationClient` port from the `core` crate.
//!
//! The adapter is deliberately thin: prompt construction, retries, and
//! fallbacks all live in the core's generation orchestrator; this code only
//! ships one rendered prompt to an OpenAI-compatible API and hands the text
//! back.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use scholarmind_core::ports::{GenerationClient, GenerationError};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationClient` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `GenerationClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationClient for OpenAiGenerationAdapter {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| GenerationError(e.to_string()))?;

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| GenerationError(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(GenerationError(
                    "LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(GenerationError(
                "LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
