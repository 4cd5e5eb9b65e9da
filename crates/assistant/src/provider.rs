//! The seam to an external text-generation model.
//!
//! Concrete clients (hosted LLM APIs, local models) live outside this
//! workspace and are handed to the services as `Arc<dyn TextGenerator>`.

use async_trait::async_trait;

use crate::error::ProviderError;

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// Optional system message sent before the prompt.
    pub system: Option<String>,
    /// The user message.
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `request` and return the raw model text.
    async fn generate_text(&self, request: &PromptRequest) -> Result<String, ProviderError>;
}
