//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Sampling temperature used for every grounded answer
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gemini-1.5-pro".to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: None,
            top_p: None,
            top_k: None,
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for generative model providers (e.g., Gemini)
///
/// Implementations perform a single round-trip per call. Nothing is retried
/// and no timeout is imposed here; callers see the provider's error as-is.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
