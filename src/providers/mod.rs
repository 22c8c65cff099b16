mod open_ai;
pub mod prompt;

pub use open_ai::OpenAIProvider;
pub use prompt::{build_normalizer_prompt, NORMALIZER_PROMPT_TEMPLATE};

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for language model providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Send a single user-role prompt and return the completion text
    async fn complete(&self, prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}
