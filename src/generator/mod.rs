//! External text generator interface
//!
//! The generator is an opaque capability: one prompt in, free text out,
//! with an explicit timeout/failure contract. Nothing here assumes the
//! response is well formed; the parser downstream degrades gracefully.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod anthropic;
mod error;

pub use anthropic::AnthropicGenerator;
pub use error::GeneratorError;

use crate::config::GeneratorConfig;

/// Opaque text-completion service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free text for a prompt. Failures and timeouts surface as
    /// GeneratorError; the caller does not retry.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Create a generator client based on the provider specified in config
pub fn create_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorError> {
    debug!(provider = %config.provider, model = %config.model, "create_generator: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicGenerator::from_config(config)?)),
        other => Err(GeneratorError::InvalidResponse(format!(
            "Unknown generator provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}
