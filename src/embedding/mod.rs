//! Embedding services.

pub mod embedder;

use std::sync::Arc;

pub use embedder::{EmbedFuture, Embedder, OllamaEmbedder, OpenAiEmbedder, RigEmbedder, Vector};

use crate::core::config::{EmbeddingConfig, Provider};
use crate::core::errors::ChatResult;

/// Build the embedder selected by the configuration.
///
/// # Errors
/// Returns an error if the selected client cannot be created.
pub fn from_config(config: &EmbeddingConfig) -> ChatResult<Arc<dyn Embedder>> {
    Ok(match config.provider {
        Provider::OpenAi => Arc::new(OpenAiEmbedder::openai(config)?),
        Provider::Ollama => Arc::new(OllamaEmbedder::ollama(config)?),
    })
}
