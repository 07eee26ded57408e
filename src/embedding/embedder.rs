//! Embedding model abstraction and its Rig implementation.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client as ReqwestClient;
use rig::client::{EmbeddingsClient, Nothing};
use rig::embeddings::EmbeddingModel;
use rig::providers::{ollama, openai};
use tracing::debug;

use crate::core::config::{EmbeddingConfig, OPENAI_API_KEY_ENV};
use crate::core::errors::{ChatError, ChatResult};

/// Boxed future type for embedder operations.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fixed-dimension embedding vector.
pub type Vector = Vec<f64>;

/// Trait abstraction over embedding services.
pub trait Embedder: Send + Sync {
    /// Embed multiple texts; the result has one vector per input, in input order.
    ///
    /// # Errors
    /// Returns an error if the embedding request fails.
    fn embed_texts(&self, texts: Vec<String>) -> EmbedFuture<'_, ChatResult<Vec<Vector>>>;
    /// Return embedding dimensionality.
    fn ndims(&self) -> usize;

    /// Embed a single text string.
    ///
    /// # Errors
    /// Returns an error if the embedding request fails or returns nothing.
    fn embed_text(&self, text: &str) -> EmbedFuture<'_, ChatResult<Vector>> {
        let text = text.to_string();
        Box::pin(async move {
            let mut vectors = self.embed_texts(vec![text]).await?;
            let got = vectors.len();
            match vectors.pop() {
                Some(vector) if got == 1 => Ok(vector),
                _ => Err(ChatError::EmbeddingMismatch { expected: 1, got }),
            }
        })
    }
}

/// Embedder over any Rig embedding model, sending at most `batch_size` texts per request.
#[derive(Clone)]
pub struct RigEmbedder<M> {
    model: M,
    ndims: usize,
    batch_size: usize,
}

/// Rig embedder backed by a local Ollama server.
pub type OllamaEmbedder = RigEmbedder<ollama::EmbeddingModel<ReqwestClient>>;
/// Rig embedder backed by the OpenAI `/embeddings` endpoint.
pub type OpenAiEmbedder = RigEmbedder<openai::EmbeddingModel<ReqwestClient>>;

impl<M: EmbeddingModel> RigEmbedder<M> {
    fn with_model(model: M, config: &EmbeddingConfig) -> Self {
        Self {
            model,
            ndims: config.ndims,
            batch_size: config.batch_size.clamp(1, M::MAX_DOCUMENTS.max(1)),
        }
    }
}

impl OllamaEmbedder {
    /// Create an Ollama embedder from config.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built.
    pub fn ollama(config: &EmbeddingConfig) -> ChatResult<Self> {
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(Nothing);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build()?;
        let model = client.embedding_model_with_ndims(config.model.clone(), config.ndims);
        Ok(Self::with_model(model, config))
    }
}

impl OpenAiEmbedder {
    /// Create an OpenAI embedder from config.
    ///
    /// # Errors
    /// Returns an error if no credential is configured or the client cannot be built.
    pub fn openai(config: &EmbeddingConfig) -> ChatResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ChatError::MissingCredential(OPENAI_API_KEY_ENV.to_string()))?;
        let builder = openai::Client::<ReqwestClient>::builder().api_key(api_key);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build()?;
        let model = client.embedding_model_with_ndims(config.model.clone(), config.ndims);
        Ok(Self::with_model(model, config))
    }
}

impl<M: EmbeddingModel> Embedder for RigEmbedder<M> {
    fn embed_texts(&self, texts: Vec<String>) -> EmbedFuture<'_, ChatResult<Vec<Vector>>> {
        Box::pin(async move {
            let mut vectors = Vec::with_capacity(texts.len());
            for batch in texts.chunks(self.batch_size) {
                debug!("Embedding batch of {} texts", batch.len());
                let embeddings = self.model.embed_texts(batch.to_vec()).await?;
                if embeddings.len() != batch.len() {
                    return Err(ChatError::EmbeddingMismatch {
                        expected: batch.len(),
                        got: embeddings.len(),
                    });
                }
                vectors.extend(embeddings.into_iter().map(|e| e.vec));
            }
            Ok(vectors)
        })
    }

    fn ndims(&self) -> usize {
        self.ndims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Provider;

    #[test]
    fn test_openai_requires_api_key() {
        assert!(matches!(
            OpenAiEmbedder::openai(&EmbeddingConfig::default()),
            Err(ChatError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_batch_size_is_capped_by_the_provider() {
        let mut config = EmbeddingConfig::default();
        config.api_key = Some("sk-test".to_string());
        config.batch_size = 50_000;
        let embedder = OpenAiEmbedder::openai(&config);
        assert_eq!(
            embedder.map(|e| e.batch_size).ok(),
            Some(openai::EmbeddingModel::<ReqwestClient>::MAX_DOCUMENTS)
        );
    }

    #[test]
    fn test_ollama_embedder_reports_configured_dims() {
        let config = EmbeddingConfig::for_provider(Provider::Ollama);
        let embedder = OllamaEmbedder::ollama(&config);
        assert_eq!(embedder.map(|e| e.ndims()).ok(), Some(768));
    }
}
