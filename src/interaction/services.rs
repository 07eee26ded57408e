//! Concrete service selection.

use std::sync::Arc;

use tracing::info;

use crate::core::config::{ChatConfig, RetrievalConfig};
use crate::core::errors::ChatResult;
use crate::embedding::{self, Embedder};
use crate::ingest::{CharacterTextSplitter, IngestPipeline, PdfTextExtractor, Splitter, TextExtractor};
use crate::llm::{self, AnswerGenerator};

/// The collaborators every interaction runs against.
#[derive(Clone)]
pub struct Services {
    /// Document text extraction.
    pub extractor: Arc<dyn TextExtractor>,
    /// Chunking.
    pub splitter: Arc<dyn Splitter>,
    /// Embedding service.
    pub embedder: Arc<dyn Embedder>,
    /// Chat-completion service.
    pub generator: Arc<dyn AnswerGenerator>,
    /// Settings for every retriever built.
    pub retrieval: RetrievalConfig,
}

impl Services {
    /// Choose implementations once, from configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a client cannot be built.
    pub fn from_config(config: &ChatConfig) -> ChatResult<Self> {
        config.validate()?;
        info!(
            "Using {:?} embeddings ({}) and {:?} chat ({})",
            config.embedding.provider, config.embedding.model, config.llm.provider, config.llm.model
        );
        Ok(Self {
            extractor: Arc::new(PdfTextExtractor),
            splitter: Arc::new(CharacterTextSplitter::new(&config.chunking)?),
            embedder: embedding::from_config(&config.embedding)?,
            generator: llm::from_config(&config.llm)?,
            retrieval: config.retrieval.clone(),
        })
    }

    /// Ingestion pipeline over these services.
    #[must_use]
    pub fn pipeline(&self) -> IngestPipeline {
        IngestPipeline::new(
            Arc::clone(&self.extractor),
            Arc::clone(&self.splitter),
            Arc::clone(&self.embedder),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Provider;
    use crate::core::errors::ChatError;

    #[test]
    fn test_openai_without_key_is_rejected() {
        let result = Services::from_config(&ChatConfig::default());
        assert!(matches!(result, Err(ChatError::MissingCredential(_))));
    }

    #[test]
    fn test_ollama_services_build_offline() {
        let config = ChatConfig::default().with_provider(Provider::Ollama);
        let services = Services::from_config(&config);
        assert!(services.is_ok());
        assert_eq!(services.map(|s| s.embedder.ndims()).ok(), Some(768));
    }
}
