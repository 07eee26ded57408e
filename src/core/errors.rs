//! Error types for the PDF chat pipeline.

use thiserror::Error;

/// Error type shared by ingestion, indexing and answer generation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A required service credential is not configured.
    #[error("missing credential: {0}")]
    MissingCredential(String),
    /// The document could not be parsed.
    #[error("failed to extract text from {file_name}: {message}")]
    Extraction {
        /// Uploaded file name.
        file_name: String,
        /// Extractor error message.
        message: String,
    },
    /// A page of the document yielded no text.
    #[error("no extractable text on page {page} of {file_name}")]
    NoExtractableText {
        /// Uploaded file name.
        file_name: String,
        /// One-based page number.
        page: usize,
    },
    /// Nothing to index after chunking.
    #[error("no chunks to index")]
    EmptyCorpus,
    /// The embedding service returned a different number of vectors than requested.
    #[error("embedding service returned {got} vectors for {expected} inputs")]
    EmbeddingMismatch {
        /// Number of inputs sent.
        expected: usize,
        /// Number of vectors received.
        got: usize,
    },
    /// The embedding service returned a vector of unexpected length.
    #[error("embedding has {got} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Configured dimensions.
        expected: usize,
        /// Dimensions received.
        got: usize,
    },
    /// The chat service returned no answer text.
    #[error("chat service returned an empty completion")]
    EmptyCompletion,
    /// Embedding error from Rig.
    #[error("embedding error: {0}")]
    Embedding(#[from] rig::embeddings::EmbeddingError),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error from Rig.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// True for failures raised while reading uploaded documents.
    #[must_use]
    pub const fn is_extraction(&self) -> bool {
        matches!(
            self,
            Self::Extraction { .. } | Self::NoExtractableText { .. }
        )
    }
}

/// Convenience result alias for pipeline operations.
pub type ChatResult<T> = Result<T, ChatError>;
