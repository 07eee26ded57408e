//! Configuration for the PDF chat application.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::errors::{ChatError, ChatResult};

/// Environment variable holding the OpenAI credential.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable selecting the model provider (`openai` or `ollama`).
pub const PROVIDER_ENV: &str = "PDF_CHAT_PROVIDER";
/// Environment variable for a custom Ollama URL.
pub const OLLAMA_URL_ENV: &str = "PDF_CHAT_OLLAMA_URL";
/// Environment variable for the HTTP port.
pub const PORT_ENV: &str = "PDF_CHAT_PORT";
/// Environment variable for the static page directory.
pub const STATIC_DIR_ENV: &str = "PDF_CHAT_STATIC_DIR";

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Text splitting settings.
    pub chunking: ChunkingConfig,
    /// Retrieval settings.
    pub retrieval: RetrievalConfig,
    /// Embedding service settings.
    pub embedding: EmbeddingConfig,
    /// Chat-completion service settings.
    pub llm: LlmConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Session store settings.
    pub session: SessionConfig,
}

impl ChatConfig {
    /// Build a configuration from defaults and the process environment.
    ///
    /// # Errors
    /// Returns an error if an environment value cannot be parsed.
    pub fn from_env() -> ChatResult<Self> {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var(PROVIDER_ENV) {
            let provider = provider.parse::<Provider>()?;
            config = config.with_provider(provider);
        }

        if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.embedding.api_key = Some(key.clone());
                config.llm.api_key = Some(key);
            }
        }

        if let Ok(url) = std::env::var(OLLAMA_URL_ENV) {
            if config.embedding.provider == Provider::Ollama {
                config.embedding.base_url = Some(url.clone());
            }
            if config.llm.provider == Provider::Ollama {
                config.llm.base_url = Some(url);
            }
        }

        if let Ok(port) = std::env::var(PORT_ENV) {
            config.server.port = port
                .parse()
                .map_err(|_| ChatError::InvalidConfig(format!("{PORT_ENV} is not a port: {port}")))?;
        }

        if let Ok(dir) = std::env::var(STATIC_DIR_ENV) {
            config.server.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Switch both services to the given provider with that provider's default models.
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.embedding = EmbeddingConfig::for_provider(provider);
        self.llm = LlmConfig::for_provider(provider);
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        self.chunking.validate()?;

        if self.retrieval.top_k == 0 {
            return Err(ChatError::InvalidConfig(
                "retrieval.top_k must be > 0".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(ChatError::InvalidConfig(
                "embedding.batch_size must be > 0".to_string(),
            ));
        }

        if self.embedding.ndims == 0 {
            return Err(ChatError::InvalidConfig(
                "embedding.ndims must be > 0".to_string(),
            ));
        }

        if self.session.default_conversation.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "session.default_conversation must not be empty".to_string(),
            ));
        }

        if self.embedding.provider == Provider::OpenAi && self.embedding.api_key.is_none() {
            return Err(ChatError::MissingCredential(OPENAI_API_KEY_ENV.to_string()));
        }

        if self.llm.provider == Provider::OpenAi && self.llm.api_key.is_none() {
            return Err(ChatError::MissingCredential(OPENAI_API_KEY_ENV.to_string()));
        }

        if let Some(base_url) = &self.embedding.base_url {
            Url::parse(base_url)?;
        }

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Hosted or local model provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// OpenAI HTTP API.
    #[default]
    OpenAi,
    /// Local Ollama server through Rig.
    Ollama,
}

impl std::str::FromStr for Provider {
    type Err = ChatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ChatError::InvalidConfig(format!("unknown provider: {other}"))),
        }
    }
}

/// Text splitting settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Preferred split separator.
    pub separator: String,
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Validate the splitter parameters.
    ///
    /// # Errors
    /// Returns an error if the size is zero or the overlap is not smaller than the size.
    pub fn validate(&self) -> ChatResult<()> {
        if self.chunk_size == 0 {
            return Err(ChatError::InvalidConfig(
                "chunking.chunk_size must be > 0".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChatError::InvalidConfig(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            separator: "\n\n".to_string(),
            chunk_size: 200,
            chunk_overlap: 50,
        }
    }
}

/// Retrieval settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Rephrase follow-up questions into standalone questions before retrieval.
    pub condense_question: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            condense_question: true,
        }
    }
}

/// Embedding service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which service produces embeddings.
    pub provider: Provider,
    /// Embedding model name.
    pub model: String,
    /// Embedding vector dimensions.
    pub ndims: usize,
    /// Max texts per embedding request.
    pub batch_size: usize,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Service credential.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    /// Default settings for a provider.
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::OpenAi => Self::default(),
            Provider::Ollama => Self {
                provider,
                model: "nomic-embed-text".to_string(),
                ndims: 768,
                batch_size: 64,
                base_url: None,
                api_key: None,
            },
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: "text-embedding-ada-002".to_string(),
            ndims: 1536,
            batch_size: 1000,
            base_url: None,
            api_key: None,
        }
    }
}

/// Chat-completion settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which service answers questions.
    pub provider: Provider,
    /// Completion model name.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Optional max tokens.
    pub max_tokens: Option<u64>,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Service credential.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl LlmConfig {
    /// Default settings for a provider.
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::OpenAi => Self::default(),
            Provider::Ollama => Self {
                provider,
                model: "ministral-3:8b-instruct-2512-q8_0".to_string(),
                temperature: 0.7,
                max_tokens: None,
                base_url: None,
                api_key: None,
            },
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: None,
            base_url: None,
            api_key: None,
        }
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Directory holding the single page.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Session store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Conversation created and selected at startup.
    pub default_conversation: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_conversation: "Default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> ChatConfig {
        let mut config = ChatConfig::default();
        config.embedding.api_key = Some("sk-test".to_string());
        config.llm.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.chunking.separator, "\n\n");
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.session.default_conversation, "Default");
    }

    #[test]
    fn test_validate_requires_credential_for_openai() {
        let config = ChatConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ChatError::MissingCredential(_))
        ));
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_size() {
        let mut config = with_key();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(config.validate(), Err(ChatError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = with_key();
        config.llm.base_url = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(ChatError::Url(_))));
    }

    #[test]
    fn test_ollama_needs_no_credential() {
        let config = ChatConfig::default().with_provider(Provider::Ollama);
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<Provider>().ok(), Some(Provider::OpenAi));
        assert_eq!("ollama".parse::<Provider>().ok(), Some(Provider::Ollama));
        assert!("other".parse::<Provider>().is_err());
    }
}
