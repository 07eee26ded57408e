//! Chat-completion backends.

pub mod generator;
pub mod rig_chat;

use std::sync::Arc;

pub use generator::{AnswerGenerator, ChatMessage, ChatRole, GenerateFuture};
pub use rig_chat::{OllamaChat, OpenAiChat, RigChat};

use crate::core::config::{LlmConfig, Provider};
use crate::core::errors::ChatResult;

/// Build the answer generator selected by the configuration.
///
/// # Errors
/// Returns an error if the selected client cannot be created.
pub fn from_config(config: &LlmConfig) -> ChatResult<Arc<dyn AnswerGenerator>> {
    Ok(match config.provider {
        Provider::OpenAi => Arc::new(OpenAiChat::openai(config)?),
        Provider::Ollama => Arc::new(OllamaChat::ollama(config)?),
    })
}
