//! Answer generation contract shared by chat-completion backends.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::core::errors::ChatResult;

/// Boxed future type for generator operations.
pub type GenerateFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Role of a chat-completion message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Instructions and retrieved context.
    System,
    /// User turn.
    User,
    /// Assistant turn.
    Assistant,
}

/// A single chat-completion message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// System message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// User message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Produce an answer from an ordered list of chat messages.
pub trait AnswerGenerator: Send + Sync {
    /// Send `messages` to the chat-completion service and return the answer text.
    ///
    /// # Errors
    /// Returns an error if the service call fails or returns no text.
    fn generate(&self, messages: Vec<ChatMessage>) -> GenerateFuture<'_, ChatResult<String>>;
}
