//! Core types: configuration, errors, identifiers, messages and documents.

pub mod config;
pub mod document;
pub mod errors;
pub mod ids;
pub mod message;
pub mod outcome;

pub use config::{
    ChatConfig, ChunkingConfig, EmbeddingConfig, LlmConfig, Provider, RetrievalConfig,
    ServerConfig, SessionConfig,
};
pub use document::{DocumentInfo, UploadedDocument};
pub use errors::{ChatError, ChatResult};
pub use ids::{ChunkId, DocumentId};
pub use message::{Message, Role};
pub use outcome::{Outcome, UserWarning};
