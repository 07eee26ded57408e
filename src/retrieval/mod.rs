//! Conversational retrieval: memory, prompts and the retriever unit.

pub mod conversational;
pub mod memory;
pub mod prompt;

pub use conversational::{Answer, ConversationalRetriever};
pub use memory::{ConversationMemory, Turn};
