//! Named conversations kept in memory for the lifetime of the process.

pub mod conversation;
pub mod store;

pub use conversation::{Conversation, ConversationState};
pub use store::SessionStore;
