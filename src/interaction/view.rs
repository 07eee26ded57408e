//! Render-ready snapshot of the session.

use serde::Serialize;

use crate::core::message::Message;
use crate::session::{ConversationState, SessionStore};

/// Everything the page shows after an action.
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    /// Conversation names in creation order.
    pub conversations: Vec<String>,
    /// Name of the active conversation.
    pub active: String,
    /// State of the active conversation.
    pub state: ConversationState,
    /// Active transcript.
    pub messages: Vec<Message>,
    /// File names of the active conversation's documents.
    pub documents: Vec<String>,
    /// Sidebar document count.
    pub document_count: usize,
    /// Sidebar message count.
    pub message_count: usize,
}

impl SessionView {
    /// Snapshot the store.
    #[must_use]
    pub fn of(store: &SessionStore) -> Self {
        let active = store.active();
        let documents: Vec<String> = active
            .documents()
            .iter()
            .map(|doc| doc.file_name.clone())
            .collect();
        Self {
            conversations: store.names(),
            active: active.name().to_string(),
            state: active.state(),
            messages: active.messages().to_vec(),
            document_count: documents.len(),
            message_count: active.messages().len(),
            documents,
        }
    }
}
