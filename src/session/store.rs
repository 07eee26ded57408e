//! In-memory registry of named conversations.

use tracing::{debug, info};

use crate::core::outcome::{Outcome, UserWarning};
use crate::session::conversation::Conversation;

/// Conversations keyed by name, in creation order, with one active at a time.
pub struct SessionStore {
    conversations: Vec<Conversation>,
    active: usize,
}

impl SessionStore {
    /// Create the store holding only the default conversation, active.
    #[must_use]
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            conversations: vec![Conversation::new(default_name)],
            active: 0,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.name() == name)
    }

    /// Create a conversation and make it active.
    ///
    /// Blank or already used names leave the store unchanged.
    pub fn create_conversation(&mut self, name: &str) -> Outcome<()> {
        let name = name.trim();
        if name.is_empty() {
            return Outcome::Warned(UserWarning::EmptyName);
        }
        if self.position(name).is_some() {
            return Outcome::Warned(UserWarning::DuplicateName(name.to_string()));
        }

        self.conversations.push(Conversation::new(name));
        self.active = self.conversations.len() - 1;
        info!("Created conversation '{name}'");
        Outcome::Done(())
    }

    /// Make an existing conversation active.
    pub fn select_conversation(&mut self, name: &str) -> Outcome<()> {
        match self.position(name.trim()) {
            Some(idx) => {
                self.active = idx;
                debug!("Selected conversation '{}'", self.conversations[idx].name());
                Outcome::Done(())
            }
            None => Outcome::Warned(UserWarning::UnknownConversation(name.to_string())),
        }
    }

    /// The active conversation.
    #[must_use]
    pub fn active(&self) -> &Conversation {
        &self.conversations[self.active]
    }

    /// The active conversation, mutably.
    pub fn active_mut(&mut self) -> &mut Conversation {
        &mut self.conversations[self.active]
    }

    /// Conversation names in creation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.conversations
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Look up a conversation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.name() == name)
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::conversation::ConversationState;

    #[test]
    fn test_new_store_has_active_default() {
        let store = SessionStore::new("Default");
        assert_eq!(store.names(), vec!["Default"]);
        assert_eq!(store.active().name(), "Default");
        assert_eq!(store.active().state(), ConversationState::Empty);
    }

    #[test]
    fn test_create_then_select_yields_empty_conversation() {
        let mut store = SessionStore::new("Default");
        for name in ["Research", "Notes", "Q3 report"] {
            assert_eq!(store.create_conversation(name), Outcome::Done(()));
            assert_eq!(store.select_conversation(name), Outcome::Done(()));
            let active = store.active();
            assert_eq!(active.name(), name);
            assert!(active.messages().is_empty());
            assert!(active.documents().is_empty());
        }
        assert_eq!(store.names(), vec!["Default", "Research", "Notes", "Q3 report"]);
    }

    #[test]
    fn test_create_selects_new_conversation() {
        let mut store = SessionStore::new("Default");
        let _ = store.create_conversation("Research");
        assert_eq!(store.active().name(), "Research");
    }

    #[test]
    fn test_blank_or_duplicate_names_are_no_ops() {
        let mut store = SessionStore::new("Default");
        let _ = store.create_conversation("Research");
        let _ = store.select_conversation("Default");

        assert_eq!(
            store.create_conversation("   "),
            Outcome::Warned(UserWarning::EmptyName)
        );
        assert_eq!(
            store.create_conversation("Research"),
            Outcome::Warned(UserWarning::DuplicateName("Research".to_string()))
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.active().name(), "Default");
    }

    #[test]
    fn test_unknown_selection_keeps_active() {
        let mut store = SessionStore::new("Default");
        assert!(store.select_conversation("missing").is_warned());
        assert_eq!(store.active().name(), "Default");
        assert!(store.get("missing").is_none());
        assert!(store.get("Default").is_some());
    }
}
