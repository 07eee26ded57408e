//! Buffer of prior question/answer turns.

use serde::Serialize;

use crate::llm::generator::ChatMessage;

/// One completed question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// Question as typed by the user.
    pub question: String,
    /// Answer returned by the chat service.
    pub answer: String,
}

/// Ordered conversational memory consulted on every question.
#[derive(Clone, Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    /// Empty memory.
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a completed turn.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// Recorded turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of recorded turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turn has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Replay the turns as alternating user/assistant chat messages.
    #[must_use]
    pub fn as_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    ChatMessage::user(turn.question.clone()),
                    ChatMessage::assistant(turn.answer.clone()),
                ]
            })
            .collect()
    }

    /// Render the turns as a plain transcript.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str("Human: ");
            out.push_str(&turn.question);
            out.push_str("\nAssistant: ");
            out.push_str(&turn.answer);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::generator::ChatRole;

    #[test]
    fn test_messages_alternate_starting_with_user() {
        let mut memory = ConversationMemory::new();
        memory.record("q1", "a1");
        memory.record("q2", "a2");

        let roles: Vec<ChatRole> = memory.as_messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
        );
        assert_eq!(memory.transcript(), "Human: q1\nAssistant: a1\nHuman: q2\nAssistant: a2\n");
    }
}
