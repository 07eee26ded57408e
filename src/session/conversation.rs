//! A single named conversation and its lifecycle.

use serde::Serialize;
use tracing::{info, warn};

use crate::core::document::DocumentInfo;
use crate::core::errors::ChatResult;
use crate::core::message::Message;
use crate::core::outcome::{Outcome, UserWarning};
use crate::retrieval::{Answer, ConversationalRetriever};

/// Whether a conversation can answer questions yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No documents processed.
    Empty,
    /// A retriever is attached.
    Ready,
}

/// Named conversation with its transcript, documents and retriever.
pub struct Conversation {
    name: String,
    messages: Vec<Message>,
    documents: Vec<DocumentInfo>,
    retriever: Option<ConversationalRetriever>,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            documents: Vec::new(),
            retriever: None,
        }
    }

    /// Conversation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transcript in chronological order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Documents from the last successful processing run.
    #[must_use]
    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    /// Attached retriever, if any.
    #[must_use]
    pub const fn retriever(&self) -> Option<&ConversationalRetriever> {
        self.retriever.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConversationState {
        if self.retriever.is_some() {
            ConversationState::Ready
        } else {
            ConversationState::Empty
        }
    }

    /// Replace documents and retriever wholesale.
    pub fn attach(&mut self, documents: Vec<DocumentInfo>, retriever: ConversationalRetriever) {
        info!(
            "Conversation '{}' now holds {} documents",
            self.name,
            documents.len()
        );
        self.documents = documents;
        self.retriever = Some(retriever);
    }

    /// Record the question, ask the retriever and record its answer.
    ///
    /// The user message stays in the transcript when the retriever fails.
    ///
    /// # Errors
    /// Returns an error if retrieval or answer generation fails.
    pub async fn ask(&mut self, question: &str) -> ChatResult<Outcome<Answer>> {
        let Some(retriever) = self.retriever.as_mut() else {
            return Ok(Outcome::Warned(UserWarning::NoDocumentsProcessed));
        };

        self.messages.push(Message::user(question));
        let answer = match retriever.ask(question).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!("Question in '{}' failed: {err}", self.name);
                return Err(err);
            }
        };
        self.messages.push(Message::assistant(answer.text.clone()));
        Ok(Outcome::Done(answer))
    }
}
