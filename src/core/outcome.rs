//! User-facing warnings and the outcome of an interaction.

use std::fmt;

use serde::Serialize;

/// Input problem reported to the user instead of an error. Nothing was mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "subject", rename_all = "snake_case")]
pub enum UserWarning {
    /// Conversation name was empty or whitespace.
    EmptyName,
    /// A conversation with this name already exists.
    DuplicateName(String),
    /// No conversation with this name exists.
    UnknownConversation(String),
    /// "Process PDFs" was triggered without files.
    NoFilesAttached,
    /// An uploaded file is not a PDF.
    NotPdf(String),
    /// The submitted question was blank.
    EmptyQuestion,
    /// The active conversation has no processed documents yet.
    NoDocumentsProcessed,
}

impl fmt::Display for UserWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Please enter a conversation name."),
            Self::DuplicateName(name) => write!(f, "Conversation '{name}' already exists."),
            Self::UnknownConversation(name) => write!(f, "Conversation '{name}' does not exist."),
            Self::NoFilesAttached => write!(f, "Please upload at least one PDF."),
            Self::NotPdf(file_name) => write!(f, "'{file_name}' is not a PDF file."),
            Self::EmptyQuestion => write!(f, "Please enter a question."),
            Self::NoDocumentsProcessed => {
                write!(f, "Please process PDFs before asking questions.")
            }
        }
    }
}

/// Result of an action that may have been refused with a warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The action ran.
    Done(T),
    /// The action was refused.
    Warned(UserWarning),
}

impl<T> Outcome<T> {
    /// Whether the action was refused.
    #[must_use]
    pub const fn is_warned(&self) -> bool {
        matches!(self, Self::Warned(_))
    }

    /// The value, if the action ran.
    #[must_use]
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Warned(_) => None,
        }
    }
}
