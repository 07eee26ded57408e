//! Orchestrates user actions against the session store and the services.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::document::UploadedDocument;
use crate::core::errors::ChatResult;
use crate::core::outcome::{Outcome, UserWarning};
use crate::ingest::{IngestPipeline, ProcessReport};
use crate::interaction::services::Services;
use crate::interaction::view::SessionView;
use crate::retrieval::{Answer, ConversationalRetriever};
use crate::session::SessionStore;

/// Owner of the session store; every user action goes through here.
pub struct InteractionLoop {
    store: SessionStore,
    services: Services,
    pipeline: IngestPipeline,
}

impl InteractionLoop {
    /// Start with a store holding only the default conversation.
    #[must_use]
    pub fn new(services: Services, default_conversation: &str) -> Self {
        let pipeline = services.pipeline();
        Self {
            store: SessionStore::new(default_conversation),
            services,
            pipeline,
        }
    }

    /// Read access to the session store.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a conversation and switch to it.
    pub fn create_conversation(&mut self, name: &str) -> Outcome<()> {
        let outcome = self.store.create_conversation(name);
        if let Outcome::Warned(warning) = &outcome {
            warn!("Create conversation refused: {warning}");
        }
        outcome
    }

    /// Switch to an existing conversation.
    pub fn select_conversation(&mut self, name: &str) -> Outcome<()> {
        let outcome = self.store.select_conversation(name);
        if let Outcome::Warned(warning) = &outcome {
            warn!("Select conversation refused: {warning}");
        }
        outcome
    }

    /// Process uploads into a fresh retriever for the active conversation.
    ///
    /// The conversation keeps its previous documents and retriever unless every
    /// stage succeeds.
    ///
    /// # Errors
    /// Returns an error if extraction, chunk embedding or index construction fails.
    pub async fn process_documents(
        &mut self,
        uploads: Vec<UploadedDocument>,
    ) -> ChatResult<Outcome<ProcessReport>> {
        if uploads.is_empty() {
            return Ok(Outcome::Warned(UserWarning::NoFilesAttached));
        }
        if let Some(upload) = uploads.iter().find(|upload| !upload.is_pdf()) {
            return Ok(Outcome::Warned(UserWarning::NotPdf(upload.file_name.clone())));
        }

        let name = self.store.active().name().to_string();
        info!("Processing {} files for conversation '{name}'", uploads.len());

        let output = self.pipeline.run(&uploads).await?;
        let retriever = ConversationalRetriever::new(
            Arc::new(output.index),
            Arc::clone(&self.services.generator),
            self.services.retrieval.clone(),
        );
        self.store.active_mut().attach(output.documents, retriever);

        info!(
            "Processed {} documents into {} chunks for '{name}'",
            output.report.documents, output.report.chunks
        );
        Ok(Outcome::Done(output.report))
    }

    /// Ask the active conversation a question.
    ///
    /// # Errors
    /// Returns an error if retrieval or answer generation fails; the question stays
    /// in the transcript without a reply.
    pub async fn ask(&mut self, question: &str) -> ChatResult<Outcome<Answer>> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Outcome::Warned(UserWarning::EmptyQuestion));
        }

        let outcome = self.store.active_mut().ask(question).await?;
        match &outcome {
            Outcome::Done(answer) => info!(
                "Answered in '{}' from {} sources",
                self.store.active().name(),
                answer.sources.len()
            ),
            Outcome::Warned(warning) => warn!("Question refused: {warning}"),
        }
        Ok(outcome)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::of(&self.store)
    }
}
