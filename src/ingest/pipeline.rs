//! Upload processing: extraction, chunking and index construction.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::document::{DocumentInfo, UploadedDocument};
use crate::core::errors::{ChatError, ChatResult};
use crate::embedding::Embedder;
use crate::index::FlatVectorIndex;
use crate::ingest::extractor::{ExtractedText, TextExtractor, extract_text};
use crate::ingest::splitter::Splitter;

/// Summary of one successful processing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    /// Documents processed.
    pub documents: usize,
    /// Pages extracted across all documents.
    pub pages: usize,
    /// Characters in the concatenated text.
    pub characters: usize,
    /// Chunks embedded into the index.
    pub chunks: usize,
}

/// Everything a conversation needs after its uploads were processed.
pub struct IngestOutput {
    /// Descriptors of the processed uploads, in upload order.
    pub documents: Vec<DocumentInfo>,
    /// Freshly built index over all chunks.
    pub index: FlatVectorIndex,
    /// Run summary.
    pub report: ProcessReport,
}

/// Extract, split and embed a batch of uploads.
#[derive(Clone)]
pub struct IngestPipeline {
    extractor: Arc<dyn TextExtractor>,
    splitter: Arc<dyn Splitter>,
    embedder: Arc<dyn Embedder>,
}

impl IngestPipeline {
    /// Assemble a pipeline from its stages.
    #[must_use]
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        splitter: Arc<dyn Splitter>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            extractor,
            splitter,
            embedder,
        }
    }

    /// Concatenate the text of every upload, each followed by a newline.
    ///
    /// # Errors
    /// Returns an error if any document cannot be read or has no text.
    pub async fn extract_all(
        &self,
        uploads: &[UploadedDocument],
    ) -> ChatResult<(String, Vec<DocumentInfo>, usize)> {
        let mut text = String::new();
        let mut documents = Vec::with_capacity(uploads.len());
        let mut pages = 0_usize;

        for upload in uploads {
            let extracted = self.extract_one(upload).await?;
            debug!(
                "Extracted {} pages from {}",
                extracted.page_count, upload.file_name
            );
            pages += extracted.page_count;
            text.push_str(&extracted.text);
            text.push('\n');
            documents.push(upload.info(extracted.page_count));
        }

        Ok((text, documents, pages))
    }

    async fn extract_one(&self, upload: &UploadedDocument) -> ChatResult<ExtractedText> {
        let extractor = Arc::clone(&self.extractor);
        let file_name = upload.file_name.clone();
        let bytes = upload.bytes.clone();

        tokio::task::spawn_blocking(move || extract_text(extractor.as_ref(), &file_name, &bytes))
            .await
            .map_err(|err| ChatError::Extraction {
                file_name: upload.file_name.clone(),
                message: err.to_string(),
            })?
    }

    /// Run every stage and return the new index with its documents.
    ///
    /// Nothing is returned unless every stage succeeded.
    ///
    /// # Errors
    /// Returns an error if extraction or embedding fails, or no chunk was produced.
    pub async fn run(&self, uploads: &[UploadedDocument]) -> ChatResult<IngestOutput> {
        info!("Processing {} uploaded documents", uploads.len());
        let (text, documents, pages) = self.extract_all(uploads).await?;
        let characters = text.chars().count();
        info!("Extracted {characters} characters from {pages} pages");

        let chunks = self.splitter.split(&text);
        let chunk_count = chunks.len();
        info!("Split text into {chunk_count} chunks");

        let index = FlatVectorIndex::build(chunks, Arc::clone(&self.embedder)).await?;

        Ok(IngestOutput {
            report: ProcessReport {
                documents: documents.len(),
                pages,
                characters,
                chunks: chunk_count,
            },
            documents,
            index,
        })
    }
}
