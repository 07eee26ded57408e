//! Page-ordered text extraction from uploaded documents.

use crate::core::errors::{ChatError, ChatResult};

/// Extract plain text from a paginated document.
pub trait TextExtractor: Send + Sync {
    /// Return the text of every page, in page order.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or unreadable.
    fn extract_pages(&self, file_name: &str, bytes: &[u8]) -> ChatResult<Vec<String>>;
}

/// Text of one document after extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedText {
    /// Number of pages read.
    pub page_count: usize,
    /// Page texts concatenated in order.
    pub text: String,
}

/// Extract a whole document and concatenate its pages.
///
/// # Errors
/// Returns an error if extraction fails, the document has no pages, or any page
/// yields no text.
pub fn extract_text(
    extractor: &dyn TextExtractor,
    file_name: &str,
    bytes: &[u8],
) -> ChatResult<ExtractedText> {
    let pages = extractor.extract_pages(file_name, bytes)?;
    if pages.is_empty() {
        return Err(ChatError::Extraction {
            file_name: file_name.to_string(),
            message: "document has no pages".to_string(),
        });
    }
    if let Some(idx) = pages.iter().position(|page| page.trim().is_empty()) {
        return Err(ChatError::NoExtractableText {
            file_name: file_name.to_string(),
            page: idx + 1,
        });
    }
    Ok(ExtractedText {
        page_count: pages.len(),
        text: pages.concat(),
    })
}

/// PDF extractor backed by `pdf-extract`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, file_name: &str, bytes: &[u8]) -> ChatResult<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|err| ChatError::Extraction {
            file_name: file_name.to_string(),
            message: err.to_string(),
        })
    }
}
