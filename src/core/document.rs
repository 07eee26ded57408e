//! Uploaded document handles.

use serde::{Deserialize, Serialize};

use crate::core::ids::DocumentId;

const PDF_MIME: &str = "application/pdf";

/// A file received from the upload surface, held only for the duration of processing.
#[derive(Clone, Debug)]
pub struct UploadedDocument {
    /// Upload identifier.
    pub id: DocumentId,
    /// Original file name.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Wrap uploaded bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: DocumentId::new(),
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Whether the upload is a PDF by content type or extension.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_MIME));
        let by_name = std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        by_type || by_name
    }

    /// Descriptor kept on the conversation once processing succeeded.
    #[must_use]
    pub fn info(&self, page_count: usize) -> DocumentInfo {
        DocumentInfo {
            id: self.id,
            file_name: self.file_name.clone(),
            size_bytes: self.bytes.len(),
            page_count,
        }
    }
}

/// Descriptor of a processed document attached to a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Upload identifier.
    pub id: DocumentId,
    /// Original file name.
    pub file_name: String,
    /// File size in bytes.
    pub size_bytes: usize,
    /// Number of pages extracted.
    pub page_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_by_extension_or_type() {
        assert!(UploadedDocument::new("report.PDF", None, vec![]).is_pdf());
        assert!(UploadedDocument::new("blob", Some("application/pdf".to_string()), vec![]).is_pdf());
        assert!(!UploadedDocument::new("notes.txt", Some("text/plain".to_string()), vec![]).is_pdf());
    }

    #[test]
    fn test_info_records_size_and_pages() {
        let doc = UploadedDocument::new("a.pdf", None, vec![0_u8; 42]);
        let info = doc.info(3);
        assert_eq!(info.id, doc.id);
        assert_eq!(info.size_bytes, 42);
        assert_eq!(info.page_count, 3);
    }
}
