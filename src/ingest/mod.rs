//! Document ingestion: text extraction, chunking and the processing pipeline.

pub mod extractor;
pub mod pipeline;
pub mod splitter;

pub use extractor::{ExtractedText, PdfTextExtractor, TextExtractor, extract_text};
pub use pipeline::{IngestOutput, IngestPipeline, ProcessReport};
pub use splitter::{CharacterTextSplitter, Splitter};
