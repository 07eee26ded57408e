//! Chat with uploaded PDF documents through retrieval-augmented generation.

// Strict lint policy
#![deny(warnings)] // Every warning is an error
#![deny(unsafe_code)] // No unsafe code
#![deny(missing_docs)] // Public items are documented
#![deny(dead_code)] // No unused code
#![deny(non_camel_case_types)]
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Results and Options are handled explicitly
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Clippy
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)] // No unwrap()
#![deny(clippy::expect_used)] // No expect()
#![deny(clippy::panic)] // No panic!()
#![deny(clippy::print_stdout)] // No println!() in production
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![deny(overflowing_literals)]
#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

/// Configuration, errors, identifiers and shared value types.
pub mod core;
/// Embedding services.
pub mod embedding;
/// Similarity search over chunk embeddings.
pub mod index;
/// PDF text extraction, chunking and the processing pipeline.
pub mod ingest;
/// User actions and the rendered view.
pub mod interaction;
/// Chat-completion backends.
pub mod llm;
/// Conversational retrieval over one index.
pub mod retrieval;
/// HTTP server and API routes.
#[allow(clippy::missing_errors_doc, clippy::unused_async)]
pub mod server;
/// Named in-memory conversations.
pub mod session;
/// Entry helpers to start the PDF chat server.
pub mod start_pdf_chat;

#[cfg(test)]
mod testing;
