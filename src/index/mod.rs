//! Similarity search over embedded chunks.

pub mod vector_index;

pub use vector_index::{FlatVectorIndex, IndexFuture, ScoredChunk, VectorIndex, cosine_similarity};
