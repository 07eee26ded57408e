//! In-memory similarity index over chunk embeddings.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::errors::{ChatError, ChatResult};
use crate::core::ids::ChunkId;
use crate::embedding::{Embedder, Vector};

/// Boxed future type for index operations.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A retrieved chunk with its similarity to the query.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredChunk {
    /// Chunk identifier.
    pub id: ChunkId,
    /// Original chunk text.
    pub text: String,
    /// Cosine similarity in [-1, 1].
    pub score: f64,
}

/// Nearest-neighbour lookup returning original chunk text.
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` chunks most similar to `query`, best first.
    ///
    /// # Errors
    /// Returns an error if the query cannot be embedded.
    fn search<'a>(&'a self, query: &'a str, k: usize) -> IndexFuture<'a, ChatResult<Vec<ScoredChunk>>>;
}

#[derive(Clone, Debug)]
struct Entry {
    id: ChunkId,
    text: String,
    vector: Vector,
}

/// Brute-force cosine index. The same embedder embeds chunks and queries.
pub struct FlatVectorIndex {
    entries: Vec<Entry>,
    embedder: Arc<dyn Embedder>,
}

impl FlatVectorIndex {
    /// Embed every chunk and build the index.
    ///
    /// Nothing is kept if any embedding call fails.
    ///
    /// # Errors
    /// Returns an error if there are no chunks, the embedding service fails, or it
    /// returns a different number of vectors than chunks or vectors of the wrong length.
    pub async fn build(chunks: Vec<String>, embedder: Arc<dyn Embedder>) -> ChatResult<Self> {
        if chunks.is_empty() {
            return Err(ChatError::EmptyCorpus);
        }

        let expected = chunks.len();
        let vectors = embedder.embed_texts(chunks.clone()).await?;
        if vectors.len() != expected {
            return Err(ChatError::EmbeddingMismatch {
                expected,
                got: vectors.len(),
            });
        }
        let ndims = embedder.ndims();
        if let Some(vector) = vectors.iter().find(|vector| vector.len() != ndims) {
            return Err(ChatError::DimensionMismatch {
                expected: ndims,
                got: vector.len(),
            });
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| Entry {
                id: ChunkId::new(),
                text,
                vector,
            })
            .collect();

        info!("Built vector index with {expected} chunks");
        Ok(Self { entries, embedder })
    }

    /// Number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&self, query: &[f64], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                id: entry.id,
                text: entry.text.clone(),
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

impl VectorIndex for FlatVectorIndex {
    fn search<'a>(&'a self, query: &'a str, k: usize) -> IndexFuture<'a, ChatResult<Vec<ScoredChunk>>> {
        Box::pin(async move {
            let query_vector = self.embedder.embed_text(query).await?;
            let hits = self.rank(&query_vector, k);
            debug!("Retrieved {} of {} chunks", hits.len(), self.entries.len());
            Ok(hits)
        })
    }
}

/// Cosine similarity between two vectors; 0 for empty, mismatched or zero vectors.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbedFuture;
    use crate::testing::{FailingEmbedder, HashingEmbedder};

    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn embed_texts(&self, texts: Vec<String>) -> EmbedFuture<'_, ChatResult<Vec<Vector>>> {
            Box::pin(async move { Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect()) })
        }

        fn ndims(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_and_degenerate() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!(cosine_similarity(&[], &[]).abs() < f64::EPSILON);
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_rejected() {
        let result = FlatVectorIndex::build(vec![], Arc::new(HashingEmbedder::default())).await;
        assert!(matches!(result, Err(ChatError::EmptyCorpus)));
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_build() {
        let result =
            FlatVectorIndex::build(vec!["a".to_string()], Arc::new(FailingEmbedder)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_wrong_vector_length_aborts_build() {
        let result =
            FlatVectorIndex::build(vec!["a".to_string(), "b".to_string()], Arc::new(ShortEmbedder))
                .await;
        assert!(matches!(
            result,
            Err(ChatError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[tokio::test]
    async fn test_search_returns_most_similar_first() {
        let chunks = vec![
            "the cat sat on the mat".to_string(),
            "quarterly revenue grew by ten percent".to_string(),
            "dogs and cats are pets".to_string(),
        ];
        let index = FlatVectorIndex::build(chunks.clone(), Arc::new(HashingEmbedder::default()))
            .await
            .unwrap_or_else(|err| panic!("build failed: {err}"));
        assert_eq!(index.len(), 3);

        let hits = index
            .search("quarterly revenue grew", 2)
            .await
            .unwrap_or_default();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, chunks[1]);
        assert!(hits[0].score >= hits[1].score);
        assert!(hits.iter().all(|hit| chunks.contains(&hit.text)));
    }
}
