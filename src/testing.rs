//! Deterministic in-process stand-ins for the external services.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rig::completion::CompletionError;
use rig::embeddings::EmbeddingError;

use crate::core::errors::{ChatError, ChatResult};
use crate::embedding::{EmbedFuture, Embedder, Vector};
use crate::ingest::TextExtractor;
use crate::llm::{AnswerGenerator, ChatMessage, GenerateFuture};

const HASH_DIMS: usize = 64;

fn embedding_outage() -> ChatError {
    ChatError::Embedding(EmbeddingError::ProviderError(
        "embedding service unavailable".to_string(),
    ))
}

fn chat_outage() -> ChatError {
    ChatError::Completion(CompletionError::ProviderError(
        "chat service unavailable".to_string(),
    ))
}

/// Extractor returning the same pages for every document.
pub struct PagedExtractor {
    pages: Vec<String>,
}

impl PagedExtractor {
    pub fn new(pages: Vec<&str>) -> Self {
        Self {
            pages: pages.into_iter().map(str::to_string).collect(),
        }
    }
}

impl TextExtractor for PagedExtractor {
    fn extract_pages(&self, _file_name: &str, _bytes: &[u8]) -> ChatResult<Vec<String>> {
        Ok(self.pages.clone())
    }
}

/// Extractor that rejects every document.
pub struct FailingExtractor;

impl TextExtractor for FailingExtractor {
    fn extract_pages(&self, file_name: &str, _bytes: &[u8]) -> ChatResult<Vec<String>> {
        Err(ChatError::Extraction {
            file_name: file_name.to_string(),
            message: "malformed".to_string(),
        })
    }
}

/// Bag-of-words embedder: each lowercase token adds weight to a hashed bucket.
#[derive(Default)]
pub struct HashingEmbedder {
    calls: AtomicUsize,
    failing: AtomicBool,
    embedded: Mutex<Vec<String>>,
}

impl HashingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every text received so far, in request order.
    pub fn embedded(&self) -> Vec<String> {
        self.embedded
            .lock()
            .map(|embedded| embedded.clone())
            .unwrap_or_default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn vector(text: &str) -> Vector {
        let mut vector = vec![0.0; HASH_DIMS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let bucket = usize::try_from(hasher.finish() % HASH_DIMS as u64).unwrap_or(0);
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Embedder for HashingEmbedder {
    fn embed_texts(&self, texts: Vec<String>) -> EmbedFuture<'_, ChatResult<Vec<Vector>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(embedding_outage());
            }
            if let Ok(mut embedded) = self.embedded.lock() {
                embedded.extend(texts.iter().cloned());
            }
            Ok(texts.iter().map(|text| Self::vector(text)).collect())
        })
    }

    fn ndims(&self) -> usize {
        HASH_DIMS
    }
}

/// Embedder whose service is always down.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_texts(&self, _texts: Vec<String>) -> EmbedFuture<'_, ChatResult<Vec<Vector>>> {
        Box::pin(async { Err(embedding_outage()) })
    }

    fn ndims(&self) -> usize {
        HASH_DIMS
    }
}

/// Generator replying with a fixed text and recording every request.
pub struct ScriptedGenerator {
    reply: String,
    failing: AtomicBool,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            failing: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.requests().len()
    }
}

impl AnswerGenerator for ScriptedGenerator {
    fn generate(&self, messages: Vec<ChatMessage>) -> GenerateFuture<'_, ChatResult<String>> {
        Box::pin(async move {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(messages);
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(chat_outage());
            }
            Ok(self.reply.clone())
        })
    }
}
