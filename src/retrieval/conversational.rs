//! Stateful question answering over one conversation's index.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::RetrievalConfig;
use crate::core::errors::ChatResult;
use crate::index::{ScoredChunk, VectorIndex};
use crate::llm::generator::AnswerGenerator;
use crate::retrieval::memory::ConversationMemory;
use crate::retrieval::prompt::{answer_request, condense_request};

/// Result of a successful question.
#[derive(Clone, Debug)]
pub struct Answer {
    /// Answer text from the chat service.
    pub text: String,
    /// Question actually used for retrieval.
    pub standalone_question: String,
    /// Chunks given to the chat service as context.
    pub sources: Vec<ScoredChunk>,
}

/// Retriever unit bound to one index, one generator and its own memory.
pub struct ConversationalRetriever {
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn AnswerGenerator>,
    config: RetrievalConfig,
    memory: ConversationMemory,
}

impl ConversationalRetriever {
    /// Create a retriever with empty memory.
    #[must_use]
    pub fn new(
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn AnswerGenerator>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            generator,
            config,
            memory: ConversationMemory::new(),
        }
    }

    /// Prior turns consulted on each question.
    #[must_use]
    pub const fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Answer `question` from freshly retrieved context and prior turns.
    ///
    /// Memory is only updated after the chat service answered.
    ///
    /// # Errors
    /// Returns an error if retrieval or any chat-service call fails.
    pub async fn ask(&mut self, question: &str) -> ChatResult<Answer> {
        let standalone_question = if self.config.condense_question && !self.memory.is_empty() {
            let rephrased = self
                .generator
                .generate(condense_request(&self.memory, question))
                .await?;
            debug!("Condensed follow-up into: {rephrased}");
            rephrased.trim().to_string()
        } else {
            question.to_string()
        };

        let sources = self
            .index
            .search(&standalone_question, self.config.top_k)
            .await?;

        let text = self
            .generator
            .generate(answer_request(&sources, &self.memory, question))
            .await?;

        self.memory.record(question, text.clone());
        info!(
            "Answered question with {} context chunks ({} turns in memory)",
            sources.len(),
            self.memory.len()
        );

        Ok(Answer {
            text,
            standalone_question,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FlatVectorIndex;
    use crate::llm::generator::ChatRole;
    use crate::testing::{HashingEmbedder, ScriptedGenerator};

    async fn retriever(generator: Arc<ScriptedGenerator>, condense: bool) -> ConversationalRetriever {
        let chunks = vec![
            "The conclusion is that ownership prevents data races.".to_string(),
            "Chapter one introduces the borrow checker.".to_string(),
            "Appendix lists benchmark numbers.".to_string(),
        ];
        let index = FlatVectorIndex::build(chunks, Arc::new(HashingEmbedder::default()))
            .await
            .unwrap_or_else(|err| panic!("index build failed: {err}"));
        let config = RetrievalConfig {
            top_k: 2,
            condense_question: condense,
        };
        ConversationalRetriever::new(Arc::new(index), generator, config)
    }

    #[tokio::test]
    async fn test_first_question_skips_condensing() {
        let generator = Arc::new(ScriptedGenerator::new("Ownership."));
        let mut retriever = retriever(generator.clone(), true).await;

        let answer = retriever
            .ask("What is the conclusion?")
            .await
            .unwrap_or_else(|err| panic!("ask failed: {err}"));

        assert_eq!(answer.text, "Ownership.");
        assert_eq!(answer.standalone_question, "What is the conclusion?");
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(generator.calls(), 1);
        assert_eq!(retriever.memory().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_is_condensed_and_sees_history() {
        let generator = Arc::new(ScriptedGenerator::new("reply"));
        let mut retriever = retriever(generator.clone(), true).await;

        let _ = retriever.ask("What is the conclusion?").await;
        let _ = retriever.ask("Why?").await;

        assert_eq!(generator.calls(), 3);
        let requests = generator.requests();
        let last = requests.last().cloned().unwrap_or_default();
        let roles: Vec<ChatRole> = last.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert_eq!(last[1].content, "What is the conclusion?");
        assert_eq!(last[3].content, "Why?");
        assert_eq!(retriever.memory().len(), 2);
    }

    #[tokio::test]
    async fn test_condensing_can_be_disabled() {
        let generator = Arc::new(ScriptedGenerator::new("reply"));
        let mut retriever = retriever(generator.clone(), false).await;

        let _ = retriever.ask("first").await;
        let answer = retriever.ask("second").await.ok();

        assert_eq!(generator.calls(), 2);
        assert_eq!(answer.map(|a| a.standalone_question).as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_memory_untouched() {
        let generator = Arc::new(ScriptedGenerator::new("reply"));
        let mut retriever = retriever(generator.clone(), true).await;
        let _ = retriever.ask("first").await;

        generator.set_failing(true);
        assert!(retriever.ask("second").await.is_err());
        assert_eq!(retriever.memory().len(), 1);
        assert_eq!(retriever.memory().turns()[0].question, "first");
    }
}
