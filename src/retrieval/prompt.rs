//! Prompt templates for condensing follow-ups and answering from context.

use crate::index::ScoredChunk;
use crate::llm::generator::ChatMessage;
use crate::retrieval::memory::ConversationMemory;

const CONDENSE_TEMPLATE: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.";

const ANSWER_TEMPLATE: &str = "Use the following pieces of context to answer the user's question.\n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------\n";

/// Build the request asking for a standalone version of a follow-up question.
#[must_use]
pub fn condense_request(memory: &ConversationMemory, question: &str) -> Vec<ChatMessage> {
    let mut prompt = String::from(CONDENSE_TEMPLATE);
    prompt.push_str("\n\nChat History:\n");
    prompt.push_str(&memory.transcript());
    prompt.push_str("Follow Up Input: ");
    prompt.push_str(question);
    prompt.push_str("\nStandalone question:");
    vec![ChatMessage::user(prompt)]
}

/// Build the answering request: context, prior turns, then the question.
#[must_use]
pub fn answer_request(
    chunks: &[ScoredChunk],
    memory: &ConversationMemory,
    question: &str,
) -> Vec<ChatMessage> {
    let context = chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut messages = Vec::with_capacity(memory.len() * 2 + 2);
    messages.push(ChatMessage::system(format!("{ANSWER_TEMPLATE}{context}")));
    messages.extend(memory.as_messages());
    messages.push(ChatMessage::user(question));
    messages
}
