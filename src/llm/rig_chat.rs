//! Answer generation through any Rig completion model.

use reqwest::Client as ReqwestClient;
use rig::client::{CompletionClient, Nothing};
use rig::completion::CompletionModel;
use rig::message::{AssistantContent, Message};
use rig::providers::{ollama, openai};

use crate::core::config::{LlmConfig, OPENAI_API_KEY_ENV};
use crate::core::errors::{ChatError, ChatResult};
use crate::llm::generator::{AnswerGenerator, ChatMessage, ChatRole, GenerateFuture};

/// Chat backend over a Rig completion model.
pub struct RigChat<M> {
    model: M,
    temperature: f64,
    max_tokens: Option<u64>,
}

/// Rig chat backed by a local Ollama server.
pub type OllamaChat = RigChat<ollama::CompletionModel<ReqwestClient>>;
/// Rig chat backed by the OpenAI chat completions API.
pub type OpenAiChat = RigChat<openai::CompletionModel<ReqwestClient>>;

impl<M> RigChat<M> {
    const fn with_model(model: M, config: &LlmConfig) -> Self {
        Self {
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl OllamaChat {
    /// Create an Ollama generator from config.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built.
    pub fn ollama(config: &LlmConfig) -> ChatResult<Self> {
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(Nothing);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build()?;
        Ok(Self::with_model(
            client.completion_model(config.model.clone()),
            config,
        ))
    }
}

impl OpenAiChat {
    /// Create an OpenAI generator from config.
    ///
    /// # Errors
    /// Returns an error if no credential is configured or the client cannot be built.
    pub fn openai(config: &LlmConfig) -> ChatResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ChatError::MissingCredential(OPENAI_API_KEY_ENV.to_string()))?;
        let builder = openai::CompletionsClient::<ReqwestClient>::builder().api_key(api_key);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build()?;
        Ok(Self::with_model(
            client.completion_model(config.model.clone()),
            config,
        ))
    }
}

impl<M: CompletionModel> AnswerGenerator for RigChat<M> {
    fn generate(&self, messages: Vec<ChatMessage>) -> GenerateFuture<'_, ChatResult<String>> {
        Box::pin(async move {
            let (preamble, history, prompt) = split_messages(messages);
            let mut builder = self.model.completion_request(prompt);
            if let Some(preamble) = preamble {
                builder = builder.preamble(preamble);
            }
            let request = builder
                .messages(history)
                .temperature(self.temperature)
                .max_tokens_opt(self.max_tokens)
                .build();

            let response = self.model.completion(request).await?;
            let text = extract_text(&response.choice);
            if text.trim().is_empty() {
                return Err(ChatError::EmptyCompletion);
            }
            Ok(text)
        })
    }
}

/// Split chat messages into Rig's preamble, history and prompt.
///
/// System messages are joined into the preamble. The last non-system message is the prompt;
/// everything before it is history.
fn split_messages(messages: Vec<ChatMessage>) -> (Option<String>, Vec<Message>, Message) {
    let mut system = Vec::new();
    let mut turns = Vec::new();
    for message in messages {
        match message.role {
            ChatRole::System => system.push(message.content),
            ChatRole::User => turns.push(Message::user(message.content)),
            ChatRole::Assistant => turns.push(Message::assistant(message.content)),
        }
    }
    let preamble = (!system.is_empty()).then(|| system.join("\n\n"));
    let prompt = turns.pop().unwrap_or_else(|| Message::user(""));
    (preamble, turns, prompt)
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
