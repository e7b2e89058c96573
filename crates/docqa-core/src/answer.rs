use std::time::Instant;

use docqa_llm::{LlmError, LlmProvider, MediaRef, Message};

const MARKDOWN_INSTRUCTION: &str = "Format your answers in Markdown.";

/// Name and role description sent to the model with every question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub name: String,
    pub description: Option<String>,
}

impl AgentIdentity {
    #[must_use]
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are {}.", self.name);
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            prompt.push(' ');
            prompt.push_str(description);
        }
        prompt.push('\n');
        prompt.push_str(MARKDOWN_INSTRUCTION);
        prompt
    }
}

/// Stateless wrapper that sends one composed prompt and returns the answer.
pub struct AnsweringAgent<P> {
    provider: P,
    identity: AgentIdentity,
}

impl<P: LlmProvider> AnsweringAgent<P> {
    pub fn new(provider: P, identity: AgentIdentity) -> Self {
        Self { provider, identity }
    }

    #[must_use]
    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Ask the model. `media` references already-processed remote files.
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged; nothing is retried.
    pub async fn answer(&self, prompt: &str, media: Vec<MediaRef>) -> Result<String, LlmError> {
        let messages = [
            Message::system(self.identity.system_prompt()),
            Message::user(prompt).with_media(media),
        ];

        let started = Instant::now();
        let result = self.provider.chat(&messages).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(answer) => tracing::info!(
                provider = self.provider.name(),
                elapsed_ms,
                answer_len = answer.len(),
                "answer received"
            ),
            Err(e) => tracing::warn!(provider = self.provider.name(), elapsed_ms, "model call failed: {e}"),
        }
        result
    }
}
