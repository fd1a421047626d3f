use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use semkernel_core::{
    AuthorRole, ChatCompletionService, ChatHistory, ChatMessageContent, CompletionUsage,
    FunctionResultMetadata, InvocationContext, Kernel, SemkernelError,
};
use tracing::debug;
use uuid::Uuid;

/// Offline chat completion service that replies with the latest user message.
///
/// Useful for wiring checks and tests; usage counts whitespace-separated words.
pub struct EchoChatCompletion {
    service_id: String,
    prefix: String,
    calls: AtomicU32,
}

impl EchoChatCompletion {
    pub const DEFAULT_SERVICE_ID: &'static str = "echo";
    pub const MODEL_ID: &'static str = "echo-1";

    /// Create a new EchoChatCompletion
    pub fn new() -> Self {
        Self {
            service_id: Self::DEFAULT_SERVICE_ID.to_string(),
            prefix: "Echo: ".to_string(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = service_id.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Number of completions served so far
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for EchoChatCompletion {
    fn default() -> Self {
        Self::new()
    }
}

fn count_words(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[async_trait]
impl ChatCompletionService for EchoChatCompletion {
    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn model_id(&self) -> Option<&str> {
        Some(Self::MODEL_ID)
    }

    async fn get_chat_message_contents(
        &self,
        chat_history: &ChatHistory,
        _kernel: &Kernel,
        context: &InvocationContext,
    ) -> semkernel_core::Result<Vec<ChatMessageContent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let last = chat_history
            .last_message_by_role(AuthorRole::User)
            .ok_or_else(|| SemkernelError::ChatCompletion("no user message to echo".to_string()))?;

        let mut reply = format!("{}{}", self.prefix, last.content);
        if let Some(settings) = context.prompt_execution_settings() {
            // honour stop sequences the way a real model would
            if let Some(index) = settings
                .stop_sequences
                .iter()
                .filter(|stop| !stop.is_empty())
                .filter_map(|stop| reply.find(stop.as_str()))
                .min()
            {
                reply.truncate(index);
            }
        }

        let prompt_tokens = chat_history
            .iter()
            .map(|message| count_words(&message.content))
            .sum();
        let usage = CompletionUsage::new(prompt_tokens, count_words(&reply));
        debug!(
            service = %self.service_id,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Echo completion"
        );

        let metadata = FunctionResultMetadata::new()
            .with_id(Uuid::new_v4().to_string())
            .with_created_at(Utc::now())
            .with_usage(usage);

        Ok(vec![
            ChatMessageContent::assistant(reply)
                .with_model_id(Self::MODEL_ID)
                .with_metadata(metadata),
        ])
    }
}
