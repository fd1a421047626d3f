//! Seams to external model services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::chat::{ChatHistory, ChatMessageContent};
use crate::kernel::Kernel;
use crate::orchestration::InvocationContext;

/// A chat completion backend.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Identifier used to select this service
    fn service_id(&self) -> &str;

    fn model_id(&self) -> Option<&str> {
        None
    }

    /// Produce reply messages for the conversation so far
    async fn get_chat_message_contents(
        &self,
        chat_history: &ChatHistory,
        kernel: &Kernel,
        context: &InvocationContext,
    ) -> Result<Vec<ChatMessageContent>>;
}

/// Arc-wrapped service for thread-safe sharing
pub type SharedChatCompletionService = Arc<dyn ChatCompletionService>;
