use crate::chat::{ChatHistory, ChatMessageContent};
use crate::contextvariables::Object;
use crate::orchestration::{
    FunctionResult, KernelFunctionArguments, KernelFunctionMetadata, PromptExecutionSettings,
};

/// Fired before a function body runs; hooks may rewrite the arguments.
#[derive(Debug, Clone)]
pub struct FunctionInvokingEvent {
    pub function: KernelFunctionMetadata,
    pub arguments: KernelFunctionArguments,
}

/// Fired after a function body produced a result; hooks may rewrite it.
#[derive(Debug, Clone)]
pub struct FunctionInvokedEvent {
    pub function: KernelFunctionMetadata,
    pub arguments: KernelFunctionArguments,
    pub result: FunctionResult<Object>,
}

/// Fired before a chat completion request is sent.
#[derive(Debug, Clone)]
pub struct PreChatCompletionEvent {
    pub chat_history: ChatHistory,
    pub settings: Option<PromptExecutionSettings>,
}

/// Fired with the messages a chat completion service returned.
#[derive(Debug, Clone)]
pub struct PostChatCompletionEvent {
    pub messages: Vec<ChatMessageContent>,
}

#[derive(Debug, Clone)]
pub enum KernelHookEvent {
    FunctionInvoking(FunctionInvokingEvent),
    FunctionInvoked(FunctionInvokedEvent),
    PreChatCompletion(PreChatCompletionEvent),
    PostChatCompletion(PostChatCompletionEvent),
}

impl KernelHookEvent {
    /// Short name of the event kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            KernelHookEvent::FunctionInvoking(_) => "function_invoking",
            KernelHookEvent::FunctionInvoked(_) => "function_invoked",
            KernelHookEvent::PreChatCompletion(_) => "pre_chat_completion",
            KernelHookEvent::PostChatCompletion(_) => "post_chat_completion",
        }
    }

    pub fn into_function_invoking(self) -> Option<FunctionInvokingEvent> {
        match self {
            KernelHookEvent::FunctionInvoking(event) => Some(event),
            _ => None,
        }
    }

    pub fn into_function_invoked(self) -> Option<FunctionInvokedEvent> {
        match self {
            KernelHookEvent::FunctionInvoked(event) => Some(event),
            _ => None,
        }
    }

    pub fn into_pre_chat_completion(self) -> Option<PreChatCompletionEvent> {
        match self {
            KernelHookEvent::PreChatCompletion(event) => Some(event),
            _ => None,
        }
    }

    pub fn into_post_chat_completion(self) -> Option<PostChatCompletionEvent> {
        match self {
            KernelHookEvent::PostChatCompletion(event) => Some(event),
            _ => None,
        }
    }
}

impl From<FunctionInvokingEvent> for KernelHookEvent {
    fn from(event: FunctionInvokingEvent) -> Self {
        KernelHookEvent::FunctionInvoking(event)
    }
}

impl From<FunctionInvokedEvent> for KernelHookEvent {
    fn from(event: FunctionInvokedEvent) -> Self {
        KernelHookEvent::FunctionInvoked(event)
    }
}

impl From<PreChatCompletionEvent> for KernelHookEvent {
    fn from(event: PreChatCompletionEvent) -> Self {
        KernelHookEvent::PreChatCompletion(event)
    }
}

impl From<PostChatCompletionEvent> for KernelHookEvent {
    fn from(event: PostChatCompletionEvent) -> Self {
        KernelHookEvent::PostChatCompletion(event)
    }
}
