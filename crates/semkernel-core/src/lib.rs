//! # Semkernel Core
//!
//! Orchestration engine for language-model applications: typed context
//! variables and their converter registry, kernel hooks, the fluent
//! [`FunctionInvocation`] builder and chat history.

pub mod chat;
pub mod contextvariables;
pub mod error;
pub mod hooks;
pub mod kernel;
pub mod orchestration;
pub mod services;

pub use chat::{AuthorRole, ChatHistory, ChatMessageContent};
pub use contextvariables::{
    AnyContextVariable, Collection, CollectionConverter, ContextValue, ContextVariable,
    ContextVariableType, ContextVariableTypeConverter, ContextVariableTypes, Number, Object,
    TypeTag, object_type,
};
pub use error::{Result, SemkernelError};
pub use hooks::{
    FunctionInvokedEvent, FunctionInvokedHook, FunctionInvokingEvent, FunctionInvokingHook,
    HookId, KernelHook, KernelHookEvent, KernelHooks, PostChatCompletionEvent,
    PostChatCompletionHook, PreChatCompletionEvent, PreChatCompletionHook,
    UnmodifiableKernelHooks,
};
pub use kernel::{Kernel, KernelBuilder};
pub use orchestration::{
    CompletionUsage, FunctionInvocation, FunctionResult, FunctionResultMetadata, INPUT,
    InputVariable, InvocationContext, KernelFunction, KernelFunctionArguments,
    KernelFunctionMetadata, NativeFunction, PromptExecutionSettings, ResponseFormat,
    SharedKernelFunction, ToolCallBehavior,
};
pub use services::{ChatCompletionService, SharedChatCompletionService};
