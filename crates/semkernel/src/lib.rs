//! # Semkernel
//!
//! Application layer on top of `semkernel-core`: configuration loading,
//! a catalog of kernel functions, a chat function and an offline echo
//! chat completion service.

pub mod app;
pub mod config;
pub mod error;
pub mod functions;
pub mod services;

// Re-export core types
pub use semkernel_core::{
    AuthorRole, ChatCompletionService, ChatHistory, ChatMessageContent, ContextValue,
    ContextVariable, ContextVariableType, ContextVariableTypes, FunctionInvocation,
    FunctionResult, Kernel, KernelFunction, KernelFunctionArguments, KernelHooks, Object,
    SemkernelError,
};

pub use app::{AppMetadata, SemkernelApp, SemkernelAppBuilder};
pub use config::{ChatConfig, SemkernelConfig};
pub use error::{Result, SemkernelAppError};
pub use functions::ChatFunction;
pub use services::EchoChatCompletion;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::SemkernelApp;
    pub use crate::config::SemkernelConfig;
    pub use semkernel_core::{
        ChatHistory, ContextVariableTypes, KernelFunctionArguments, PromptExecutionSettings,
    };
}
