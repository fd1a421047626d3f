//! Kernel hooks: interceptors fired around function and chat completion calls.

pub mod events;
pub mod kernel_hooks;

pub use events::{
    FunctionInvokedEvent, FunctionInvokingEvent, KernelHookEvent, PostChatCompletionEvent,
    PreChatCompletionEvent,
};
pub use kernel_hooks::{
    FunctionInvokedHook, FunctionInvokingHook, HookId, KernelHook, KernelHooks,
    PostChatCompletionHook, PreChatCompletionHook, UnmodifiableKernelHooks,
};
