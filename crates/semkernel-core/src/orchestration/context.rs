//! Per-invocation snapshot of hooks, settings and converters.

use crate::contextvariables::ContextVariableTypes;
use crate::hooks::{KernelHooks, UnmodifiableKernelHooks};

use super::settings::PromptExecutionSettings;
use super::tool_call::ToolCallBehavior;

/// Immutable configuration seen by a function during one invocation
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    hooks: UnmodifiableKernelHooks,
    prompt_execution_settings: Option<PromptExecutionSettings>,
    tool_call_behavior: Option<ToolCallBehavior>,
    context_variable_types: ContextVariableTypes,
}

impl InvocationContext {
    pub fn new(
        hooks: UnmodifiableKernelHooks,
        prompt_execution_settings: Option<PromptExecutionSettings>,
        tool_call_behavior: Option<ToolCallBehavior>,
        context_variable_types: ContextVariableTypes,
    ) -> Self {
        Self {
            hooks,
            prompt_execution_settings,
            tool_call_behavior,
            context_variable_types,
        }
    }

    pub fn builder() -> InvocationContextBuilder {
        InvocationContextBuilder::default()
    }

    pub fn kernel_hooks(&self) -> &UnmodifiableKernelHooks {
        &self.hooks
    }

    pub fn prompt_execution_settings(&self) -> Option<&PromptExecutionSettings> {
        self.prompt_execution_settings.as_ref()
    }

    pub fn tool_call_behavior(&self) -> Option<&ToolCallBehavior> {
        self.tool_call_behavior.as_ref()
    }

    pub fn context_variable_types(&self) -> &ContextVariableTypes {
        &self.context_variable_types
    }
}

/// Builder for contexts used outside of [`FunctionInvocation`](super::FunctionInvocation)
#[derive(Debug, Default)]
pub struct InvocationContextBuilder {
    hooks: KernelHooks,
    prompt_execution_settings: Option<PromptExecutionSettings>,
    tool_call_behavior: Option<ToolCallBehavior>,
    context_variable_types: Option<ContextVariableTypes>,
}

impl InvocationContextBuilder {
    pub fn with_kernel_hooks(mut self, hooks: &KernelHooks) -> Self {
        self.hooks.add_hooks(hooks);
        self
    }

    pub fn with_prompt_execution_settings(mut self, settings: PromptExecutionSettings) -> Self {
        self.prompt_execution_settings = Some(settings);
        self
    }

    pub fn with_tool_call_behavior(mut self, behavior: ToolCallBehavior) -> Self {
        self.tool_call_behavior = Some(behavior);
        self
    }

    pub fn with_context_variable_types(mut self, types: ContextVariableTypes) -> Self {
        self.context_variable_types = Some(types);
        self
    }

    /// Converters default to the built-in registry
    pub fn build(self) -> InvocationContext {
        InvocationContext::new(
            self.hooks.unmodifiable_clone(),
            self.prompt_execution_settings,
            self.tool_call_behavior,
            self.context_variable_types
                .unwrap_or_else(ContextVariableTypes::with_defaults),
        )
    }
}
