//! Fluent, deferred kernel function invocation.

use std::future::IntoFuture;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use super::arguments::KernelFunctionArguments;
use super::context::InvocationContext;
use super::function::KernelFunction;
use super::result::FunctionResult;
use super::settings::PromptExecutionSettings;
use super::tool_call::ToolCallBehavior;
use crate::contextvariables::{
    ContextValue, ContextVariable, ContextVariableType, ContextVariableTypes, Object,
};
use crate::hooks::{KernelHook, KernelHooks, UnmodifiableKernelHooks};
use crate::kernel::Kernel;
use crate::{Result, SemkernelError};

/// A configurable, not-yet-started call of a kernel function.
///
/// Nothing runs until the invocation is awaited (or [`invoke`](Self::invoke)
/// is called). Each evaluation snapshots the current configuration, so an
/// in-flight call never observes later changes to the builder. Dropping the
/// returned future cancels the call.
///
/// ```no_run
/// # use semkernel_core::*;
/// # async fn run(kernel: Kernel, function: SharedKernelFunction) -> Result<()> {
/// let result = kernel
///     .invoke(function)
///     .with_arguments(KernelFunctionArguments::builder().with_input("40".to_string()).build())
///     .with_result_type(ContextVariableTypes::get_global_variable_type::<i32>()?)
///     .await?;
/// assert_eq!(result.result(), Some(&40));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FunctionInvocation<T> {
    kernel: Kernel,
    function: Arc<dyn KernelFunction>,
    result_type: Option<ContextVariableType<T>>,
    arguments: Option<KernelFunctionArguments>,
    hooks: UnmodifiableKernelHooks,
    prompt_execution_settings: Option<PromptExecutionSettings>,
    tool_call_behavior: Option<ToolCallBehavior>,
    context_variable_types: ContextVariableTypes,
}

impl FunctionInvocation<Object> {
    /// Invocation without an explicit result type; the raw result passes through as `Object`
    pub fn new(kernel: &Kernel, function: Arc<dyn KernelFunction>) -> Self {
        Self::create(kernel, function, None)
    }
}

impl<T: ContextValue + Clone> FunctionInvocation<T> {
    /// Invocation whose result is coerced to `result_type`
    pub fn with_type(
        kernel: &Kernel,
        function: Arc<dyn KernelFunction>,
        result_type: ContextVariableType<T>,
    ) -> Self {
        Self::create(kernel, function, Some(result_type))
    }

    fn create(
        kernel: &Kernel,
        function: Arc<dyn KernelFunction>,
        result_type: Option<ContextVariableType<T>>,
    ) -> Self {
        let mut context_variable_types = kernel.context_variable_types().clone();
        if let Some(result_type) = &result_type {
            context_variable_types.put_variable_type(result_type);
        }
        Self {
            kernel: kernel.clone(),
            function,
            result_type,
            arguments: None,
            hooks: kernel.global_kernel_hooks().unmodifiable_clone(),
            prompt_execution_settings: None,
            tool_call_behavior: None,
            context_variable_types,
        }
    }

    /// Switch to a new result type, carrying over all other configuration
    pub fn with_result_type<U: ContextValue + Clone>(
        self,
        result_type: ContextVariableType<U>,
    ) -> FunctionInvocation<U> {
        let mut context_variable_types = self.context_variable_types;
        context_variable_types.put_variable_type(&result_type);
        FunctionInvocation {
            kernel: self.kernel,
            function: self.function,
            result_type: Some(result_type),
            arguments: self.arguments,
            hooks: self.hooks,
            prompt_execution_settings: self.prompt_execution_settings,
            tool_call_behavior: self.tool_call_behavior,
            context_variable_types,
        }
    }

    pub fn with_arguments(mut self, arguments: impl Into<Option<KernelFunctionArguments>>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn add_kernel_hook(mut self, hook: impl KernelHook + 'static) -> Self {
        let mut hooks = self.hooks.to_kernel_hooks();
        hooks.add_hook(hook);
        self.hooks = hooks.unmodifiable_clone();
        self
    }

    /// Merge additional hooks; `None` leaves the current hooks in place
    pub fn add_kernel_hooks<'a>(mut self, hooks: impl Into<Option<&'a KernelHooks>>) -> Self {
        if let Some(extra) = hooks.into() {
            let mut merged = self.hooks.to_kernel_hooks();
            merged.add_hooks(extra);
            self.hooks = merged.unmodifiable_clone();
        }
        self
    }

    pub fn with_prompt_execution_settings(
        mut self,
        settings: impl Into<Option<PromptExecutionSettings>>,
    ) -> Self {
        self.prompt_execution_settings = settings.into();
        self
    }

    pub fn with_tool_call_behavior(mut self, behavior: impl Into<Option<ToolCallBehavior>>) -> Self {
        self.tool_call_behavior = behavior.into();
        self
    }

    /// Register one more converter for this invocation
    pub fn with_type_converter<V: ContextValue + Clone>(
        mut self,
        variable_type: ContextVariableType<V>,
    ) -> Self {
        self.context_variable_types.put_variable_type(&variable_type);
        self
    }

    /// Merge a registry; its converters override the current ones
    pub fn with_types(mut self, types: &ContextVariableTypes) -> Self {
        self.context_variable_types.put_converters(types);
        self
    }

    pub fn function(&self) -> &Arc<dyn KernelFunction> {
        &self.function
    }

    pub fn result_type(&self) -> Option<&ContextVariableType<T>> {
        self.result_type.as_ref()
    }

    pub fn arguments(&self) -> Option<&KernelFunctionArguments> {
        self.arguments.as_ref()
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

    /// Snapshot of the current configuration
    pub fn invocation_context(&self) -> InvocationContext {
        InvocationContext::new(
            self.hooks.clone(),
            self.prompt_execution_settings.clone(),
            self.tool_call_behavior.clone(),
            self.context_variable_types.clone(),
        )
    }

    /// Start an evaluation from the configuration as it is now.
    ///
    /// Each call is an independent evaluation with its own snapshot.
    pub fn invoke(&self) -> BoxFuture<'static, Result<FunctionResult<T>>> {
        let context = self.invocation_context();
        let arguments = self.arguments.clone().unwrap_or_default();
        perform_invoke(
            self.kernel.clone(),
            Arc::clone(&self.function),
            arguments,
            self.result_type.clone(),
            context,
        )
        .boxed()
    }
}

async fn perform_invoke<T: ContextValue + Clone>(
    kernel: Kernel,
    function: Arc<dyn KernelFunction>,
    arguments: KernelFunctionArguments,
    result_type: Option<ContextVariableType<T>>,
    context: InvocationContext,
) -> Result<FunctionResult<T>> {
    let name = function.metadata().fully_qualified_name();
    let result_type = match result_type {
        Some(result_type) => result_type,
        None => {
            debug!(
                function = %name,
                "No result type was requested with with_result_type; \
                 the result is passed through unconverted and type mismatches surface at the point of use"
            );
            context
                .context_variable_types()
                .get_variable_type::<T>()
                .or_else(|| ContextVariableTypes::global().get_variable_type::<T>())
                .ok_or_else(|| SemkernelError::NoConverter(std::any::type_name::<T>().to_string()))?
        }
    };

    debug!(function = %name, result_type = %result_type.type_name(), "Invoking kernel function");
    let raw = function
        .invoke(&kernel, arguments, None, context)
        .await?;
    convert_result(raw, &result_type)
}

fn convert_result<T: ContextValue + Clone>(
    raw: FunctionResult<Object>,
    result_type: &ContextVariableType<T>,
) -> Result<FunctionResult<T>> {
    let (variable, metadata) = raw.into_parts();
    let value = variable.into_value();
    ContextVariable::convert(value.as_ref().map(Object::as_value), result_type)
        .map(|converted| FunctionResult::new(converted, metadata))
        .map_err(|source| SemkernelError::ResultConversion {
            type_name: result_type.type_name(),
            source: Box::new(source),
        })
}

impl<T: ContextValue + Clone> IntoFuture for FunctionInvocation<T> {
    type Output = Result<FunctionResult<T>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.invoke()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{FunctionInvokingEvent, FunctionInvokingHook};
    use crate::contextvariables::Number;
    use crate::orchestration::{KernelFunctionMetadata, NativeFunction};

    fn constant(value: &'static str) -> Arc<dyn KernelFunction> {
        NativeFunction::new(KernelFunctionMetadata::new("constant"), move |_, _| async move {
            Ok::<_, SemkernelError>(value.to_string())
        })
        .shared()
    }

    #[tokio::test]
    async fn test_untyped_passthrough() {
        let kernel = Kernel::builder().build();
        let result = FunctionInvocation::new(&kernel, constant("raw")).await.unwrap();
        assert_eq!(result.result().unwrap().downcast_ref::<String>().unwrap(), "raw");
    }

    #[tokio::test]
    async fn test_untyped_numeric_string_stays_string() {
        let kernel = Kernel::builder().build();
        let result = kernel.invoke(constant("42")).await.unwrap();
        let value = result.result().unwrap();

        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("42"));
        assert!(value.downcast_ref::<i32>().is_none());
        assert!(value.downcast_ref::<Number>().is_none());
    }

    #[tokio::test]
    async fn test_result_type_coerces() {
        let kernel = Kernel::builder().build();
        let result = kernel
            .invoke(constant("42"))
            .with_result_type(ContextVariableTypes::get_global_variable_type::<i32>().unwrap())
            .await
            .unwrap();
        assert_eq!(result.result(), Some(&42));
    }

    #[tokio::test]
    async fn test_conversion_failure_names_type() {
        let kernel = Kernel::builder().build();
        let err = kernel
            .invoke(constant("forty-two"))
            .with_result_type(ContextVariableTypes::get_global_variable_type::<i32>().unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to convert result to requested type: i32");
        assert!(matches!(err, SemkernelError::ResultConversion { .. }));
    }

    #[tokio::test]
    async fn test_with_result_type_carries_configuration() {
        let kernel = Kernel::builder().build();
        let arguments = KernelFunctionArguments::builder().with_input("x".to_string()).build();
        let invocation = kernel
            .invoke(constant("1"))
            .with_arguments(arguments)
            .add_kernel_hook(FunctionInvokingHook::new(|event: FunctionInvokingEvent| event))
            .with_prompt_execution_settings(PromptExecutionSettings::new().with_max_tokens(8))
            .with_tool_call_behavior(ToolCallBehavior::allow_all_kernel_functions(true))
            .with_result_type(ContextVariableTypes::get_global_variable_type::<bool>().unwrap());

        assert_eq!(invocation.arguments().map(|a| a.len()), Some(1));
        assert_eq!(invocation.kernel_hooks().len(), 1);
        assert_eq!(invocation.prompt_execution_settings().map(|s| s.max_tokens), Some(8));
        assert!(invocation.tool_call_behavior().is_some());
        assert_eq!(invocation.result_type().map(|t| t.type_name()), Some("bool".to_string()));
    }

    #[tokio::test]
    async fn test_snapshot_taken_per_evaluation() {
        let kernel = Kernel::builder().build();
        let base = kernel.invoke(constant("v"));
        let first = base.invoke();
        let base = base.add_kernel_hook(FunctionInvokingHook::new(|event: FunctionInvokingEvent| event));

        assert_eq!(base.kernel_hooks().len(), 1);
        assert!(first.await.is_ok());
        assert_eq!(base.invocation_context().kernel_hooks().len(), 1);
    }
}
