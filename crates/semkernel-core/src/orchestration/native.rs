//! Closure-backed kernel functions.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

use super::arguments::KernelFunctionArguments;
use super::context::InvocationContext;
use super::function::{KernelFunction, KernelFunctionMetadata, SharedKernelFunction};
use super::result::{FunctionResult, FunctionResultMetadata};
use crate::contextvariables::{ContextValue, ContextVariable, Object, TypeTag, object_type};
use crate::hooks::{FunctionInvokedEvent, FunctionInvokingEvent};
use crate::kernel::Kernel;
use crate::{Result, SemkernelError};

type NativeHandler = Arc<
    dyn Fn(KernelFunctionArguments, InvocationContext) -> BoxFuture<'static, Result<Object>>
        + Send
        + Sync,
>;

/// A kernel function implemented by an async Rust closure.
///
/// `FunctionInvoking` hooks may rewrite the arguments before the closure
/// runs, and `FunctionInvoked` hooks may rewrite the result afterwards.
pub struct NativeFunction {
    metadata: KernelFunctionMetadata,
    handler: NativeHandler,
}

impl NativeFunction {
    pub fn new<F, Fut, R>(metadata: KernelFunctionMetadata, handler: F) -> Self
    where
        F: Fn(KernelFunctionArguments, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: ContextValue,
    {
        let handler: NativeHandler = Arc::new(move |arguments: KernelFunctionArguments, context: InvocationContext| {
            handler(arguments, context)
                .map(|result| result.map(Object::new))
                .boxed()
        });
        Self { metadata, handler }
    }

    /// Function without a plugin name
    pub fn from_fn<F, Fut, R>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(KernelFunctionArguments, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: ContextValue,
    {
        Self::new(KernelFunctionMetadata::new(name), handler)
    }

    pub fn shared(self) -> SharedKernelFunction {
        Arc::new(self)
    }
}

#[async_trait]
impl KernelFunction for NativeFunction {
    fn metadata(&self) -> &KernelFunctionMetadata {
        &self.metadata
    }

    async fn invoke(
        &self,
        _kernel: &Kernel,
        arguments: KernelFunctionArguments,
        _result_type: Option<TypeTag>,
        context: InvocationContext,
    ) -> Result<FunctionResult<Object>> {
        let name = self.metadata.fully_qualified_name();
        let hooks = context.kernel_hooks().clone();

        let arguments = hooks
            .execute_hooks(
                FunctionInvokingEvent {
                    function: self.metadata.clone(),
                    arguments,
                }
                .into(),
            )
            .into_function_invoking()
            .ok_or_else(|| SemkernelError::function(&name, "hook replaced the FunctionInvoking event"))?
            .arguments;

        debug!(function = %name, arguments = arguments.len(), "Invoking native function");
        let value = (self.handler)(arguments.clone(), context).await?;

        let metadata = FunctionResultMetadata::new()
            .with_id(Uuid::new_v4().to_string())
            .with_created_at(Utc::now());
        let result = FunctionResult::new(ContextVariable::new(object_type(), value), metadata);

        let invoked = hooks
            .execute_hooks(
                FunctionInvokedEvent {
                    function: self.metadata.clone(),
                    arguments,
                    result,
                }
                .into(),
            )
            .into_function_invoked()
            .ok_or_else(|| SemkernelError::function(&name, "hook replaced the FunctionInvoked event"))?;

        debug!(function = %name, "Native function completed");
        Ok(invoked.result)
    }
}
