//! The kernel: shared hooks, services and converters for function invocation.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::contextvariables::{ContextVariableTypes, Object};
use crate::hooks::{KernelHook, KernelHooks};
use crate::orchestration::{FunctionInvocation, KernelFunction};
use crate::services::SharedChatCompletionService;
use crate::{Result, SemkernelError};

/// Cheaply clonable kernel handle
#[derive(Clone)]
pub struct Kernel {
    inner: Arc<KernelInner>,
}

struct KernelInner {
    version: String,
    global_hooks: KernelHooks,
    services: Vec<SharedChatCompletionService>,
    types: ContextVariableTypes,
}

impl Kernel {
    /// Create a kernel with no services and the built-in converters
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> KernelBuilder {
        KernelBuilder::default()
    }

    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Hooks applied to every invocation started from this kernel
    pub fn global_kernel_hooks(&self) -> &KernelHooks {
        &self.inner.global_hooks
    }

    pub fn context_variable_types(&self) -> &ContextVariableTypes {
        &self.inner.types
    }

    pub fn services(&self) -> &[SharedChatCompletionService] {
        &self.inner.services
    }

    /// Select a chat completion service by id, or the first registered one
    pub fn get_chat_completion_service(
        &self,
        service_id: Option<&str>,
    ) -> Result<SharedChatCompletionService> {
        let service = match service_id {
            Some(id) => self.inner.services.iter().find(|s| s.service_id() == id),
            None => self.inner.services.first(),
        };
        service.cloned().ok_or_else(|| {
            SemkernelError::ServiceNotFound(service_id.unwrap_or("<default>").to_string())
        })
    }

    /// Start building an invocation of `function`
    pub fn invoke(&self, function: Arc<dyn KernelFunction>) -> FunctionInvocation<Object> {
        FunctionInvocation::new(self, function)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("version", &self.inner.version)
            .field("global_hooks", &self.inner.global_hooks)
            .field(
                "services",
                &self
                    .inner
                    .services
                    .iter()
                    .map(|s| s.service_id())
                    .collect::<Vec<_>>(),
            )
            .field("types", &self.inner.types)
            .finish()
    }
}

#[derive(Default)]
pub struct KernelBuilder {
    global_hooks: KernelHooks,
    services: Vec<SharedChatCompletionService>,
    types: ContextVariableTypes,
}

impl KernelBuilder {
    pub fn with_global_hook(mut self, hook: impl KernelHook + 'static) -> Self {
        self.global_hooks.add_hook(hook);
        self
    }

    pub fn with_global_hooks(mut self, hooks: &KernelHooks) -> Self {
        self.global_hooks.add_hooks(hooks);
        self
    }

    /// Register a chat completion service; a later service with the same id replaces the earlier one
    pub fn with_service(mut self, service: SharedChatCompletionService) -> Self {
        match self
            .services
            .iter()
            .position(|s| s.service_id() == service.service_id())
        {
            Some(index) => self.services[index] = service,
            None => self.services.push(service),
        }
        self
    }

    /// Converters layered on top of the built-ins
    pub fn with_types(mut self, types: &ContextVariableTypes) -> Self {
        self.types.put_converters(types);
        self
    }

    pub fn build(self) -> Kernel {
        let mut types = ContextVariableTypes::with_defaults();
        types.put_converters(&self.types);
        debug!(
            hooks = self.global_hooks.len(),
            services = self.services.len(),
            "Building kernel"
        );
        Kernel {
            inner: Arc::new(KernelInner {
                version: env!("CARGO_PKG_VERSION").to_string(),
                global_hooks: self.global_hooks,
                services: self.services,
                types,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatHistory, ChatMessageContent};
    use crate::orchestration::InvocationContext;
    use crate::services::ChatCompletionService;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl ChatCompletionService for Named {
        fn service_id(&self) -> &str {
            self.0
        }

        async fn get_chat_message_contents(
            &self,
            _chat_history: &ChatHistory,
            _kernel: &Kernel,
            _context: &InvocationContext,
        ) -> Result<Vec<ChatMessageContent>> {
            Ok(vec![ChatMessageContent::assistant(self.0)])
        }
    }

    #[test]
    fn test_service_selection() {
        let kernel = Kernel::builder()
            .with_service(Arc::new(Named("a")))
            .with_service(Arc::new(Named("b")))
            .build();

        assert_eq!(kernel.get_chat_completion_service(None).unwrap().service_id(), "a");
        assert_eq!(kernel.get_chat_completion_service(Some("b")).unwrap().service_id(), "b");
        assert!(matches!(
            kernel.get_chat_completion_service(Some("c")),
            Err(SemkernelError::ServiceNotFound(_))
        ));
        assert!(Kernel::new().get_chat_completion_service(None).is_err());
    }

    #[test]
    fn test_kernel_has_builtin_types() {
        let kernel = Kernel::new();
        assert_eq!(
            kernel.context_variable_types().len(),
            ContextVariableTypes::global().len()
        );
        assert_eq!(kernel.version(), env!("CARGO_PKG_VERSION"));
    }
}
