//! Application layer for semkernel
//!
//! Wires a [`Kernel`] from configuration, keeps a catalog of kernel
//! functions by fully qualified name and offers a turn-based chat entry point.

use std::collections::BTreeMap;
use std::sync::Arc;

use semkernel_core::chat::DEFAULT_ENCODING;
use semkernel_core::{
    AuthorRole, ChatCompletionService, ChatHistory, CollectionConverter, ContextVariableTypes,
    FunctionInvocation, Kernel, KernelFunction, KernelFunctionArguments,
    KernelFunctionMetadata, KernelHook, KernelHooks, Object, SharedChatCompletionService,
    SharedKernelFunction,
};
use tracing::info;

use crate::config::SemkernelConfig;
use crate::error::{Result, SemkernelAppError};
use crate::functions::{ChatFunction, sample_functions};
use crate::services::EchoChatCompletion;

/// The main semkernel application
pub struct SemkernelApp {
    kernel: Kernel,
    functions: BTreeMap<String, SharedKernelFunction>,
    config: SemkernelConfig,
    metadata: AppMetadata,
}

/// Metadata about the semkernel application
#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
}

impl SemkernelApp {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> SemkernelAppBuilder {
        SemkernelAppBuilder::new(name)
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn config(&self) -> &SemkernelConfig {
        &self.config
    }

    /// Get app metadata
    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    /// Look up a function by fully qualified name (`plugin.name`)
    pub fn function(&self, name: &str) -> Result<SharedKernelFunction> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| SemkernelAppError::FunctionNotFound(name.to_string()))
    }

    /// Metadata of every registered function, sorted by name
    pub fn functions(&self) -> impl Iterator<Item = &KernelFunctionMetadata> {
        self.functions.values().map(|function| function.metadata())
    }

    /// Start an invocation with the configured execution settings applied
    pub fn invoke(&self, name: &str) -> Result<FunctionInvocation<Object>> {
        let function = self.function(name)?;
        Ok(self
            .kernel
            .invoke(function)
            .with_prompt_execution_settings(self.config.execution_settings.clone()))
    }

    /// Send one user turn and record both sides of the exchange in `history`
    pub async fn chat(&self, history: &mut ChatHistory, message: impl Into<String>) -> Result<String> {
        let message = message.into();
        let arguments = KernelFunctionArguments::builder()
            .with_input(message.clone())
            .with_variable(ChatFunction::HISTORY, history.clone())
            .build();

        let result = self
            .invoke(&chat_function_name())?
            .with_arguments(arguments)
            .with_result_type(ContextVariableTypes::get_global_variable_type::<String>()?)
            .await?;

        let (variable, metadata) = result.into_parts();
        let reply = variable.into_value().unwrap_or_default();
        history.add_user_message(message);
        history.add_message_with(
            AuthorRole::Assistant,
            reply.clone(),
            DEFAULT_ENCODING,
            Some(metadata),
        );
        Ok(reply)
    }
}

fn chat_function_name() -> String {
    format!("{}.{}", ChatFunction::PLUGIN_NAME, ChatFunction::FUNCTION_NAME)
}

/// Builder for creating semkernel applications
pub struct SemkernelAppBuilder {
    name: String,
    version: String,
    config: SemkernelConfig,
    functions: Vec<SharedKernelFunction>,
    services: Vec<SharedChatCompletionService>,
    hooks: KernelHooks,
    types: ContextVariableTypes,
    sample_functions: bool,
    echo_service: bool,
}

impl SemkernelAppBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: SemkernelConfig::default(),
            functions: Vec::new(),
            services: Vec::new(),
            hooks: KernelHooks::new(),
            types: ContextVariableTypes::new(),
            sample_functions: false,
            echo_service: false,
        }
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn config(mut self, config: SemkernelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn function(mut self, function: impl KernelFunction + 'static) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn shared_function(mut self, function: SharedKernelFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn service(mut self, service: impl ChatCompletionService + 'static) -> Self {
        self.services.push(Arc::new(service));
        self
    }

    pub fn shared_service(mut self, service: SharedChatCompletionService) -> Self {
        self.services.push(service);
        self
    }

    /// Hook applied to every invocation
    pub fn global_hook(mut self, hook: impl KernelHook + 'static) -> Self {
        self.hooks.add_hook(hook);
        self
    }

    /// Extra converters; they override the built-ins
    pub fn types(mut self, types: &ContextVariableTypes) -> Self {
        self.types.put_converters(types);
        self
    }

    /// Register `math.add`, `text.upper` and `text.split`
    pub fn with_sample_functions(mut self) -> Self {
        self.sample_functions = true;
        self
    }

    /// Register the offline echo service, using the configured reply prefix
    pub fn with_echo_service(mut self) -> Self {
        self.echo_service = true;
        self
    }

    /// Build the app
    pub fn build(self) -> Result<SemkernelApp> {
        let mut types = ContextVariableTypes::new();
        types.put_converter(CollectionConverter::new(self.config.collection_delimiter.as_str()).into_converter());
        types.put_converters(&self.types);

        let mut services = self.services;
        if self.echo_service {
            services.push(Arc::new(
                EchoChatCompletion::new().with_prefix(self.config.chat.echo_prefix.as_str()),
            ));
        }

        let kernel = services
            .into_iter()
            .fold(Kernel::builder(), |builder, service| builder.with_service(service))
            .with_global_hooks(&self.hooks)
            .with_types(&types)
            .build();

        let mut candidates: Vec<SharedKernelFunction> =
            vec![Arc::new(ChatFunction::new(self.config.chat.clone()))];
        if self.sample_functions {
            candidates.extend(sample_functions());
        }
        candidates.extend(self.functions);

        let mut functions = BTreeMap::new();
        for function in candidates {
            let name = function.metadata().fully_qualified_name();
            if functions.insert(name.clone(), function).is_some() {
                return Err(SemkernelAppError::Build(format!(
                    "function {name} is registered more than once"
                )));
            }
        }

        info!(
            app = %self.name,
            functions = functions.len(),
            services = kernel.services().len(),
            "Semkernel app built"
        );

        Ok(SemkernelApp {
            kernel,
            functions,
            config: self.config,
            metadata: AppMetadata {
                name: self.name,
                version: self.version,
            },
        })
    }
}
