//! The kernel function abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::arguments::KernelFunctionArguments;
use super::context::InvocationContext;
use super::result::FunctionResult;
use super::tool_call::qualified_name;
use crate::Result;
use crate::contextvariables::{Object, TypeTag};
use crate::kernel::Kernel;

/// Description of one function parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVariable {
    pub name: String,
    pub description: Option<String>,
    pub type_name: String,
    pub is_required: bool,
    pub default: Option<String>,
}

impl InputVariable {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_required: true,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self, default: Option<String>) -> Self {
        self.is_required = false;
        self.default = default;
        self
    }
}

/// Metadata about a kernel function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelFunctionMetadata {
    pub plugin_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<InputVariable>,
    pub return_type: Option<String>,
}

impl KernelFunctionMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.plugin_name = Some(plugin_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: InputVariable) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// `plugin.name`, or just `name` without a plugin
    pub fn fully_qualified_name(&self) -> String {
        qualified_name(self.plugin_name.as_deref(), &self.name)
    }
}

/// A unit of work the kernel can invoke.
///
/// Implementations receive an immutable [`InvocationContext`] snapshot and
/// produce an untyped result; callers coerce it to the type they asked for.
#[async_trait]
pub trait KernelFunction: Send + Sync {
    fn metadata(&self) -> &KernelFunctionMetadata;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn plugin_name(&self) -> Option<&str> {
        self.metadata().plugin_name.as_deref()
    }

    async fn invoke(
        &self,
        kernel: &Kernel,
        arguments: KernelFunctionArguments,
        result_type: Option<TypeTag>,
        context: InvocationContext,
    ) -> Result<FunctionResult<Object>>;
}

/// Arc-wrapped function for thread-safe sharing
pub type SharedKernelFunction = Arc<dyn KernelFunction>;
