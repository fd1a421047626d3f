//! Named arguments passed to kernel functions.

use std::fmt;
use std::sync::Arc;

use crate::contextvariables::{
    AnyContextVariable, ContextValue, ContextVariable, ContextVariableTypes, Object, object_type,
};
use crate::{Result, SemkernelError};

/// Name of the default argument
pub const INPUT: &str = "input";

/// Insertion-ordered map of argument names to context variables.
///
/// Names are matched case-insensitively; the casing of the first insert is kept.
#[derive(Clone, Default)]
pub struct KernelFunctionArguments {
    variables: Vec<(String, Arc<dyn AnyContextVariable>)>,
}

impl KernelFunctionArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> KernelFunctionArgumentsBuilder {
        KernelFunctionArgumentsBuilder::default()
    }

    /// Store a value under `name`.
    ///
    /// The value is typed with its globally registered converter, or held
    /// as an untyped `Object` when its type has none.
    pub fn put<T: ContextValue + Clone>(&mut self, name: impl Into<String>, value: T) {
        match ContextVariable::of(value.clone()) {
            Ok(variable) => self.put_variable(name, variable),
            Err(_) => self.put_variable(name, ContextVariable::new(object_type(), Object::new(value))),
        }
    }

    pub fn put_variable<T: ContextValue + Clone>(
        &mut self,
        name: impl Into<String>,
        variable: ContextVariable<T>,
    ) {
        self.put_shared(name, Arc::new(variable));
    }

    pub fn put_shared(&mut self, name: impl Into<String>, variable: Arc<dyn AnyContextVariable>) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.variables[index].1 = variable,
            None => self.variables.push((name, variable)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn AnyContextVariable> {
        self.position(name)
            .map(|index| self.variables[index].1.as_ref())
    }

    /// Read an argument coerced to `T`.
    ///
    /// Returns `Ok(None)` when the argument is absent or empty.
    pub fn get_as<T: ContextValue + Clone>(
        &self,
        name: &str,
        types: &ContextVariableTypes,
    ) -> Result<Option<T>> {
        let Some(variable) = self.get(name) else {
            return Ok(None);
        };
        let variable_type = types
            .get_variable_type::<T>()
            .or_else(|| ContextVariableTypes::global().get_variable_type::<T>())
            .ok_or_else(|| SemkernelError::NoConverter(std::any::type_name::<T>().to_string()))?;
        let value = variable.value_object();
        ContextVariable::convert(value.as_ref().map(Object::as_value), &variable_type)
            .map(ContextVariable::into_value)
    }

    pub fn input(&self) -> Option<&dyn AnyContextVariable> {
        self.get(INPUT)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn AnyContextVariable>> {
        let index = self.position(name)?;
        Some(self.variables.remove(index).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn AnyContextVariable)> {
        self.variables
            .iter()
            .map(|(name, variable)| (name.as_str(), variable.as_ref()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.variables
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for KernelFunctionArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.variables
                    .iter()
                    .map(|(name, variable)| (name, variable.display_string())),
            )
            .finish()
    }
}

#[derive(Default)]
pub struct KernelFunctionArgumentsBuilder {
    arguments: KernelFunctionArguments,
}

impl KernelFunctionArgumentsBuilder {
    pub fn with_input<T: ContextValue + Clone>(mut self, value: T) -> Self {
        self.arguments.put(INPUT, value);
        self
    }

    pub fn with_variable<T: ContextValue + Clone>(mut self, name: impl Into<String>, value: T) -> Self {
        self.arguments.put(name, value);
        self
    }

    pub fn with_context_variable<T: ContextValue + Clone>(
        mut self,
        name: impl Into<String>,
        variable: ContextVariable<T>,
    ) -> Self {
        self.arguments.put_variable(name, variable);
        self
    }

    pub fn build(self) -> KernelFunctionArguments {
        self.arguments
    }
}
