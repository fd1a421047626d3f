//! Typed, immutable context variables.

use std::any::Any;
use std::fmt;

use super::types::ContextVariableTypes;
use super::value::{ContextValue, Object, TypeTag};
use super::variable_type::ContextVariableType;
use crate::{Result, SemkernelError};

/// Type-erased view of a [`ContextVariable`].
pub trait AnyContextVariable: ContextValue {
    fn variable_type_tag(&self) -> TypeTag;

    /// The held value, `None` for an empty variable
    fn value_object(&self) -> Option<Object>;

    fn to_prompt_string(&self, types: &ContextVariableTypes) -> String;
}

/// A value paired with the semantic type that knows how to convert it.
pub struct ContextVariable<T> {
    variable_type: ContextVariableType<T>,
    value: Option<T>,
}

impl<T> ContextVariable<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn variable_type(&self) -> &ContextVariableType<T> {
        &self.variable_type
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T: ContextValue + Clone> ContextVariable<T> {
    pub fn new(variable_type: ContextVariableType<T>, value: T) -> Self {
        Self {
            variable_type,
            value: Some(value),
        }
    }

    pub fn empty(variable_type: ContextVariableType<T>) -> Self {
        Self {
            variable_type,
            value: None,
        }
    }

    /// Wrap a value using the converter registered in the global registry
    pub fn of(value: T) -> Result<Self> {
        let variable_type = ContextVariableTypes::get_global_variable_type::<T>()?;
        Ok(Self::new(variable_type, value))
    }

    /// Render the value with this variable's converter; empty renders as `""`
    pub fn to_prompt_string(&self, types: &ContextVariableTypes) -> String {
        match &self.value {
            Some(value) => self.variable_type.converter().to_prompt_string(types, value),
            None => String::new(),
        }
    }

    /// Coerce an arbitrary value into a variable of the requested type.
    ///
    /// Typed boxes are unwrapped first. Values already of type `T` pass
    /// through; otherwise the target converter's `from_object` is tried, and
    /// strings fall back to `from_prompt_string`.
    pub fn convert(
        value: Option<&dyn ContextValue>,
        requested: &ContextVariableType<T>,
    ) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::empty(requested.clone()));
        };

        let mut current = value.clone_object();
        loop {
            let inner = match current.as_context_variable() {
                Some(variable) => variable.value_object(),
                None => break,
            };
            match inner {
                Some(inner) => current = inner,
                None => return Ok(Self::empty(requested.clone())),
            }
        }

        if let Some(same) = current.downcast_ref::<T>() {
            return Ok(Self::new(requested.clone(), same.clone()));
        }

        let converter = requested.converter();
        if let Some(converted) = converter.from_object(current.as_value()) {
            return Ok(Self::new(requested.clone(), converted));
        }

        if let Some(s) = current.downcast_ref::<String>() {
            let parsed = converter.from_prompt_string(s)?;
            return Ok(Self::new(requested.clone(), parsed));
        }

        Err(SemkernelError::Conversion {
            from: current.type_tag().short_name(),
            to: requested.type_name(),
        })
    }
}

impl<T: Clone> Clone for ContextVariable<T> {
    fn clone(&self) -> Self {
        Self {
            variable_type: self.variable_type.clone(),
            value: self.value.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ContextVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextVariable")
            .field("type", &self.variable_type.type_tag())
            .field("value", &self.value)
            .finish()
    }
}

impl<T: ContextValue + Clone> ContextValue for ContextVariable<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn clone_object(&self) -> Object {
        Object::new(self.clone())
    }

    fn display_string(&self) -> String {
        self.value
            .as_ref()
            .map(ContextValue::display_string)
            .unwrap_or_default()
    }

    fn as_context_variable(&self) -> Option<&dyn AnyContextVariable> {
        Some(self)
    }
}

impl<T: ContextValue + Clone> AnyContextVariable for ContextVariable<T> {
    fn variable_type_tag(&self) -> TypeTag {
        self.variable_type.type_tag()
    }

    fn value_object(&self) -> Option<Object> {
        self.value.as_ref().map(ContextValue::clone_object)
    }

    fn to_prompt_string(&self, types: &ContextVariableTypes) -> String {
        ContextVariable::to_prompt_string(self, types)
    }
}
