//! A semantic type paired with its converter.

use std::fmt;
use std::sync::Arc;

use super::converter::ContextVariableTypeConverter;
use super::value::{ContextValue, TypeTag};

pub struct ContextVariableType<T> {
    converter: Arc<ContextVariableTypeConverter<T>>,
}

impl<T> ContextVariableType<T> {
    pub fn type_tag(&self) -> TypeTag {
        self.converter.type_tag()
    }

    /// Readable type name, e.g. `i32`
    pub fn type_name(&self) -> String {
        self.converter.type_tag().short_name()
    }

    pub fn converter(&self) -> &ContextVariableTypeConverter<T> {
        &self.converter
    }

    pub(crate) fn shared_converter(&self) -> Arc<ContextVariableTypeConverter<T>> {
        Arc::clone(&self.converter)
    }
}

impl<T: ContextValue + Clone> ContextVariableType<T> {
    pub fn new(converter: ContextVariableTypeConverter<T>) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    pub fn from_shared(converter: Arc<ContextVariableTypeConverter<T>>) -> Self {
        Self { converter }
    }
}

impl<T> Clone for ContextVariableType<T> {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
        }
    }
}

impl<T> fmt::Debug for ContextVariableType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextVariableType")
            .field(&self.type_tag())
            .finish()
    }
}

impl<T: ContextValue + Clone> From<ContextVariableTypeConverter<T>> for ContextVariableType<T> {
    fn from(converter: ContextVariableTypeConverter<T>) -> Self {
        Self::new(converter)
    }
}
