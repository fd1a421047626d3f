//! Converters between context values, prompt strings and typed values.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use super::types::ContextVariableTypes;
use super::value::{ContextValue, Object, TypeTag};
use crate::{Result, SemkernelError};

pub type ToPromptStringFn<T> = Arc<dyn Fn(&ContextVariableTypes, &T) -> String + Send + Sync>;
pub type FromObjectFn<T> = Arc<dyn Fn(&dyn ContextValue) -> Option<T> + Send + Sync>;
pub type FromPromptStringFn<T> = Arc<dyn Fn(&str) -> Result<T> + Send + Sync>;

/// Pure conversion functions for one target type `T`.
pub struct ContextVariableTypeConverter<T> {
    type_tag: TypeTag,
    to_prompt_string: ToPromptStringFn<T>,
    from_object: FromObjectFn<T>,
    from_prompt_string: FromPromptStringFn<T>,
}

impl<T> ContextVariableTypeConverter<T> {
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Render a value for inclusion in a prompt
    pub fn to_prompt_string(&self, types: &ContextVariableTypes, value: &T) -> String {
        (self.to_prompt_string)(types, value)
    }

    /// Best-effort coercion of an arbitrary value, `None` on mismatch
    pub fn from_object(&self, value: &dyn ContextValue) -> Option<T> {
        (self.from_object)(value)
    }

    pub fn from_prompt_string(&self, s: &str) -> Result<T> {
        (self.from_prompt_string)(s)
    }
}

impl<T: ContextValue + Clone> ContextVariableTypeConverter<T> {
    pub fn builder() -> ConverterBuilder<T> {
        ConverterBuilder::new()
    }
}

impl<T> fmt::Debug for ContextVariableTypeConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextVariableTypeConverter")
            .field("type", &self.type_tag)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ContextVariableTypeConverter`].
///
/// Unset functions fall back to: render through `display_string`, coerce
/// only values already of type `T`, and refuse to parse prompt strings.
pub struct ConverterBuilder<T> {
    to_prompt_string: Option<ToPromptStringFn<T>>,
    from_object: Option<FromObjectFn<T>>,
    from_prompt_string: Option<FromPromptStringFn<T>>,
}

impl<T: ContextValue + Clone> ConverterBuilder<T> {
    fn new() -> Self {
        Self {
            to_prompt_string: None,
            from_object: None,
            from_prompt_string: None,
        }
    }

    pub fn to_prompt_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&ContextVariableTypes, &T) -> String + Send + Sync + 'static,
    {
        self.to_prompt_string = Some(Arc::new(f));
        self
    }

    pub fn from_object<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ContextValue) -> Option<T> + Send + Sync + 'static,
    {
        self.from_object = Some(Arc::new(f));
        self
    }

    pub fn from_prompt_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        self.from_prompt_string = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> ContextVariableTypeConverter<T> {
        ContextVariableTypeConverter {
            type_tag: TypeTag::of::<T>(),
            to_prompt_string: self.to_prompt_string.unwrap_or_else(|| {
                Arc::new(|_: &ContextVariableTypes, value: &T| value.display_string())
            }),
            from_object: self.from_object.unwrap_or_else(|| {
                Arc::new(|value: &dyn ContextValue| value.as_any().downcast_ref::<T>().cloned())
            }),
            from_prompt_string: self.from_prompt_string.unwrap_or_else(|| {
                Arc::new(|_: &str| -> Result<T> {
                    Err(SemkernelError::Unsupported(format!(
                        "{} cannot be parsed from a prompt string",
                        type_name::<T>()
                    )))
                })
            }),
        }
    }
}

/// Type-erased view of a converter, as stored in the registry.
pub trait ContextVariableConverter: Send + Sync + fmt::Debug {
    fn type_tag(&self) -> TypeTag;

    /// Render any value, coercing it to the target type first.
    /// `None` when the value cannot be coerced.
    fn to_prompt_string_erased(
        &self,
        types: &ContextVariableTypes,
        value: &dyn ContextValue,
    ) -> Option<String>;

    fn from_object_erased(&self, value: &dyn ContextValue) -> Option<Object>;

    fn from_prompt_string_erased(&self, s: &str) -> Result<Object>;

    /// Recover the typed converter through `Arc::downcast`
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: ContextValue + Clone> ContextVariableConverter for ContextVariableTypeConverter<T> {
    fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    fn to_prompt_string_erased(
        &self,
        types: &ContextVariableTypes,
        value: &dyn ContextValue,
    ) -> Option<String> {
        match value.as_any().downcast_ref::<T>() {
            Some(typed) => Some(self.to_prompt_string(types, typed)),
            None => self
                .from_object(value)
                .map(|typed| self.to_prompt_string(types, &typed)),
        }
    }

    fn from_object_erased(&self, value: &dyn ContextValue) -> Option<Object> {
        self.from_object(value).map(Object::new)
    }

    fn from_prompt_string_erased(&self, s: &str) -> Result<Object> {
        self.from_prompt_string(s).map(Object::new)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

const XML_ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Escape `& < > " '` so the string can be embedded in prompt markup.
pub fn escape_xml_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match XML_ENTITIES.iter().find(|(_, raw)| *raw == c) {
            Some((entity, _)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_xml_string`]. Unknown entities are left untouched.
pub fn unescape_xml_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match XML_ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, raw)) => {
                out.push(*raw);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
