//! Registry of context variable converters keyed by semantic type.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::converter::{ContextVariableConverter, ContextVariableTypeConverter};
use super::converters;
use super::value::{ContextValue, TypeTag};
use super::variable_type::ContextVariableType;
use crate::{Result, SemkernelError};

/// Converter registry.
///
/// Cloning copies the map; the converters themselves are shared.
#[derive(Clone, Default)]
pub struct ContextVariableTypes {
    types: HashMap<TypeTag, Arc<dyn ContextVariableConverter>>,
}

static GLOBAL_TYPES: OnceLock<ContextVariableTypes> = OnceLock::new();

impl ContextVariableTypes {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in converters
    pub fn with_defaults() -> Self {
        let mut types = Self::new();
        for converter in converters::defaults() {
            types.put_erased(converter);
        }
        types
    }

    /// Process-wide registry of built-in converters, initialised on first use
    pub fn global() -> &'static ContextVariableTypes {
        GLOBAL_TYPES.get_or_init(|| {
            debug!("Initialising global context variable types");
            Self::with_defaults()
        })
    }

    pub fn get_global_variable_type<T: ContextValue + Clone>() -> Result<ContextVariableType<T>> {
        Self::global()
            .get_variable_type::<T>()
            .ok_or_else(|| SemkernelError::NoConverter(TypeTag::of::<T>().short_name()))
    }

    pub fn get_global_variable_type_for_class(
        tag: &TypeTag,
    ) -> Option<Arc<dyn ContextVariableConverter>> {
        Self::global().get_variable_type_for_class(tag)
    }

    /// Register a converter, replacing any previous one for the same type
    pub fn put_converter<T: ContextValue + Clone>(&mut self, converter: ContextVariableTypeConverter<T>) {
        self.put_erased(Arc::new(converter));
    }

    pub fn put_variable_type<T: ContextValue + Clone>(&mut self, variable_type: &ContextVariableType<T>) {
        self.put_erased(variable_type.shared_converter());
    }

    pub fn put_erased(&mut self, converter: Arc<dyn ContextVariableConverter>) {
        self.types.insert(converter.type_tag(), converter);
    }

    /// Merge another registry; its entries override local ones
    pub fn put_converters(&mut self, other: &ContextVariableTypes) {
        for (tag, converter) in &other.types {
            self.types.insert(*tag, Arc::clone(converter));
        }
    }

    /// Typed lookup for the exact type `T`
    pub fn get_variable_type<T: ContextValue + Clone>(&self) -> Option<ContextVariableType<T>> {
        let converter = self.types.get(&TypeTag::of::<T>())?;
        Arc::clone(converter)
            .into_any()
            .downcast::<ContextVariableTypeConverter<T>>()
            .ok()
            .map(ContextVariableType::from_shared)
    }

    /// Exact match first, then a breadth-first walk of the declared supertypes.
    pub fn get_variable_type_for_class(
        &self,
        tag: &TypeTag,
    ) -> Option<Arc<dyn ContextVariableConverter>> {
        if let Some(converter) = self.types.get(tag) {
            return Some(Arc::clone(converter));
        }

        let mut visited = HashSet::from([*tag]);
        let mut queue: VecDeque<TypeTag> = tag.supertypes().into();
        while let Some(candidate) = queue.pop_front() {
            if !visited.insert(candidate) {
                continue;
            }
            if let Some(converter) = self.types.get(&candidate) {
                return Some(Arc::clone(converter));
            }
            queue.extend(candidate.supertypes());
        }
        None
    }

    pub fn get_variable_type_for_value(
        &self,
        value: &dyn ContextValue,
    ) -> Option<Arc<dyn ContextVariableConverter>> {
        self.get_variable_type_for_class(&value.type_tag())
    }

    /// Render any value: typed boxes render themselves, then the matching
    /// converter is tried, then the generic string form.
    pub fn to_prompt_string(&self, value: &dyn ContextValue) -> String {
        if let Some(variable) = value.as_context_variable() {
            return variable.to_prompt_string(self);
        }
        self.get_variable_type_for_value(value)
            .and_then(|converter| converter.to_prompt_string_erased(self, value))
            .unwrap_or_else(|| value.display_string())
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.types.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types, sorted by name
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.types.keys().copied().collect();
        tags.sort_by_key(|tag| tag.short_name());
        tags
    }
}

impl fmt::Debug for ContextVariableTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.tags().iter().map(TypeTag::short_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contextvariables::{Collection, Number, Object};

    #[test]
    fn test_global_has_builtins() {
        let global = ContextVariableTypes::global();
        for tag in [
            TypeTag::of::<String>(),
            TypeTag::of::<bool>(),
            TypeTag::of::<i32>(),
            TypeTag::of::<f64>(),
            TypeTag::of::<Number>(),
            TypeTag::of::<Collection>(),
            TypeTag::of::<Object>(),
        ] {
            assert!(global.contains(&tag), "missing {}", tag);
        }
    }

    #[test]
    fn test_supertype_resolution() {
        let types = ContextVariableTypes::with_defaults();

        let converter = types
            .get_variable_type_for_class(&TypeTag::of::<u16>())
            .unwrap();
        assert_eq!(converter.type_tag(), TypeTag::of::<Number>());

        let converter = types
            .get_variable_type_for_class(&TypeTag::of::<Vec<bool>>())
            .unwrap();
        assert_eq!(converter.type_tag(), TypeTag::of::<Collection>());
    }

    #[test]
    fn test_unresolvable_type() {
        let empty = ContextVariableTypes::new();
        assert!(empty.get_variable_type_for_class(&TypeTag::of::<u8>()).is_none());
        assert_eq!(empty.to_prompt_string(&3_u8), "3");

        // typed lookup never walks supertypes
        let types = ContextVariableTypes::with_defaults();
        assert!(types.get_variable_type::<Vec<u8>>().is_none());
    }

    #[test]
    fn test_put_converter_last_write_wins() {
        let mut types = ContextVariableTypes::with_defaults();
        types.put_converter(
            ContextVariableTypeConverter::<bool>::builder()
                .to_prompt_string(|_, b| if *b { "yes".into() } else { "no".into() })
                .build(),
        );

        assert_eq!(types.to_prompt_string(&true), "yes");
        assert_eq!(ContextVariableTypes::global().to_prompt_string(&true), "true");
    }

    #[test]
    fn test_put_converters_incoming_overrides() {
        let mut base = ContextVariableTypes::with_defaults();
        let mut incoming = ContextVariableTypes::new();
        incoming.put_converter(
            ContextVariableTypeConverter::<i32>::builder()
                .to_prompt_string(|_, i| format!("#{}", i))
                .build(),
        );

        base.put_converters(&incoming);
        assert_eq!(base.to_prompt_string(&7_i32), "#7");
        assert_eq!(base.len(), ContextVariableTypes::global().len());
    }

    #[test]
    fn test_typed_lookup() {
        let types = ContextVariableTypes::with_defaults();
        let int_type = types.get_variable_type::<i32>().unwrap();
        assert_eq!(int_type.type_name(), "i32");
        assert_eq!(int_type.converter().from_prompt_string("12").unwrap(), 12);
    }
}
