use std::sync::OnceLock;

use crate::contextvariables::converter::ContextVariableTypeConverter;
use crate::contextvariables::value::Object;
use crate::contextvariables::variable_type::ContextVariableType;

/// Accepts any value and renders it through the registry fallback chain.
pub fn object_converter() -> ContextVariableTypeConverter<Object> {
    ContextVariableTypeConverter::<Object>::builder()
        .to_prompt_string(|types, object: &Object| types.to_prompt_string(object.as_value()))
        .from_object(|value| Some(value.clone_object()))
        .from_prompt_string(|s| Ok(Object::new(s.to_string())))
        .build()
}

/// Shared `Object` variable type used for untyped function results
pub fn object_type() -> ContextVariableType<Object> {
    static OBJECT_TYPE: OnceLock<ContextVariableType<Object>> = OnceLock::new();
    OBJECT_TYPE
        .get_or_init(|| ContextVariableType::new(object_converter()))
        .clone()
}
