use crate::SemkernelError;
use crate::contextvariables::converter::ContextVariableTypeConverter;
use crate::contextvariables::number::Number;

/// Fallback converter for every primitive numeric type.
pub fn number_converter() -> ContextVariableTypeConverter<Number> {
    ContextVariableTypeConverter::<Number>::builder()
        .from_object(Number::from_value)
        .from_prompt_string(|s| s.parse::<Number>().map_err(|e| SemkernelError::parse("Number", s, e)))
        .build()
}
