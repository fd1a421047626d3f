use crate::SemkernelError;
use crate::contextvariables::converter::{ContextVariableTypeConverter, escape_xml_string};
use crate::contextvariables::types::ContextVariableTypes;
use crate::contextvariables::value::{Collection, Object};

pub const DEFAULT_DELIMITER: &str = ",";

/// Renders collections as a delimited, XML-escaped list.
///
/// Each element is rendered on its own first: typed boxes render
/// themselves, other values go through the converter registered for their
/// runtime type (or one of its supertypes) and finally their display form.
/// Collections cannot be parsed back from a prompt string.
#[derive(Debug, Clone)]
pub struct CollectionConverter {
    delimiter: String,
}

impl CollectionConverter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn render(&self, types: &ContextVariableTypes, elements: &[Object]) -> String {
        let joined = elements
            .iter()
            .map(|element| types.to_prompt_string(element.as_value()))
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        escape_xml_string(&joined)
    }

    pub fn into_converter(self) -> ContextVariableTypeConverter<Collection> {
        ContextVariableTypeConverter::<Collection>::builder()
            .to_prompt_string(move |types, elements: &Collection| self.render(types, elements))
            .from_object(|value| value.elements())
            .from_prompt_string(|_| {
                Err(SemkernelError::Unsupported(
                    "collections cannot be parsed from a prompt string".to_string(),
                ))
            })
            .build()
    }
}

impl Default for CollectionConverter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl From<CollectionConverter> for ContextVariableTypeConverter<Collection> {
    fn from(converter: CollectionConverter) -> Self {
        converter.into_converter()
    }
}
