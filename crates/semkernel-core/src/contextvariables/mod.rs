//! Context variables: typed values, their converters and the converter registry.

pub mod converter;
pub mod converters;
pub mod number;
pub mod types;
pub mod value;
pub mod variable;
pub mod variable_type;

pub use converter::{
    ContextVariableConverter, ContextVariableTypeConverter, ConverterBuilder, escape_xml_string,
    unescape_xml_string,
};
pub use converters::{CollectionConverter, object_type};
pub use number::Number;
pub use types::ContextVariableTypes;
pub use value::{Collection, ContextValue, Object, TypeTag};
pub use variable::{AnyContextVariable, ContextVariable};
pub use variable_type::ContextVariableType;
