//! Built-in converters registered in every default registry.

mod chat_history;
mod collection;
mod datetime;
mod number;
mod object;
mod primitives;

use std::sync::Arc;

pub use chat_history::chat_history_converter;
pub use collection::{CollectionConverter, DEFAULT_DELIMITER};
pub use datetime::datetime_converter;
pub use number::number_converter;
pub use object::{object_converter, object_type};
pub use primitives::{
    bool_converter, char_converter, f32_converter, f64_converter, i32_converter, i64_converter,
    string_converter, unit_converter,
};

use super::converter::ContextVariableConverter;

/// Converters installed by [`ContextVariableTypes::with_defaults`](super::ContextVariableTypes::with_defaults)
pub fn defaults() -> Vec<Arc<dyn ContextVariableConverter>> {
    vec![
        Arc::new(string_converter()),
        Arc::new(bool_converter()),
        Arc::new(char_converter()),
        Arc::new(i32_converter()),
        Arc::new(i64_converter()),
        Arc::new(f32_converter()),
        Arc::new(f64_converter()),
        Arc::new(unit_converter()),
        Arc::new(number_converter()),
        Arc::new(CollectionConverter::default().into_converter()),
        Arc::new(datetime_converter()),
        Arc::new(chat_history_converter()),
        Arc::new(object_converter()),
    ]
}
