use crate::chat::ChatHistory;
use crate::contextvariables::converter::{ContextVariableTypeConverter, escape_xml_string};

/// Renders each message as a `<message role="..">` element.
pub fn chat_history_converter() -> ContextVariableTypeConverter<ChatHistory> {
    ContextVariableTypeConverter::<ChatHistory>::builder()
        .to_prompt_string(|_, history: &ChatHistory| {
            history
                .iter()
                .map(|message| {
                    format!(
                        "<message role=\"{}\">{}</message>",
                        message.role,
                        escape_xml_string(&message.content)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .build()
}
