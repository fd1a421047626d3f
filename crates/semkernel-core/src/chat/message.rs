use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::orchestration::FunctionResultMetadata;

/// Default text encoding recorded on chat messages
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Role of a chat message author
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AuthorRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageContent {
    pub role: AuthorRole,
    pub content: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FunctionResultMetadata>,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl ChatMessageContent {
    pub fn new(role: AuthorRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            encoding: default_encoding(),
            model_id: None,
            metadata: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(AuthorRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(AuthorRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(AuthorRole::Assistant, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(AuthorRole::Tool, content)
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: FunctionResultMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl fmt::Display for ChatMessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
