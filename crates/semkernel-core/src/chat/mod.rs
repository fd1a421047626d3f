//! Chat messages and conversation history.

pub mod history;
pub mod message;

pub use history::ChatHistory;
pub use message::{AuthorRole, ChatMessageContent, DEFAULT_ENCODING};
