//! Ordered, append-only conversation history.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::message::{AuthorRole, ChatMessageContent};
use crate::contextvariables::{ContextValue, Object, TypeTag};
use crate::orchestration::FunctionResultMetadata;

/// Chat messages in the order they were added.
///
/// Roles are not validated. Iterating borrows the history, so an iterator
/// always observes the messages present when it was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessageContent>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history seeded with one system message, even when it is empty.
    /// Use [`ChatHistory::new`] for a history without instructions.
    pub fn with_instructions(instructions: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.add_system_message(instructions);
        history
    }

    pub fn from_messages(messages: impl IntoIterator<Item = ChatMessageContent>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    /// Read-only view of the messages
    pub fn messages(&self) -> &[ChatMessageContent] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessageContent> {
        self.messages.last()
    }

    /// Most recent message with the given role
    pub fn last_message_by_role(&self, role: AuthorRole) -> Option<&ChatMessageContent> {
        self.messages.iter().rev().find(|message| message.role == role)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessageContent> {
        self.messages.iter()
    }

    pub fn add_message(&mut self, role: AuthorRole, content: impl Into<String>) -> &mut Self {
        self.add_message_content(ChatMessageContent::new(role, content))
    }

    pub fn add_message_with(
        &mut self,
        role: AuthorRole,
        content: impl Into<String>,
        encoding: impl Into<String>,
        metadata: Option<FunctionResultMetadata>,
    ) -> &mut Self {
        let mut message = ChatMessageContent::new(role, content).with_encoding(encoding);
        message.metadata = metadata;
        self.add_message_content(message)
    }

    pub fn add_message_content(&mut self, message: ChatMessageContent) -> &mut Self {
        self.messages.push(message);
        self
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_message(AuthorRole::User, content)
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_message(AuthorRole::Assistant, content)
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_message(AuthorRole::System, content)
    }

    /// Append every message of another history, keeping their order
    pub fn add_all(&mut self, other: &ChatHistory) -> &mut Self {
        self.messages.extend(other.messages.iter().cloned());
        self
    }

    pub fn add_all_messages(
        &mut self,
        messages: impl IntoIterator<Item = ChatMessageContent>,
    ) -> &mut Self {
        self.messages.extend(messages);
        self
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatMessageContent;
    type IntoIter = std::slice::Iter<'a, ChatMessageContent>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for ChatHistory {
    type Item = ChatMessageContent;
    type IntoIter = std::vec::IntoIter<ChatMessageContent>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl FromIterator<ChatMessageContent> for ChatHistory {
    fn from_iter<I: IntoIterator<Item = ChatMessageContent>>(iter: I) -> Self {
        Self::from_messages(iter)
    }
}

impl Extend<ChatMessageContent> for ChatHistory {
    fn extend<I: IntoIterator<Item = ChatMessageContent>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

impl ContextValue for ChatHistory {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn clone_object(&self) -> Object {
        Object::new(self.clone())
    }

    fn display_string(&self) -> String {
        self.messages
            .iter()
            .map(|message| format!("{}: {}", message.role, message.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instructions_seed_system_message() {
        let history = ChatHistory::with_instructions("You are terse.");
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0], ChatMessageContent::system("You are terse."));

        let empty = ChatHistory::with_instructions("");
        assert_eq!(empty.messages(), &[ChatMessageContent::system("")]);
        assert!(ChatHistory::new().is_empty());
    }

    #[test]
    fn test_append_order() {
        let mut history = ChatHistory::new();
        history
            .add_user_message("hi")
            .add_assistant_message("hello")
            .add_message(AuthorRole::Tool, "{}");

        let roles: Vec<AuthorRole> = history.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![AuthorRole::User, AuthorRole::Assistant, AuthorRole::Tool]);
        assert_eq!(history.last_message().unwrap().content, "{}");
        assert_eq!(
            history.last_message_by_role(AuthorRole::User).unwrap().content,
            "hi"
        );
    }

    #[test]
    fn test_add_all_preserves_order() {
        let mut first = ChatHistory::with_instructions("sys");
        let mut second = ChatHistory::new();
        second.add_user_message("a").add_user_message("b");

        first.add_all(&second);
        let contents: Vec<&str> = first.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "a", "b"]);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_add_message_with_metadata() {
        let mut history = ChatHistory::new();
        let metadata = FunctionResultMetadata::new().with_id("m-1");
        history.add_message_with(AuthorRole::Assistant, "ok", "utf-16", Some(metadata.clone()));

        let message = history.last_message().unwrap();
        assert_eq!(message.encoding, "utf-16");
        assert_eq!(message.metadata, Some(metadata));
    }

    #[test]
    fn test_snapshot_iteration() {
        let mut history = ChatHistory::new();
        history.add_user_message("one");
        let snapshot = history.clone();
        history.add_user_message("two");

        assert_eq!(snapshot.iter().count(), 1);
        assert_eq!((&history).into_iter().count(), 2);
    }

    #[test]
    fn test_serde_is_message_list() {
        let mut history = ChatHistory::new();
        history.add_user_message("hi");
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!([{"role": "user", "content": "hi", "encoding": "utf-8"}]));
    }
}
