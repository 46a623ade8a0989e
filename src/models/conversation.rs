#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::{
    config::constants::{TITLE_ELLIPSIS, TITLE_LENGTH},
    models::Message,
};

/// A committed chat. The title is fixed when the conversation is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    title: String,
    messages: Vec<Message>,
}

/// One row of the chat list shown next to the active conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListItem {
    pub title: String,
    pub index: usize,
}

impl Conversation {
    /// Build a conversation from its messages, deriving the title from the
    /// first one. Returns `None` when there is nothing to commit.
    pub fn from_messages(messages: Vec<Message>) -> Option<Self> {
        let title = derive_title(messages.first()?.content());
        Some(Self { title, messages })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }
}

/// First `TITLE_LENGTH` characters followed by the ellipsis marker. The
/// marker is appended even when the text is shorter.
pub fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_LENGTH).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}
