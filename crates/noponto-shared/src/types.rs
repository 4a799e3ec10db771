use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ACTIVITY_LABEL_NOW, TITLE_MAX_CHARS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// A saved conversation as listed in the sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    /// Fixed at creation from the first user message.
    pub title: String,
    pub last_activity_label: String,
    pub transcript: Vec<Message>,
}

impl Conversation {
    /// Start a conversation from the transcript that ends with its first user
    /// message.
    pub fn start(first_user_message: &Message, transcript: Vec<Message>) -> Self {
        Self {
            id: ConversationId::new(),
            title: title_from(&first_user_message.content),
            last_activity_label: ACTIVITY_LABEL_NOW.to_string(),
            transcript,
        }
    }
}

/// Derive a conversation title: the content itself, or its first 50
/// characters followed by `...` when longer.
pub fn title_from(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}
