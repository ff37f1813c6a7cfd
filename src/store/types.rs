//! Persisted record types for the chat store
//!
//! Field names on the wire are camelCase (`createdAt`, `updatedAt`) and
//! timestamps are RFC-3339 strings; the persisted JSON must stay readable
//! by anything else that speaks the `chatterbox_*` key layout.

use serde::{Deserialize, Serialize};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human side of the conversation
    User,
    /// The canned-response bot
    Bot,
}

/// A single message inside a chat
///
/// Messages are immutable once appended; edits are modeled as replacing
/// the whole message list. The numeric `id` comes from the caller and is
/// only monotonic-ish; it is never used as a lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-assigned message id
    pub id: i64,
    /// Message text
    pub text: String,
    /// Who authored the message
    pub sender: Sender,
    /// When the message was authored (RFC-3339)
    pub timestamp: String,
    /// Optional attached code block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Language of the attached code block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Message {
    /// Creates a user message timestamped now
    ///
    /// # Examples
    ///
    /// ```
    /// use chatterbox::store::types::{Message, Sender};
    ///
    /// let msg = Message::user(1, "Hello!");
    /// assert_eq!(msg.sender, Sender::User);
    /// ```
    pub fn user(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp: crate::store::now_rfc3339(),
            code: None,
            language: None,
        }
    }

    /// Creates a bot message timestamped now
    pub fn bot(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            timestamp: crate::store::now_rfc3339(),
            code: None,
            language: None,
        }
    }

    /// Attaches a code block to the message
    pub fn with_code(mut self, code: impl Into<String>, language: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self.language = Some(language.into());
        self
    }
}

/// The durable representation of one conversation thread
///
/// Identity is `id`; `created_at` is set once at creation and never
/// changes, `updated_at` is refreshed on every message-list mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    /// Globally unique chat identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Messages in insertion order
    pub messages: Vec<Message>,
    /// Creation time (RFC-3339), immutable
    pub created_at: String,
    /// Last mutation time (RFC-3339)
    pub updated_at: String,
}

/// A lightweight, denormalized summary of a chat for "recent" listing
///
/// Not a source of truth; the recency index may lag the record table
/// after a partial failure (see [`crate::store::ChatStore`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    /// Chat identifier this entry summarizes
    pub id: String,
    /// Title at the time the entry was refreshed
    pub title: String,
    /// When the chat was last touched (RFC-3339)
    pub updated_at: String,
}
