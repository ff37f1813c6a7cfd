//! Chat-history store over a key-value substrate
//!
//! [`ChatStore`] owns the canonical id-to-record table persisted under
//! `chatterbox_chats` and drives the [`RecencyIndex`] as a side effect of
//! its writes. Record writes and index writes land under different keys
//! with no cross-key atomicity, so every dual-write here is a two-step
//! saga: the index may lag or drop entries relative to the record table
//! after a partial failure. That weakness is documented per operation
//! and observable in tests, never assumed away.

use crate::error::Result;
use crate::substrate::KeyValueSubstrate;
use chrono::Utc;
use std::collections::HashMap;
use ulid::Ulid;

pub mod recent;
pub mod types;

pub use recent::{RecencyIndex, MAX_RECENT_CHATS, RECENT_CHATS_KEY};
pub use types::{ChatRecord, Message, RecentEntry, Sender};

/// Substrate key holding the id-to-record chat table
pub const CHAT_STORAGE_KEY: &str = "chatterbox_chats";

/// Title used when none is supplied and no user message exists
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum derived-title length in characters before truncation
const TITLE_MAX_CHARS: usize = 30;

/// Generate a new chat identifier
///
/// A `chat_`-prefixed ULID: a millisecond time component plus a random
/// suffix, unique with overwhelming probability without any coordination
/// or prior state.
///
/// # Examples
///
/// ```
/// use chatterbox::store::generate_chat_id;
///
/// let id = generate_chat_id();
/// assert!(id.starts_with("chat_"));
/// ```
pub fn generate_chat_id() -> String {
    format!("chat_{}", Ulid::new())
}

/// Get current timestamp in RFC-3339 format
///
/// Used consistently for all record and index timestamps.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Derive a display title from a message list
///
/// Takes the text of the first user-authored message, truncated to 30
/// characters plus `"..."` when longer. Returns [`DEFAULT_TITLE`] when no
/// user message exists. Truncation counts characters, not bytes, so
/// multi-byte text is never split mid-character.
///
/// # Examples
///
/// ```
/// use chatterbox::store::{derive_title, Message};
///
/// let title = derive_title(&[Message::user(1, "How do trees grow?")]);
/// assert_eq!(title, "How do trees grow?");
/// ```
pub fn derive_title(messages: &[Message]) -> String {
    let first_user = messages.iter().find(|m| m.sender == Sender::User);
    match first_user {
        Some(msg) => {
            if msg.text.chars().count() > TITLE_MAX_CHARS {
                let truncated: String = msg.text.chars().take(TITLE_MAX_CHARS).collect();
                format!("{}...", truncated)
            } else {
                msg.text.clone()
            }
        }
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Canonical store of chat records
///
/// Construct with any [`KeyValueSubstrate`]; the store clones the
/// substrate handle into its own [`RecencyIndex`] so both components act
/// on the same storage.
///
/// Failure policy: reads degrade to empty defaults and log, writes report
/// failure through `Result`. Nothing here panics on substrate trouble.
#[derive(Clone)]
pub struct ChatStore<S: KeyValueSubstrate> {
    substrate: S,
    recent: RecencyIndex<S>,
}

impl<S: KeyValueSubstrate> ChatStore<S> {
    /// Create a store over the given substrate
    pub fn new(substrate: S) -> Self {
        let recent = RecencyIndex::new(substrate.clone());
        Self { substrate, recent }
    }

    /// The recency index sharing this store's substrate
    pub fn recent(&self) -> &RecencyIndex<S> {
        &self.recent
    }

    /// Insert a brand-new chat record
    ///
    /// Upsert semantics: no existence check is performed, so an existing
    /// record under `id` is silently overwritten, `created_at` included.
    /// `title` falls back to [`DEFAULT_TITLE`] when absent or blank. On
    /// success the chat is registered with the recency index.
    ///
    /// The record write and the index write are separate substrate keys;
    /// if the index write fails after the record committed, the failure
    /// is logged and the save still reports success. The index is allowed
    /// to lag the table, never the other way around.
    ///
    /// # Errors
    ///
    /// Returns an error if the record table cannot be serialized or
    /// written (e.g. the substrate rejects the write on quota).
    pub fn save(&self, id: &str, messages: &[Message], title: Option<&str>) -> Result<()> {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };
        let now = now_rfc3339();

        let mut table = self.load_table();
        table.insert(
            id.to_string(),
            ChatRecord {
                id: id.to_string(),
                title: title.clone(),
                messages: messages.to_vec(),
                created_at: now.clone(),
                updated_at: now,
            },
        );
        self.persist_table(&table)?;

        // Second step of the saga; a failure leaves the index stale but
        // the record is already durable.
        if let Err(e) = self.recent.upsert(id, &title) {
            tracing::error!("Chat {} saved but recency index update failed: {}", id, e);
        }

        Ok(())
    }

    /// Replace the message list of an existing chat
    ///
    /// Bumps `updated_at` and returns `Ok(true)` when the record exists.
    /// Returns `Ok(false)` and writes nothing when it does not; a missing
    /// id never creates a record (the asymmetry with [`save`](Self::save)).
    ///
    /// Known gap kept from the modeled design: updating a chat does not
    /// resurface it in the recency index.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten table cannot be persisted.
    pub fn update(&self, id: &str, messages: &[Message]) -> Result<bool> {
        let mut table = self.load_table();
        let Some(record) = table.get_mut(id) else {
            return Ok(false);
        };

        record.messages = messages.to_vec();
        record.updated_at = now_rfc3339();
        self.persist_table(&table)?;
        Ok(true)
    }

    /// Return the full id-to-record table
    ///
    /// An absent key, unreadable substrate, or corrupt stored JSON all
    /// degrade to an empty map; read failures are logged, never raised.
    pub fn get_all(&self) -> HashMap<String, ChatRecord> {
        self.load_table()
    }

    /// Look up a single chat record
    pub fn get(&self, id: &str) -> Option<ChatRecord> {
        self.load_table().remove(id)
    }

    /// Remove a chat record and prune its recency entry
    ///
    /// Idempotent: deleting a non-existent id succeeds. As with
    /// [`save`](Self::save), the index prune is the saga's second step; if
    /// it fails the stale entry is logged and left for the next prune.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten table cannot be persisted.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut table = self.load_table();
        table.remove(id);
        self.persist_table(&table)?;

        if let Err(e) = self.recent.remove(id) {
            tracing::error!("Chat {} deleted but recency index prune failed: {}", id, e);
        }

        Ok(())
    }

    /// Remove the chat table and the recency index
    ///
    /// One logical operation over two keys; not atomic. A failure between
    /// the two removals can leave the index populated with no backing
    /// table, which subsequent reads treat as independent state.
    ///
    /// # Errors
    ///
    /// Returns an error if either key cannot be removed.
    pub fn clear_all(&self) -> Result<()> {
        self.substrate.remove(CHAT_STORAGE_KEY)?;
        self.recent.clear()?;
        Ok(())
    }

    /// One-time bootstrap: populate two sample chats with matching recent
    /// entries
    ///
    /// Writes only when BOTH the chat table and the recency index are
    /// empty, so existing data is never overwritten. Returns `Ok(true)`
    /// when the samples were written, `Ok(false)` when data already
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns an error if either collection cannot be persisted.
    pub fn seed_sample_data(&self) -> Result<bool> {
        if !self.load_table().is_empty() || !self.recent.entries().is_empty() {
            return Ok(false);
        }

        let day_ago = Utc::now() - chrono::Duration::days(1);
        let two_days_ago = Utc::now() - chrono::Duration::days(2);

        let sample_1 = ChatRecord {
            id: "sample_1".to_string(),
            title: "Explore Animal Behavior".to_string(),
            messages: vec![
                Message {
                    id: 1,
                    text: "Tell me about animal behavior".to_string(),
                    sender: Sender::User,
                    timestamp: day_ago.to_rfc3339(),
                    code: None,
                    language: None,
                },
                Message {
                    id: 2,
                    text: "Animal behavior is fascinating! It includes everything from \
                           migration patterns to social interactions. Different species \
                           have unique behaviors that help them survive and reproduce."
                        .to_string(),
                    sender: Sender::Bot,
                    timestamp: (day_ago + chrono::Duration::seconds(1)).to_rfc3339(),
                    code: None,
                    language: None,
                },
            ],
            created_at: day_ago.to_rfc3339(),
            updated_at: day_ago.to_rfc3339(),
        };

        let sample_2 = ChatRecord {
            id: "sample_2".to_string(),
            title: "Analyze Tree Growth?".to_string(),
            messages: vec![
                Message {
                    id: 3,
                    text: "How do trees grow?".to_string(),
                    sender: Sender::User,
                    timestamp: two_days_ago.to_rfc3339(),
                    code: None,
                    language: None,
                },
                Message {
                    id: 4,
                    text: "Trees grow through a process called photosynthesis, where they \
                           convert sunlight into energy. They also absorb water and \
                           nutrients through their roots."
                        .to_string(),
                    sender: Sender::Bot,
                    timestamp: (two_days_ago + chrono::Duration::seconds(1)).to_rfc3339(),
                    code: None,
                    language: None,
                },
            ],
            created_at: two_days_ago.to_rfc3339(),
            updated_at: two_days_ago.to_rfc3339(),
        };

        let recent_entries = vec![
            RecentEntry {
                id: sample_1.id.clone(),
                title: sample_1.title.clone(),
                updated_at: sample_1.updated_at.clone(),
            },
            RecentEntry {
                id: sample_2.id.clone(),
                title: sample_2.title.clone(),
                updated_at: sample_2.updated_at.clone(),
            },
        ];

        let mut table = HashMap::new();
        table.insert(sample_1.id.clone(), sample_1);
        table.insert(sample_2.id.clone(), sample_2);

        self.persist_table(&table)?;
        let raw = serde_json::to_string(&recent_entries)?;
        self.substrate.set(RECENT_CHATS_KEY, &raw)?;

        Ok(true)
    }

    fn load_table(&self) -> HashMap<String, ChatRecord> {
        let raw = match self.substrate.get(CHAT_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read chat table: {}", e);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Chat table is not valid JSON, ignoring: {}", e);
                HashMap::new()
            }
        }
    }

    fn persist_table(&self, table: &HashMap<String, ChatRecord>) -> Result<()> {
        let raw = serde_json::to_string(table)?;
        self.substrate.set(CHAT_STORAGE_KEY, &raw)
    }
}
