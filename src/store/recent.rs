//! Bounded recency index over the key-value substrate
//!
//! Maintains the `chatterbox_recent_chats` key: a JSON array of
//! [`RecentEntry`], most-recently-touched first, capped at
//! [`MAX_RECENT_CHATS`] entries with no duplicate ids. Ordering is
//! maintained by move-to-front on upsert, not by sorting timestamps.
//!
//! At the current cap a plain `Vec` and an O(n) scan per upsert is the
//! right structure; anyone raising the cap past a small constant should
//! switch to an indexed map plus linked order instead.

use crate::error::Result;
use crate::store::types::RecentEntry;
use crate::substrate::KeyValueSubstrate;

/// Substrate key holding the recency index
pub const RECENT_CHATS_KEY: &str = "chatterbox_recent_chats";

/// Maximum number of entries retained in the index
pub const MAX_RECENT_CHATS: usize = 10;

/// Ordered, bounded list of recently touched chats
///
/// Never reads or writes chat bodies; it only sees the `(id, title)`
/// projection handed to [`upsert`](RecencyIndex::upsert).
#[derive(Clone)]
pub struct RecencyIndex<S: KeyValueSubstrate> {
    substrate: S,
}

impl<S: KeyValueSubstrate> RecencyIndex<S> {
    /// Create an index over the given substrate
    pub fn new(substrate: S) -> Self {
        Self { substrate }
    }

    /// Return all entries, most recent first
    ///
    /// A missing key, unreadable substrate, or corrupt stored JSON all
    /// degrade to an empty list; read failures are logged, never raised.
    pub fn entries(&self) -> Vec<RecentEntry> {
        let raw = match self.substrate.get(RECENT_CHATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read recent chats: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                // Corrupt index data is treated as absent, not fatal.
                tracing::warn!("Recent chats entry is not valid JSON, ignoring: {}", e);
                Vec::new()
            }
        }
    }

    /// Register `id` as the most recently touched chat
    ///
    /// An existing entry for `id` is removed from its current position;
    /// a fresh entry stamped now is pushed to the front and the list is
    /// truncated to [`MAX_RECENT_CHATS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten index cannot be persisted.
    pub fn upsert(&self, id: &str, title: &str) -> Result<()> {
        let mut entries = self.entries();
        entries.retain(|entry| entry.id != id);
        entries.insert(
            0,
            RecentEntry {
                id: id.to_string(),
                title: title.to_string(),
                updated_at: crate::store::now_rfc3339(),
            },
        );
        entries.truncate(MAX_RECENT_CHATS);
        self.persist(&entries)
    }

    /// Drop any entry for `id`; no-op if absent
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(());
        }
        self.persist(&entries)
    }

    /// Reset the index to empty
    pub fn clear(&self) -> Result<()> {
        self.substrate.remove(RECENT_CHATS_KEY)
    }

    fn persist(&self, entries: &[RecentEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.substrate.set(RECENT_CHATS_KEY, &raw)
    }
}
