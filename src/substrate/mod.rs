//! Key-value substrate abstraction
//!
//! The store never talks to a database directly; it is handed a
//! [`KeyValueSubstrate`] capability at construction time. This keeps the
//! persistence medium swappable: the durable [`SledSubstrate`] in
//! production, the in-memory [`MemorySubstrate`] in tests or ephemeral
//! runs.
//!
//! The substrate contract is deliberately minimal: synchronous get, set,
//! and remove of UTF-8 string values under string keys. There are no
//! transactions and no atomicity across keys; callers that write more
//! than one key per logical operation own that weakness (see
//! [`crate::store::ChatStore`]).

use crate::error::Result;

pub mod memory;
pub mod sled;

pub use self::memory::MemorySubstrate;
pub use self::sled::SledSubstrate;

/// Synchronous key-value persistence capability
///
/// Implementations must be cheap to clone; the chat store and the recency
/// index each hold their own handle to the same underlying storage.
pub trait KeyValueSubstrate: Clone {
    /// Read the value stored under `key`, or `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, overwriting any previous value
    ///
    /// # Errors
    ///
    /// Returns `ChatterboxError::QuotaExceeded` (or a backend-specific
    /// `Storage` error) when the write cannot be committed. A failed write
    /// must leave the previously stored value intact.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
