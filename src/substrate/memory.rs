//! In-memory substrate for tests and ephemeral runs
//!
//! Also models the finite-capacity medium of the real substrate: an
//! optional byte quota makes writes fail the way a host key-value store
//! does when it runs out of room.

use crate::error::{ChatterboxError, Result};
use crate::substrate::KeyValueSubstrate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key-value substrate held entirely in memory
///
/// Clones share the same map, mirroring how clones of the sled-backed
/// substrate share one database.
///
/// # Examples
///
/// ```
/// use chatterbox::substrate::{KeyValueSubstrate, MemorySubstrate};
///
/// let substrate = MemorySubstrate::new();
/// substrate.set("k", "v").unwrap();
/// assert_eq!(substrate.get("k").unwrap().as_deref(), Some("v"));
/// ```
#[derive(Clone, Default)]
pub struct MemorySubstrate {
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// Total value bytes allowed across all keys; None means unbounded
    quota_bytes: Option<usize>,
}

impl MemorySubstrate {
    /// Create an unbounded in-memory substrate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a substrate that rejects writes once total stored value
    /// bytes would exceed `quota_bytes`
    ///
    /// A rejected write leaves the previously stored value untouched.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn stored_bytes(entries: &HashMap<String, String>) -> usize {
        entries.values().map(|v| v.len()).sum()
    }
}

impl KeyValueSubstrate for MemorySubstrate {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ChatterboxError::Storage(format!("Lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ChatterboxError::Storage(format!("Lock poisoned: {}", e)))?;

        if let Some(quota) = self.quota_bytes {
            let current = Self::stored_bytes(&entries);
            let existing = entries.get(key).map(|v| v.len()).unwrap_or(0);
            if current - existing + value.len() > quota {
                return Err(ChatterboxError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                }
                .into());
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ChatterboxError::Storage(format!("Lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let substrate = MemorySubstrate::new();
        assert!(substrate.get("missing").expect("get failed").is_none());
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let substrate = MemorySubstrate::new();
        substrate.set("k", "v").expect("set failed");
        assert_eq!(substrate.get("k").expect("get failed").as_deref(), Some("v"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let substrate = MemorySubstrate::new();
        substrate.set("k", "v").expect("set failed");
        substrate.remove("k").expect("first remove failed");
        substrate.remove("k").expect("second remove failed");
        assert!(substrate.get("k").expect("get failed").is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let substrate = MemorySubstrate::new();
        let other = substrate.clone();
        substrate.set("k", "shared").expect("set failed");
        assert_eq!(other.get("k").expect("get failed").as_deref(), Some("shared"));
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let substrate = MemorySubstrate::with_quota(8);
        let err = substrate.set("k", "way too large").unwrap_err();
        let err = err
            .downcast_ref::<ChatterboxError>()
            .expect("error should be a ChatterboxError");
        assert!(matches!(err, ChatterboxError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_quota_failure_preserves_previous_value() {
        let substrate = MemorySubstrate::with_quota(8);
        substrate.set("k", "small").expect("set failed");
        assert!(substrate.set("k", "definitely too large").is_err());
        assert_eq!(
            substrate.get("k").expect("get failed").as_deref(),
            Some("small")
        );
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let substrate = MemorySubstrate::with_quota(10);
        substrate.set("k", "12345678").expect("set failed");
        // Replacing an 8-byte value with a 9-byte one fits a 10-byte quota.
        substrate.set("k", "123456789").expect("replace failed");
    }
}
