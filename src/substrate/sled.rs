//! Durable substrate backed by an embedded `sled` database
//!
//! Values are stored as UTF-8 bytes and flushed after every write so a
//! crash immediately after a store operation cannot lose it.

use crate::error::{ChatterboxError, Result};
use crate::substrate::KeyValueSubstrate;
use sled::Db;
use std::path::Path;

/// Key-value substrate persisted in a sled database directory
///
/// `sled::Db` is internally reference-counted, so cloning a
/// `SledSubstrate` yields another handle to the same database.
///
/// # Examples
///
/// ```no_run
/// use chatterbox::substrate::SledSubstrate;
///
/// # fn main() -> chatterbox::error::Result<()> {
/// let substrate = SledSubstrate::open("/tmp/chatterbox-db")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SledSubstrate {
    db: Db,
}

impl SledSubstrate {
    /// Open or create a sled database at `path`
    ///
    /// # Errors
    ///
    /// Returns `ChatterboxError::Storage` if the database cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ChatterboxError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl KeyValueSubstrate for SledSubstrate {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ChatterboxError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    ChatterboxError::Storage(format!("Stored value is not UTF-8: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| ChatterboxError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ChatterboxError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ChatterboxError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ChatterboxError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}
