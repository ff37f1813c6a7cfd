//! Chatterbox - local chat-history store library
//!
//! Persists conversation threads and maintains a bounded "recent" index
//! over a synchronous key-value substrate.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `substrate`: the injected key-value persistence capability, with a
//!   durable sled-backed implementation and an in-memory one
//! - `store`: the chat record table ([`ChatStore`]) and the bounded
//!   [`RecencyIndex`] maintained as a side effect of its writes
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line interface and handlers
//!
//! # Example
//!
//! ```
//! use chatterbox::store::{derive_title, ChatStore, Message};
//! use chatterbox::substrate::MemorySubstrate;
//!
//! # fn main() -> chatterbox::error::Result<()> {
//! let store = ChatStore::new(MemorySubstrate::new());
//! let messages = vec![Message::user(1, "How do trees grow?")];
//! let title = derive_title(&messages);
//! store.save("chat_1", &messages, Some(&title))?;
//!
//! assert_eq!(store.get("chat_1").unwrap().title, "How do trees grow?");
//! assert_eq!(store.recent().entries().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod store;
pub mod substrate;

// Re-export commonly used types
pub use config::Config;
pub use error::{ChatterboxError, Result};
pub use store::{
    derive_title, generate_chat_id, now_rfc3339, ChatRecord, ChatStore, Message, RecencyIndex,
    RecentEntry, Sender,
};
pub use substrate::{KeyValueSubstrate, MemorySubstrate, SledSubstrate};
