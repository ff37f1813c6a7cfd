//! Command-line interface definition for Chatterbox
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for listing, showing, deleting, and seeding chats.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chatterbox - local chat-history store
///
/// Inspect and manage the durable chat table and its bounded
/// recency index.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatterbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the data directory holding the store database
    #[arg(long, env = "CHATTERBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chatterbox
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the most recently touched chats
    Recent,

    /// Show the full transcript of a chat
    Show {
        /// Chat identifier
        id: String,
    },

    /// Delete a chat and prune it from the recent list
    Delete {
        /// Chat identifier
        id: String,
    },

    /// Remove all chats and the recent list
    Clear,

    /// Populate sample chats (only when the store is empty)
    Seed,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
