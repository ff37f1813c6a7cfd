//! Command handlers for the Chatterbox CLI

pub mod history;
