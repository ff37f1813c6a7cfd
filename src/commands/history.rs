//! Chat-history command handlers
//!
//! Renders the recency index and chat transcripts to the terminal and
//! forwards mutating commands to the store.

use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;
use crate::store::{ChatStore, Sender};
use crate::substrate::SledSubstrate;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle a chat-history command
pub fn handle(command: Commands, config: Config) -> Result<()> {
    let data_dir = config.resolve_data_dir()?;
    let store = ChatStore::new(SledSubstrate::open(data_dir.join("chatterbox.db"))?);

    match command {
        Commands::Recent => list_recent(&store),
        Commands::Show { id } => show_chat(&store, &id),
        Commands::Delete { id } => {
            store.delete(&id)?;
            println!("{}", format!("Deleted chat {}", id).green());
            Ok(())
        }
        Commands::Clear => {
            store.clear_all()?;
            println!("{}", "Cleared all chats and the recent list.".green());
            Ok(())
        }
        Commands::Seed => {
            if store.seed_sample_data()? {
                println!("{}", "Seeded 2 sample chats.".green());
            } else {
                println!("{}", "Store is not empty; nothing seeded.".yellow());
            }
            Ok(())
        }
    }
}

fn list_recent(store: &ChatStore<SledSubstrate>) -> Result<()> {
    let entries = store.recent().entries();

    if entries.is_empty() {
        println!("{}", "No recent chats found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Last Updated".bold()
    ]);

    for entry in entries {
        let title = if entry.title.chars().count() > 40 {
            let truncated: String = entry.title.chars().take(37).collect();
            format!("{}...", truncated)
        } else {
            entry.title
        };
        table.add_row(prettytable::row![entry.id.cyan(), title, entry.updated_at]);
    }

    println!("\nRecent Chats:");
    table.printstd();
    println!();
    println!(
        "Use {} to view a transcript.",
        "chatterbox show <ID>".cyan()
    );
    println!();
    Ok(())
}

fn show_chat(store: &ChatStore<SledSubstrate>, id: &str) -> Result<()> {
    let Some(record) = store.get(id) else {
        println!("{}", format!("No chat found with id {}", id).yellow());
        return Ok(());
    };

    println!();
    println!("{}", record.title.bold());
    println!(
        "created {} | updated {} | {} messages",
        record.created_at, record.updated_at, record.messages.len()
    );
    println!();

    for message in &record.messages {
        let label = match message.sender {
            Sender::User => "user".cyan(),
            Sender::Bot => "bot ".green(),
        };
        println!("[{}] {}  {}", message.timestamp, label, message.text);
        if let Some(code) = &message.code {
            let language = message.language.as_deref().unwrap_or("");
            println!("      --- {} ---", language);
            for line in code.lines() {
                println!("      {}", line);
            }
        }
    }
    println!();
    Ok(())
}
