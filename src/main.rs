//! Chatterbox - local chat-history store CLI
//!
//! Main entry point: initializes tracing, loads configuration, and
//! dispatches the requested command.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatterbox::cli::Cli;
use chatterbox::commands;
use chatterbox::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    commands::history::handle(cli.command, config)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chatterbox=debug"
    } else {
        "chatterbox=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
