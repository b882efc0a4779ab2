mod cli;
mod commands;
mod logging;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nongli::Config;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Config::from_path(path)
                .with_context(|| format!("failed to load config file: {}", path.display()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Convert(args) => commands::convert(args, &config),
        Command::Events(args) => commands::events(args, &config),
        Command::Ics(args) => commands::ics(args, &config),
        Command::Reminders(args) => commands::reminders(args, &config),
    }
}
