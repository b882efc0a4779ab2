use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chinese lunisolar calendar and temple observances, 1900-2100.
#[derive(Parser)]
#[command(
    name = "nongli",
    version,
    about = "Chinese lunisolar calendar and temple observances, 1900-2100"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Convert a Gregorian date and list its observances.
    Convert(ConvertArgs),
    /// Print the observances of a Gregorian year, grouped by month.
    Events(EventsArgs),
    /// Export a Gregorian year as an iCalendar document.
    Ics(IcsArgs),
    /// Print the reminder payload of a Gregorian year as JSON.
    Reminders(RemindersArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Gregorian date, `YYYY-MM-DD`.
    pub date: String,
}

/// Arguments for the `events` subcommand.
#[derive(clap::Args)]
pub struct EventsArgs {
    /// Gregorian year, 1900..=2100.
    pub year: i32,

    /// Only this Gregorian month (1..=12).
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=12))]
    pub month: Option<i32>,
}

/// Arguments for the `ics` subcommand.
#[derive(clap::Args)]
pub struct IcsArgs {
    /// Gregorian year, 1900..=2100.
    pub year: i32,

    /// Write the document here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `reminders` subcommand.
#[derive(clap::Args)]
pub struct RemindersArgs {
    /// Gregorian year, 1900..=2100.
    pub year: i32,
}
