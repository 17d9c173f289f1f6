//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// quickcal - Google Calendar from the command line
#[derive(Debug, Parser)]
#[command(name = "quickcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "QUICKCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Path to the OAuth client credentials JSON file
    ///
    /// This is the JSON file downloaded from the Google Cloud Console
    /// OAuth 2.0 credentials page.
    #[arg(long, env = "QUICKCAL_CREDENTIALS")]
    pub credentials_file: Option<PathBuf>,

    /// Calendar to operate on (defaults to "primary")
    #[arg(long)]
    pub calendar: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add an event via natural language
    Add {
        /// Event description (e.g. "Dinner at 7pm")
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the immediate next event
    Next,

    /// Show remaining events for today
    Today,
}
