//! Command-line interface for recordbook.
//!
//! This module provides the CLI structure for the `recbook` binary and the
//! terminal confirmation prompt used by destructive commands.

mod commands;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, ExportCommand, ListCommand,
    OutputFormat, RenderCommand, SearchCommand, StatsCommand,
};
pub use prompt::TerminalConfirm;

use crate::logging::Verbosity;

/// recbook - Keep a small book of names, emails and messages
///
/// Records are stored locally and can be listed, searched, rendered to HTML
/// and exported to a text file.
#[derive(Debug, Parser)]
#[command(name = "recbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a record
    Add(AddCommand),

    /// List all records, newest first
    List(ListCommand),

    /// Search names, emails and messages
    Search(SearchCommand),

    /// Delete one record
    Delete(DeleteCommand),

    /// Delete all records
    Clear(ClearCommand),

    /// Export all records to a text file
    Export(ExportCommand),

    /// Show the record count and last update time
    Stats(StatsCommand),

    /// Write a standalone HTML page
    Render(RenderCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
