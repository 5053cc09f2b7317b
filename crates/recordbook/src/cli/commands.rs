//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::NewRecord;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Name to record
    #[arg(short, long)]
    pub name: String,

    /// Contact email
    #[arg(short, long)]
    pub email: String,

    /// Message body
    #[arg(short, long)]
    pub message: String,
}

impl From<AddCommand> for NewRecord {
    fn from(cmd: AddCommand) -> Self {
        NewRecord::new(cmd.name, cmd.email, cmd.message)
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in names, emails and messages (case-insensitive)
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the record to delete
    pub id: i64,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Directory to write the export file into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the export instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// File to write the page to (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Labeled text blocks
    #[default]
    Plain,
    /// HTML fragment
    Html,
    /// JSON array
    Json,
}
