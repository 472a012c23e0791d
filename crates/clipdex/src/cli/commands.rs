//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::document::DifficultyLevel;

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Remove catalog rows for files that no longer exist
    #[arg(short, long)]
    pub prune: bool,

    /// Output the summary as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Watch command arguments.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Rescan interval in seconds (overrides config)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The search query (matches title, summary, and body)
    pub query: String,

    /// Filter by category (front matter or filename component)
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by year directory
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Filter by named technology
    #[arg(short, long)]
    pub tech: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Filter by difficulty level
    #[arg(short, long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Only documents captured at or after this time (e.g. "2024-01-15")
    #[arg(long)]
    pub since: Option<String>,

    /// Only documents captured at or before this time
    #[arg(long)]
    pub until: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Collection-relative path of the document (e.g. "2024/2024-05-21_backend_slug.md")
    pub path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write documents into this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum number of documents to export (newest first; default all)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Validate command arguments.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Treat warnings as failures
    #[arg(short, long)]
    pub strict: bool,

    /// Output the report as JSON
    #[arg(short, long)]
    pub json: bool,
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

/// Difficulty argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    /// Introductory material
    Beginner,
    /// Assumes working knowledge of the stack
    Intermediate,
    /// Deep dives and internals
    Advanced,
}

impl From<DifficultyArg> for DifficultyLevel {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Self::Beginner,
            DifficultyArg::Intermediate => Self::Intermediate,
            DifficultyArg::Advanced => Self::Advanced,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
