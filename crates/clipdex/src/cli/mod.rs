//! Command-line interface for clipdex.
//!
//! This module provides the CLI structure and argument types for the
//! `clipdex` binary.

mod commands;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::frontmatter::parse_datetime;
use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, DifficultyArg, ExportCommand, OutputFormat, ScanCommand, SearchCommand,
    ShowCommand, StatusCommand, ValidateCommand, WatchCommand,
};

/// clipdex - Catalog and validate a scraped-article corpus
///
/// Ingests a dated tree of Markdown documents with YAML front-matter
/// envelopes into a local catalog, and answers questions about it.
#[derive(Debug, Parser)]
#[command(name = "clipdex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
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
    /// Ingest the corpus into the catalog
    Scan(ScanCommand),

    /// Watch the corpus and ingest new documents as they appear
    Watch(WatchCommand),

    /// Show catalog statistics
    Status(StatusCommand),

    /// Search cataloged documents
    Search(SearchCommand),

    /// Show one cataloged document
    Show(ShowCommand),

    /// Re-serialize cataloged documents through the canonical envelope
    Export(ExportCommand),

    /// Validate the corpus against the built-in rules
    Validate(ValidateCommand),

    /// View or check configuration
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

/// Parse a `--since`/`--until` style time bound.
///
/// Accepts anything [`parse_datetime`] does; a bare date used as an upper
/// bound (`end_of_day`) covers the whole day.
///
/// # Errors
///
/// Returns [`Error::TimeParse`] if the value is not a recognizable date or
/// timestamp.
pub fn parse_time_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if end_of_day {
        if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            if let Some(end) = date.and_hms_opt(23, 59, 59) {
                return Ok(end.and_utc());
            }
        }
    }
    parse_datetime(value).ok_or_else(|| Error::time_parse(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "clipdex");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_mapping() {
        let cli = Cli::try_parse_from(["clipdex", "-q", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["clipdex", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let cli = Cli::try_parse_from(["clipdex", "-v", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Verbose);

        let cli = Cli::try_parse_from(["clipdex", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["clipdex", "scan", "--prune"]).unwrap();
        match cli.command {
            Command::Scan(cmd) => assert!(cmd.prune),
            other => panic!("expected scan, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_watch_with_interval() {
        let cli = Cli::try_parse_from(["clipdex", "watch", "--interval", "5"]).unwrap();
        match cli.command {
            Command::Watch(cmd) => assert_eq!(cmd.interval, Some(5)),
            other => panic!("expected watch, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["clipdex", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_search_with_filters() {
        let cli = Cli::try_parse_from([
            "clipdex",
            "search",
            "caching",
            "--category",
            "backend",
            "--year",
            "2024",
            "--difficulty",
            "intermediate",
            "--limit",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "caching");
                assert_eq!(cmd.category.as_deref(), Some("backend"));
                assert_eq!(cmd.year, Some(2024));
                assert_eq!(cmd.difficulty, Some(DifficultyArg::Intermediate));
                assert_eq!(cmd.limit, 5);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_show() {
        let cli =
            Cli::try_parse_from(["clipdex", "show", "2024/2024-05-21_backend_slug.md"]).unwrap();
        match cli.command {
            Command::Show(cmd) => assert_eq!(cmd.path, "2024/2024-05-21_backend_slug.md"),
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from(["clipdex", "export", "--output", "/tmp/out"]).unwrap();
        match cli.command {
            Command::Export(cmd) => {
                assert_eq!(cmd.output, Some(PathBuf::from("/tmp/out")));
                assert!(cmd.limit.is_none());
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_validate_strict() {
        let cli = Cli::try_parse_from(["clipdex", "validate", "--strict"]).unwrap();
        match cli.command {
            Command::Validate(cmd) => assert!(cmd.strict),
            other => panic!("expected validate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = Cli::try_parse_from(["clipdex", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { .. })
        ));

        let cli = Cli::try_parse_from(["clipdex", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config_flag() {
        let cli = Cli::try_parse_from(["clipdex", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_time_bound_date() {
        let since = parse_time_bound("2024-05-21", false).unwrap();
        assert_eq!(since.to_rfc3339(), "2024-05-21T00:00:00+00:00");
    }

    #[test]
    fn test_parse_time_bound_end_of_day() {
        let until = parse_time_bound("2024-05-21", true).unwrap();
        assert_eq!(until.to_rfc3339(), "2024-05-21T23:59:59+00:00");
    }

    #[test]
    fn test_parse_time_bound_timestamp() {
        let bound = parse_time_bound("2024-05-21T14:30:12Z", true).unwrap();
        assert_eq!(bound.to_rfc3339(), "2024-05-21T14:30:12+00:00");
    }

    #[test]
    fn test_parse_time_bound_invalid() {
        let err = parse_time_bound("last tuesday", false).unwrap_err();
        assert!(matches!(err, Error::TimeParse { .. }));
    }
}
