//! Error types for clipdex.
//!
//! This module defines all error types used throughout the clipdex crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for clipdex operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Catalog Errors ===
    /// Failed to open or create the catalog database.
    #[error("failed to open catalog at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Corpus Errors ===
    /// The corpus root directory does not exist.
    #[error("corpus root not found: {path}")]
    CorpusRoot {
        /// Path that was expected to hold the corpus.
        path: PathBuf,
    },

    /// Failed to read a corpus document.
    #[error("failed to read document {path}: {source}")]
    DocumentRead {
        /// Relative path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not cataloged.
    #[error("document not cataloged: {path}")]
    NotCataloged {
        /// Relative path that was looked up.
        path: PathBuf,
    },

    // === Envelope Errors ===
    /// A document has no recognizable front-matter envelope.
    #[error("no front-matter envelope in {path}")]
    EnvelopeMissing {
        /// Relative path of the document.
        path: PathBuf,
    },

    /// The front-matter envelope failed to parse as YAML.
    #[error("malformed front-matter in {path}: {message}")]
    EnvelopeParse {
        /// Relative path of the document.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    // === Watcher Errors ===
    /// A corpus monitor failed to start.
    #[error("failed to start monitor '{name}': {message}")]
    MonitorStart {
        /// Name of the monitor.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A corpus monitor failed to stop.
    #[error("failed to stop monitor '{name}': {message}")]
    MonitorStop {
        /// Name of the monitor.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Generic Errors ===
    /// A time bound could not be parsed.
    #[error("invalid time bound '{value}': expected a date (2024-05-21) or timestamp")]
    TimeParse {
        /// The value that failed to parse.
        value: String,
    },

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for clipdex operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an envelope parse error for the given document.
    #[must_use]
    pub fn envelope_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EnvelopeParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a monitor start error.
    #[must_use]
    pub fn monitor_start(name: &'static str, message: impl Into<String>) -> Self {
        Self::MonitorStart {
            name,
            message: message.into(),
        }
    }

    /// Create a monitor stop error.
    #[must_use]
    pub fn monitor_stop(name: &'static str, message: impl Into<String>) -> Self {
        Self::MonitorStop {
            name,
            message: message.into(),
        }
    }

    /// Create a time bound parse error.
    #[must_use]
    pub fn time_parse(value: impl Into<String>) -> Self {
        Self::TimeParse {
            value: value.into(),
        }
    }

    /// Check if this error is an envelope problem (missing or malformed).
    #[must_use]
    pub fn is_envelope_error(&self) -> bool {
        matches!(
            self,
            Self::EnvelopeMissing { .. } | Self::EnvelopeParse { .. }
        )
    }

    /// Check if this error means the corpus root is absent.
    #[must_use]
    pub fn is_corpus_root_error(&self) -> bool {
        matches!(self, Self::CorpusRoot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CorpusRoot {
            path: PathBuf::from("/data/documentation/rac"),
        };
        assert_eq!(
            err.to_string(),
            "corpus root not found: /data/documentation/rac"
        );

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_error_is_envelope_error() {
        let err = Error::EnvelopeMissing {
            path: PathBuf::from("2024/note.md"),
        };
        assert!(err.is_envelope_error());

        let err = Error::envelope_parse("2024/note.md", "bad indent");
        assert!(err.is_envelope_error());

        assert!(!Error::internal("test").is_envelope_error());
    }

    #[test]
    fn test_error_is_corpus_root_error() {
        let err = Error::CorpusRoot {
            path: PathBuf::from("/missing"),
        };
        assert!(err.is_corpus_root_error());
        assert!(!Error::internal("test").is_corpus_root_error());
    }

    #[test]
    fn test_envelope_parse_display() {
        let err = Error::envelope_parse("2024/2024-05-21_backend_post.md", "mapping expected");
        let msg = err.to_string();
        assert!(msg.contains("2024-05-21_backend_post.md"));
        assert!(msg.contains("mapping expected"));
    }

    #[test]
    fn test_monitor_start_error() {
        let err = Error::monitor_start("polling", "corpus root missing");
        let msg = err.to_string();
        assert!(msg.contains("polling"));
        assert!(msg.contains("corpus root missing"));
    }

    #[test]
    fn test_monitor_stop_error() {
        let err = Error::monitor_stop("polling", "not running");
        let msg = err.to_string();
        assert!(msg.contains("polling"));
        assert!(msg.contains("not running"));
    }

    #[test]
    fn test_time_parse_error() {
        let err = Error::time_parse("last tuesday");
        assert!(err.to_string().contains("last tuesday"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "poll_interval_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("poll_interval_secs"));
    }

    #[test]
    fn test_document_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DocumentRead {
            path: PathBuf::from("2024/locked.md"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("2024/locked.md"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_not_cataloged_error_display() {
        let err = Error::NotCataloged {
            path: PathBuf::from("2024/missing.md"),
        };
        assert!(err.to_string().contains("2024/missing.md"));
    }
}
