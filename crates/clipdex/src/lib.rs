//! `clipdex` - Catalog and validation tooling for scraped-article corpora
//!
//! This library ingests a dated tree of Markdown documents, each wrapped in
//! a YAML front-matter envelope, into a `SQLite` catalog indexed by capture
//! date and topic, and validates the corpus against its file-format
//! contract.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod logging;
pub mod validate;
pub mod watch;

pub use catalog::{Catalog, CatalogStats, DocumentRecord, SearchFilter, UpsertOutcome};
pub use config::Config;
pub use corpus::{Corpus, CorpusPath};
pub use document::{DifficultyLevel, Document, Frontmatter};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use validate::{ValidationReport, Validator};
