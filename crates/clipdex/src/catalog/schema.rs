//! `SQLite` schema definitions for the document catalog.
//!
//! This module contains the SQL statements for creating and managing
//! the catalog schema.

/// SQL statement to create the documents table.
///
/// List-valued front-matter fields are stored as JSON text; `extra` holds
/// unrecognized front-matter keys the same way. There is deliberately no
/// uniqueness constraint on title or content: duplicate articles across
/// files are expected corpus behavior. Only `rel_path` is unique.
pub const CREATE_DOCUMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rel_path TEXT NOT NULL UNIQUE,
    year INTEGER,
    path_category TEXT,
    slug TEXT,
    title TEXT NOT NULL,
    source_url TEXT NOT NULL,
    domain TEXT,
    author TEXT,
    category TEXT,
    date_published TEXT,
    date_captured TEXT,
    difficulty TEXT,
    summary TEXT,
    technologies TEXT NOT NULL DEFAULT '[]',
    programming_languages TEXT NOT NULL DEFAULT '[]',
    tags TEXT NOT NULL DEFAULT '[]',
    key_concepts TEXT NOT NULL DEFAULT '[]',
    code_examples INTEGER,
    extra TEXT NOT NULL DEFAULT '{}',
    body TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    ingested_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `date_captured` for recency queries.
pub const CREATE_CAPTURED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_captured ON documents(date_captured DESC)
";

/// SQL statement to create an index on `category` for filtering.
pub const CREATE_CATEGORY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_category ON documents(category)
";

/// SQL statement to create an index on `year` for filtering.
pub const CREATE_YEAR_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_year ON documents(year)
";

/// SQL statement to create an index on `content_hash` for duplicate reporting.
pub const CREATE_HASH_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DOCUMENTS_TABLE,
    CREATE_CAPTURED_INDEX,
    CREATE_CATEGORY_INDEX,
    CREATE_YEAR_INDEX,
    CREATE_HASH_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_documents_table_contains_required_columns() {
        assert!(CREATE_DOCUMENTS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("rel_path TEXT NOT NULL UNIQUE"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("title TEXT NOT NULL"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("source_url TEXT NOT NULL"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("body TEXT NOT NULL"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("content_hash TEXT NOT NULL"));
    }

    #[test]
    fn test_no_uniqueness_on_content() {
        // Duplicate articles across files are expected; only the path is unique.
        assert!(!CREATE_DOCUMENTS_TABLE.contains("content_hash TEXT NOT NULL UNIQUE"));
        assert!(!CREATE_DOCUMENTS_TABLE.contains("title TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
