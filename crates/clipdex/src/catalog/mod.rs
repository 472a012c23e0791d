//! Catalog layer for the article corpus.
//!
//! This module provides the `SQLite`-backed catalog: one row per corpus
//! file, indexed by capture date, category, and year, with support for:
//! - Upsert with content-hash change detection
//! - Substring search and filtered listing
//! - Duplicate-content reporting (duplicates are expected, never rejected)
//! - Syncing rows to files that no longer exist

pub mod migrations;
pub mod schema;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::CorpusPath;
use crate::document::{is_placeholder, DifficultyLevel, Document, Frontmatter};
use crate::error::{Error, Result};
use crate::frontmatter::parse_datetime;

/// Column list shared by every document query, in row order.
const COLUMNS: &str = "id, rel_path, year, path_category, slug, title, source_url, domain, \
                       author, category, date_published, date_captured, difficulty, summary, \
                       technologies, programming_languages, tags, key_concepts, code_examples, \
                       extra, body, content_hash, ingested_at";

/// Outcome of cataloging a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The path was new; a row was inserted.
    Inserted(i64),
    /// The path existed with different content; the row was replaced.
    Updated(i64),
    /// The path existed with identical content; nothing was written.
    Unchanged(i64),
}

impl UpsertOutcome {
    /// The row id the outcome refers to.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) | Self::Unchanged(id) => *id,
        }
    }
}

/// A cataloged document row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    /// Row id (assigned by the catalog).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Path relative to the collection root.
    pub rel_path: String,

    /// Year directory, when the path follows the naming convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Category component of the filename, when conforming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_category: Option<String>,

    /// Slug component of the filename, when conforming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// The front-matter metadata record.
    pub frontmatter: Frontmatter,

    /// The Markdown body.
    #[serde(skip)]
    pub body: String,

    /// BLAKE3 hash of the raw file content.
    pub content_hash: String,

    /// When this row was last written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingested_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// Build a record from a parsed document, deriving path components.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let corpus_path = CorpusPath::parse(&document.rel_path);
        Self {
            id: None,
            rel_path: document.rel_path_str(),
            year: corpus_path.as_ref().map(|cp| cp.year),
            path_category: corpus_path.as_ref().map(|cp| cp.category.clone()),
            slug: corpus_path.map(|cp| cp.slug),
            frontmatter: document.frontmatter.clone(),
            body: document.body.clone(),
            content_hash: document.content_hash.clone(),
            ingested_at: None,
        }
    }

    /// The category to file this record under: front matter first, path second.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.frontmatter
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.path_category.as_deref())
    }
}

/// Filter for catalog queries. All fields are conjunctive; `limit` of 0
/// means unlimited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Case-insensitive substring over title, summary, and body.
    pub text: Option<String>,
    /// Match category (front matter or path component).
    pub category: Option<String>,
    /// Match the year directory.
    pub year: Option<i32>,
    /// Match a named technology.
    pub technology: Option<String>,
    /// Match a tag.
    pub tag: Option<String>,
    /// Match the difficulty level.
    pub difficulty: Option<String>,
    /// Only documents captured at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Only documents captured at or before this time.
    pub until: Option<DateTime<Utc>>,
    /// Maximum number of results; 0 for unlimited.
    pub limit: usize,
}

/// Statistics about the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    /// Total number of cataloged documents.
    pub total_documents: i64,
    /// Earliest capture timestamp on record.
    pub oldest_capture: Option<DateTime<Utc>>,
    /// Latest capture timestamp on record.
    pub newest_capture: Option<DateTime<Utc>>,
    /// Number of distinct categories.
    pub category_count: i64,
    /// Number of distinct year directories.
    pub year_count: i64,
    /// Number of content hashes shared by more than one file.
    pub duplicate_groups: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// The `SQLite`-backed document catalog.
#[derive(Debug)]
pub struct Catalog {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Catalog {
    /// Open or create a catalog database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening catalog at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Catalog opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory catalog for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Catalog a document: insert a new path, replace a changed one.
    ///
    /// Change detection is by content hash, scoped to the path. Identical
    /// content under two different paths is cataloged twice; the corpus
    /// has no uniqueness constraint on content.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upsert(&self, document: &Document) -> Result<UpsertOutcome> {
        let record = DocumentRecord::from_document(document);

        let existing: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, content_hash FROM documents WHERE rel_path = ?1",
                [&record.rel_path],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((id, hash)) if hash == record.content_hash => {
                debug!("Unchanged: {}", record.rel_path);
                Ok(UpsertOutcome::Unchanged(id))
            }
            Some((id, _)) => {
                self.write_row(Some(id), &record)?;
                debug!("Updated: {}", record.rel_path);
                Ok(UpsertOutcome::Updated(id))
            }
            None => {
                self.write_row(None, &record)?;
                let id = self.conn.last_insert_rowid();
                debug!("Inserted: {} (id {})", record.rel_path, id);
                Ok(UpsertOutcome::Inserted(id))
            }
        }
    }

    /// Insert or replace a document row.
    fn write_row(&self, id: Option<i64>, record: &DocumentRecord) -> Result<()> {
        let fm = &record.frontmatter;
        let technologies = serde_json::to_string(&fm.technologies)?;
        let programming_languages = serde_json::to_string(&fm.programming_languages)?;
        let tags = serde_json::to_string(&fm.tags)?;
        let key_concepts = serde_json::to_string(&fm.key_concepts)?;
        let extra = serde_json::to_string(&fm.extra)?;
        let date_published = stored_datetime(fm.date_published, fm.date_published_raw.as_deref());
        let date_captured = stored_datetime(fm.date_captured, fm.date_captured_raw.as_deref());
        let ingested_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let values = params![
            record.rel_path,
            record.year,
            record.path_category,
            record.slug,
            fm.title,
            fm.source,
            fm.domain,
            fm.author,
            fm.category,
            date_published,
            date_captured,
            fm.difficulty_level,
            fm.summary,
            technologies,
            programming_languages,
            tags,
            key_concepts,
            fm.code_examples.map(i64::from),
            extra,
            record.body,
            record.content_hash,
            ingested_at,
        ];

        if id.is_some() {
            // rel_path is unique and unchanged, so it doubles as the key.
            self.conn.execute(
                r"
                UPDATE documents SET year = ?2, path_category = ?3, slug = ?4, title = ?5,
                    source_url = ?6, domain = ?7, author = ?8, category = ?9,
                    date_published = ?10, date_captured = ?11, difficulty = ?12, summary = ?13,
                    technologies = ?14, programming_languages = ?15, tags = ?16,
                    key_concepts = ?17, code_examples = ?18, extra = ?19, body = ?20,
                    content_hash = ?21, ingested_at = ?22
                WHERE rel_path = ?1
                ",
                values,
            )?;
        } else {
            self.conn.execute(
                r"
                INSERT INTO documents (rel_path, year, path_category, slug, title, source_url,
                    domain, author, category, date_published, date_captured, difficulty, summary,
                    technologies, programming_languages, tags, key_concepts, code_examples,
                    extra, body, content_hash, ingested_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19, ?20, ?21, ?22)
                ",
                values,
            )?;
        }
        Ok(())
    }

    /// Get a cataloged document by its collection-relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_by_path(&self, rel_path: &str) -> Result<Option<DocumentRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE rel_path = ?1");
        let result = self
            .conn
            .query_row(&sql, [rel_path], Self::row_to_record)
            .optional()?;
        Ok(result)
    }

    /// Run a filtered query against the catalog.
    ///
    /// Results are ordered by capture date, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn query(&self, filter: &SearchFilter) -> Result<Vec<DocumentRecord>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(text) = &filter.text {
            let pattern = format!("%{text}%");
            clauses.push("(title LIKE ? OR summary LIKE ? OR body LIKE ?)");
            values.push(Box::new(pattern.clone()));
            values.push(Box::new(pattern.clone()));
            values.push(Box::new(pattern));
        }
        if let Some(category) = &filter.category {
            clauses.push("(LOWER(category) = LOWER(?) OR LOWER(path_category) = LOWER(?))");
            values.push(Box::new(category.clone()));
            values.push(Box::new(category.clone()));
        }
        if let Some(year) = filter.year {
            clauses.push("year = ?");
            values.push(Box::new(year));
        }
        if let Some(technology) = &filter.technology {
            clauses.push("technologies LIKE ?");
            values.push(Box::new(format!("%\"{technology}\"%")));
        }
        if let Some(tag) = &filter.tag {
            clauses.push("tags LIKE ?");
            values.push(Box::new(format!("%\"{tag}\"%")));
        }
        if let Some(difficulty) = &filter.difficulty {
            clauses.push("LOWER(difficulty) = LOWER(?)");
            values.push(Box::new(difficulty.clone()));
        }
        if let Some(since) = filter.since {
            clauses.push("date_captured >= ?");
            values.push(Box::new(since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(until) = filter.until {
            clauses.push("date_captured <= ?");
            values.push(Box::new(until.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let mut sql = format!("SELECT {COLUMNS} FROM documents");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date_captured DESC, rel_path ASC");
        if filter.limit > 0 {
            sql.push_str(" LIMIT ?");
            let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
            values.push(Box::new(limit));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(&values), Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Get the most recently captured documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            limit,
            ..SearchFilter::default()
        })
    }

    /// Search documents by title, summary, or body substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search(&self, text: &str, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            text: Some(text.to_string()),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents in a category (front matter or path component).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_category(&self, category: &str, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            category: Some(category.to_string()),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents under a year directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_year(&self, year: i32, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            year: Some(year),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents mentioning a named technology.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_technology(&self, technology: &str, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            technology: Some(technology.to_string()),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents carrying a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            tag: Some(tag.to_string()),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents at a difficulty level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_difficulty(
        &self,
        level: DifficultyLevel,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            difficulty: Some(level.to_string()),
            limit,
            ..SearchFilter::default()
        })
    }

    /// List documents captured within a time range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn captured_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>> {
        self.query(&SearchFilter {
            since: Some(since),
            until: Some(until),
            limit,
            ..SearchFilter::default()
        })
    }

    /// Count total cataloged documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Map of cataloged path to content hash, for incremental scans.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn known_hashes(&self) -> Result<HashMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rel_path, content_hash FROM documents")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;
        Ok(pairs)
    }

    /// Groups of paths sharing identical content, sorted by path.
    ///
    /// Duplicates are expected in a scraped corpus; this reports them, it
    /// never removes them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn duplicate_groups(&self) -> Result<Vec<Vec<String>>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT content_hash FROM documents
            GROUP BY content_hash HAVING COUNT(*) > 1
            ORDER BY content_hash
            ",
        )?;
        let hashes = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut groups = Vec::with_capacity(hashes.len());
        let mut path_stmt = self.conn.prepare(
            "SELECT rel_path FROM documents WHERE content_hash = ?1 ORDER BY rel_path",
        )?;
        for hash in hashes {
            let paths = path_stmt
                .query_map([&hash], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            groups.push(paths);
        }
        Ok(groups)
    }

    /// Delete a document row by path.
    ///
    /// Returns `true` if a row was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_by_path(&self, rel_path: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM documents WHERE rel_path = ?1", [rel_path])?;
        Ok(affected > 0)
    }

    /// Remove rows whose file no longer exists in the corpus.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_missing(&self, live_paths: &HashSet<String>) -> Result<usize> {
        let cataloged: Vec<String> = {
            let mut stmt = self.conn.prepare("SELECT rel_path FROM documents")?;
            let paths = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            paths
        };

        let mut removed = 0;
        for path in cataloged {
            if !live_paths.contains(&path) {
                removed += self
                    .conn
                    .execute("DELETE FROM documents WHERE rel_path = ?1", [&path])?;
            }
        }

        if removed > 0 {
            info!("Removed {} rows for missing corpus files", removed);
        }
        Ok(removed)
    }

    /// Get catalog statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<CatalogStats> {
        let total_documents = self.count()?;

        // Placeholder capture dates are non-numeric strings; keep them out
        // of the min/max.
        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            r"
            SELECT MIN(date_captured), MAX(date_captured) FROM documents
            WHERE date_captured GLOB '[0-9][0-9][0-9][0-9]-*'
            ",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let category_count: i64 = self.conn.query_row(
            r"
            SELECT COUNT(DISTINCT LOWER(COALESCE(category, path_category))) FROM documents
            WHERE COALESCE(category, path_category) IS NOT NULL
            ",
            [],
            |row| row.get(0),
        )?;

        let year_count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT year) FROM documents WHERE year IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let duplicate_groups: i64 = self.conn.query_row(
            r"
            SELECT COUNT(*) FROM (
                SELECT content_hash FROM documents GROUP BY content_hash HAVING COUNT(*) > 1
            )
            ",
            [],
            |row| row.get(0),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(CatalogStats {
            total_documents,
            oldest_capture: oldest.as_deref().and_then(parse_datetime),
            newest_capture: newest.as_deref().and_then(parse_datetime),
            category_count,
            year_count,
            duplicate_groups,
            db_size_bytes,
        })
    }

    /// Convert a database row to a `DocumentRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<DocumentRecord> {
        let id: i64 = row.get(0)?;
        let rel_path: String = row.get(1)?;
        let year: Option<i32> = row.get(2)?;
        let path_category: Option<String> = row.get(3)?;
        let slug: Option<String> = row.get(4)?;
        let title: String = row.get(5)?;
        let source: String = row.get(6)?;
        let domain: Option<String> = row.get(7)?;
        let author: Option<String> = row.get(8)?;
        let category: Option<String> = row.get(9)?;
        let date_published_col: Option<String> = row.get(10)?;
        let date_captured_col: Option<String> = row.get(11)?;
        let difficulty_level: Option<String> = row.get(12)?;
        let summary: Option<String> = row.get(13)?;
        let technologies: String = row.get(14)?;
        let programming_languages: String = row.get(15)?;
        let tags: String = row.get(16)?;
        let key_concepts: String = row.get(17)?;
        let code_examples: Option<i64> = row.get(18)?;
        let extra: String = row.get(19)?;
        let body: String = row.get(20)?;
        let content_hash: String = row.get(21)?;
        let ingested_at: Option<String> = row.get(22)?;

        let (date_published, date_published_raw) = split_datetime(date_published_col);
        let (date_captured, date_captured_raw) = split_datetime(date_captured_col);

        let frontmatter = Frontmatter {
            title,
            source,
            date_published,
            date_published_raw,
            date_captured,
            date_captured_raw,
            domain,
            author,
            category,
            technologies: serde_json::from_str(&technologies).unwrap_or_default(),
            programming_languages: serde_json::from_str(&programming_languages)
                .unwrap_or_default(),
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            key_concepts: serde_json::from_str(&key_concepts).unwrap_or_default(),
            code_examples: code_examples.map(|v| v != 0),
            difficulty_level,
            summary,
            extra: serde_json::from_str(&extra).unwrap_or_default(),
        };

        Ok(DocumentRecord {
            id: Some(id),
            rel_path,
            year,
            path_category,
            slug,
            frontmatter,
            body,
            content_hash,
            ingested_at: ingested_at.as_deref().and_then(parse_datetime),
        })
    }
}

/// The column form of a datetime field: raw placeholder text wins, then
/// the parsed timestamp as RFC 3339.
fn stored_datetime(parsed: Option<DateTime<Utc>>, raw: Option<&str>) -> Option<String> {
    raw.map(String::from)
        .or_else(|| parsed.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

/// Split a stored datetime column back into `(parsed, raw)`.
fn split_datetime(stored: Option<String>) -> (Option<DateTime<Utc>>, Option<String>) {
    match stored {
        None => (None, None),
        Some(s) if is_placeholder(&s) => (None, Some(s)),
        Some(s) => match parse_datetime(&s) {
            Some(parsed) => (Some(parsed), None),
            None => (None, Some(s)),
        },
    }
}
