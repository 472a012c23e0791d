//! Corpus layout and scanning.
//!
//! The corpus is a dated file tree of scraped articles:
//! `<corpus root>/<collection>/<year>/<date>_<category>_<slug>.md`, with
//! `rac` as the conventional collection label. Files that stray from the
//! naming convention still load; the convention is a validation concern,
//! not a parsing one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::document::{path_to_string, Document};
use crate::error::{Error, Result};
use crate::frontmatter;

/// Conventional collection label for scraped article trees.
pub const DEFAULT_COLLECTION: &str = "rac";

/// Filename convention: `<date>_<category>_<slug>.md`.
fn filename_regex() -> &'static Regex {
    static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
    FILENAME_RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2})_([a-z0-9][a-z0-9-]*)_([A-Za-z0-9][A-Za-z0-9._-]*)\.md$")
            .expect("filename regex is valid")
    })
}

/// Parsed components of a convention-conforming corpus path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPath {
    /// The year directory the file sits under.
    pub year: i32,
    /// The capture date embedded in the filename.
    pub date: NaiveDate,
    /// The category component of the filename.
    pub category: String,
    /// The slug component of the filename.
    pub slug: String,
}

impl CorpusPath {
    /// Parse a collection-relative path against the naming convention.
    ///
    /// Returns `None` for paths that do not conform (extra nesting, bad
    /// year directory, malformed filename).
    #[must_use]
    pub fn parse(rel_path: &Path) -> Option<Self> {
        let mut components = rel_path.components();
        let year_str = components.next()?.as_os_str().to_str()?;
        let file_name = components.next()?.as_os_str().to_str()?;
        if components.next().is_some() {
            return None;
        }

        if year_str.len() != 4 {
            return None;
        }
        let year: i32 = year_str.parse().ok()?;

        let captures = filename_regex().captures(file_name)?;
        let date = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()?;

        Some(Self {
            year,
            date,
            category: captures[2].to_string(),
            slug: captures[3].to_string(),
        })
    }

    /// Whether the year directory matches the filename date.
    #[must_use]
    pub fn year_matches_date(&self) -> bool {
        self.year == self.date.year()
    }
}

/// A collection of corpus documents rooted at a single directory.
///
/// The root is the collection directory itself (e.g.
/// `documentation/rac`), holding year subdirectories.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    /// Create a corpus over the given collection root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The collection root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate all Markdown documents under the root, in sorted order.
    ///
    /// Hidden files and directories are skipped. Returned paths are
    /// relative to the collection root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorpusRoot`] when the root directory is missing.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::CorpusRoot {
                path: self.root.clone(),
            });
        }

        let pattern = format!("{}/**/*.md", self.root.display());
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        let entries = glob::glob(&pattern)
            .map_err(|e| Error::internal(format!("bad scan pattern: {e}")))?;

        for entry in entries.flatten() {
            let rel = match entry.strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };

            // Skip hidden files and directories.
            if rel
                .components()
                .any(|c| c.as_os_str().to_str().is_some_and(|s| s.starts_with('.')))
            {
                continue;
            }

            if seen.insert(rel.clone()) {
                results.push(rel);
            }
        }

        results.sort();
        debug!("Scanned {} documents under {}", results.len(), self.root.display());
        Ok(results)
    }

    /// Read and parse a single document.
    ///
    /// The file is read lossily (invalid UTF-8 becomes replacement
    /// characters, matching how the scraper treats its own output).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its envelope cannot
    /// be parsed.
    pub fn load(&self, rel_path: &Path) -> Result<Document> {
        let raw = self.read_raw(rel_path)?;
        let (frontmatter, body) = frontmatter::parse(rel_path, &raw)?;
        Ok(Document::new(rel_path, frontmatter, body, &raw))
    }

    /// Compute the content hash of a document without parsing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn hash(&self, rel_path: &Path) -> Result<String> {
        let raw = self.read_raw(rel_path)?;
        Ok(Document::compute_hash(&raw))
    }

    /// Read a document's raw content as lossy UTF-8.
    fn read_raw(&self, rel_path: &Path) -> Result<String> {
        let full_path = self.root.join(rel_path);
        let bytes = std::fs::read(&full_path).map_err(|source| Error::DocumentRead {
            path: rel_path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Render a relative path for catalog keys and log lines.
#[must_use]
pub fn rel_key(rel_path: &Path) -> String {
    path_to_string(rel_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clipdex_corpus_{label}_{}", std::process::id()))
    }

    fn write_doc(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("rel path has a parent"))
            .expect("create fixture dirs");
        std::fs::write(path, text).expect("write fixture");
    }

    #[test]
    fn test_corpus_path_parse_valid() {
        let cp = CorpusPath::parse(Path::new(
            "2024/2024-05-21_backend_idempotent-post-aspnetcore.md",
        ))
        .unwrap();
        assert_eq!(cp.year, 2024);
        assert_eq!(cp.date, NaiveDate::from_ymd_opt(2024, 5, 21).unwrap());
        assert_eq!(cp.category, "backend");
        assert_eq!(cp.slug, "idempotent-post-aspnetcore");
        assert!(cp.year_matches_date());
    }

    #[test]
    fn test_corpus_path_parse_year_mismatch() {
        let cp = CorpusPath::parse(Path::new("2023/2024-01-02_backend_slug.md")).unwrap();
        assert!(!cp.year_matches_date());
    }

    #[test]
    fn test_corpus_path_parse_rejects_nonconforming() {
        assert!(CorpusPath::parse(Path::new("notes.md")).is_none());
        assert!(CorpusPath::parse(Path::new("2024/notes.md")).is_none());
        assert!(CorpusPath::parse(Path::new("2024/sub/2024-05-21_backend_slug.md")).is_none());
        assert!(CorpusPath::parse(Path::new("24/2024-05-21_backend_slug.md")).is_none());
        assert!(CorpusPath::parse(Path::new("2024/2024-5-21_backend_slug.md")).is_none());
        assert!(CorpusPath::parse(Path::new("2024/2024-05-21_Backend_slug.md")).is_none());
    }

    #[test]
    fn test_corpus_path_parse_slug_with_dots() {
        let cp = CorpusPath::parse(Path::new("2024/2024-06-03_dotnet_aspnet-core-9.0-preview.md"))
            .unwrap();
        assert_eq!(cp.slug, "aspnet-core-9.0-preview");
    }

    #[test]
    fn test_corpus_path_parse_bad_date() {
        assert!(CorpusPath::parse(Path::new("2024/2024-13-41_backend_slug.md")).is_none());
    }

    #[test]
    fn test_scan_missing_root() {
        let corpus = Corpus::new("/nonexistent/clipdex/corpus");
        let err = corpus.scan().unwrap_err();
        assert!(err.is_corpus_root_error());
    }

    #[test]
    fn test_scan_sorted_and_skips_hidden() {
        let root = scratch_root("scan");
        let _ = std::fs::remove_dir_all(&root);

        write_doc(&root, "2024/2024-06-03_caching_b.md", "```yaml\ntitle: B\n```\n");
        write_doc(&root, "2023/2023-11-17_security_a.md", "```yaml\ntitle: A\n```\n");
        write_doc(&root, "2024/.hidden.md", "```yaml\ntitle: H\n```\n");
        write_doc(&root, ".obsidian/cache.md", "not a doc");
        write_doc(&root, "2024/readme.txt", "not markdown");

        let corpus = Corpus::new(&root);
        let scanned = corpus.scan().unwrap();

        assert_eq!(
            scanned,
            vec![
                PathBuf::from("2023/2023-11-17_security_a.md"),
                PathBuf::from("2024/2024-06-03_caching_b.md"),
            ]
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_load_document() {
        let root = scratch_root("load");
        let _ = std::fs::remove_dir_all(&root);

        let text = "```yaml\ntitle: Loaded\nsource: https://example.dev/a\n```\n\nBody.\n";
        write_doc(&root, "2024/2024-06-03_caching_loaded.md", text);

        let corpus = Corpus::new(&root);
        let doc = corpus
            .load(Path::new("2024/2024-06-03_caching_loaded.md"))
            .unwrap();

        assert_eq!(doc.frontmatter.title, "Loaded");
        assert_eq!(doc.body, "Body.\n");
        assert_eq!(doc.content_hash, Document::compute_hash(text));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_load_missing_document() {
        let root = scratch_root("load_missing");
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();

        let corpus = Corpus::new(&root);
        let err = corpus.load(Path::new("2024/absent.md")).unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_hash_matches_load() {
        let root = scratch_root("hash");
        let _ = std::fs::remove_dir_all(&root);

        let text = "```yaml\ntitle: H\n```\n\nBody.\n";
        write_doc(&root, "2024/2024-06-03_caching_h.md", text);

        let corpus = Corpus::new(&root);
        let rel = Path::new("2024/2024-06-03_caching_h.md");
        assert_eq!(corpus.hash(rel).unwrap(), corpus.load(rel).unwrap().content_hash);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_rel_key() {
        assert_eq!(
            rel_key(Path::new("2024/2024-05-21_backend_slug.md")),
            "2024/2024-05-21_backend_slug.md"
        );
    }
}
