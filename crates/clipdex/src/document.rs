//! Document model for the article corpus.
//!
//! A corpus document is a scraped article: a YAML front-matter record
//! describing where and when the article was captured, followed by a
//! Markdown rendering of the article body.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scalar values the scraper emits when a field could not be determined.
///
/// Placeholders are preserved verbatim so documents round-trip; validation
/// reports them as warnings rather than treating them as parse errors.
pub const PLACEHOLDER_VALUES: &[&str] = &["unknown", "n/a", "none", "tbd"];

/// Check whether a scalar is a scraper placeholder (case-insensitive).
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    lowered.is_empty() || PLACEHOLDER_VALUES.contains(&lowered.as_str())
}

/// Difficulty rating assigned by the scraper.
///
/// The front matter stores this as a free-form string; values outside the
/// known set are kept raw and simply never match a difficulty filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// Introductory material.
    Beginner,
    /// Assumes working knowledge of the stack.
    Intermediate,
    /// Deep dives and internals.
    Advanced,
}

impl DifficultyLevel {
    /// Parse a difficulty string, case-insensitively.
    ///
    /// Returns `None` for values outside the known set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// The per-document metadata record from the front-matter envelope.
///
/// Every field is optional in the source material; `title` and `source`
/// degrade to empty strings when absent so that validation (not parsing)
/// decides what is acceptable. Raw scalar forms are kept wherever a value
/// may be a placeholder, so re-serialization loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frontmatter {
    /// Article headline.
    pub title: String,

    /// Origin link of the scraped article.
    pub source: String,

    /// When the article was originally published, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<Utc>>,

    /// Raw `date_published` scalar when it did not parse (e.g. "unknown").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published_raw: Option<String>,

    /// When the scrape occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_captured: Option<DateTime<Utc>>,

    /// Raw `date_captured` scalar when it did not parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_captured_raw: Option<String>,

    /// Source website host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Article author; often the placeholder "Unknown".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Loose topical tag (e.g. "backend", "security").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Named products/frameworks mentioned in the article.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,

    /// Languages appearing in code samples.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub programming_languages: Vec<String>,

    /// Free-form keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form concept labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_concepts: Vec<String>,

    /// Whether the body contains code blocks, per the scraper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_examples: Option<bool>,

    /// Free-form difficulty string (e.g. "intermediate").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,

    /// 2-6 sentence abstract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Unrecognized front-matter keys, preserved for round-tripping.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Frontmatter {
    /// The parsed difficulty level, if the raw string is a known value.
    #[must_use]
    pub fn difficulty(&self) -> Option<DifficultyLevel> {
        self.difficulty_level
            .as_deref()
            .and_then(DifficultyLevel::parse)
    }

    /// Whether the author field holds a real value (not a placeholder).
    #[must_use]
    pub fn author_known(&self) -> bool {
        self.author.as_deref().is_some_and(|a| !is_placeholder(a))
    }

    /// Whether the domain field holds a real value (not a placeholder).
    #[must_use]
    pub fn domain_known(&self) -> bool {
        self.domain.as_deref().is_some_and(|d| !is_placeholder(d))
    }
}

/// A parsed corpus document: metadata record plus Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path relative to the collection root (e.g. `2024/2024-05-21_backend_slug.md`).
    pub rel_path: PathBuf,

    /// The front-matter metadata record.
    pub frontmatter: Frontmatter,

    /// The Markdown body following the envelope.
    pub body: String,

    /// BLAKE3 hash of the raw file content, for change detection.
    pub content_hash: String,
}

impl Document {
    /// Create a document, hashing the raw file content.
    #[must_use]
    pub fn new(
        rel_path: impl Into<PathBuf>,
        frontmatter: Frontmatter,
        body: String,
        raw: &str,
    ) -> Self {
        Self {
            rel_path: rel_path.into(),
            frontmatter,
            body,
            content_hash: Self::compute_hash(raw),
        }
    }

    /// Compute the BLAKE3 hash of the given content.
    #[must_use]
    pub fn compute_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// The relative path as a displayable string.
    #[must_use]
    pub fn rel_path_str(&self) -> String {
        path_to_string(&self.rel_path)
    }

    /// Count fenced code blocks in the body.
    ///
    /// An unterminated trailing fence does not count as a block.
    #[must_use]
    pub fn code_fence_count(&self) -> usize {
        self.body
            .lines()
            .filter(|line| line.trim_start().starts_with("```"))
            .count()
            / 2
    }

    /// Whether the body contains at least one fenced code block.
    #[must_use]
    pub fn has_code_fences(&self) -> bool {
        self.code_fence_count() > 0
    }
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
