//! Corpus validation.
//!
//! Runs the built-in rule set over parsed documents and envelope failures,
//! producing a per-file findings report. Validation never mutates the
//! corpus: placeholders and duplicates are facts to report, not defects to
//! repair.

pub mod rules;

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use crate::config::ValidateConfig;
use crate::corpus::CorpusPath;
use crate::document::Document;

pub use rules::{Rule, Severity};

/// A single rule violation on a single file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Path of the offending file, relative to the collection root.
    pub rel_path: String,

    /// Name of the violated rule.
    pub rule: &'static str,

    /// Severity of the violation.
    pub severity: Severity,

    /// Human-readable description of the violation.
    pub message: String,
}

impl Finding {
    fn new(rel_path: &str, rule: &Rule, message: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.to_string(),
            rule: rule.name,
            severity: rule.severity,
            message: message.into(),
        }
    }
}

/// The outcome of validating a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Number of files examined (including unparseable ones).
    pub files_checked: usize,

    /// All rule violations, in scan order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Number of error-severity findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    /// Number of warning-severity findings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Whether the corpus has no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether validation passes: no errors, and in strict mode no
    /// warnings either.
    #[must_use]
    pub fn passes(&self, strict: bool) -> bool {
        if strict {
            self.is_clean()
        } else {
            self.error_count() == 0
        }
    }
}

/// Runs the built-in rule set over documents.
#[derive(Debug)]
pub struct Validator {
    ignored: HashSet<String>,
}

impl Validator {
    /// Create a validator honoring the configured ignore list.
    #[must_use]
    pub fn new(config: &ValidateConfig) -> Self {
        Self {
            ignored: config.ignore_rules.iter().cloned().collect(),
        }
    }

    fn enabled(&self, rule: &Rule) -> bool {
        !self.ignored.contains(rule.name)
    }

    /// Run all per-document rules over one document.
    #[must_use]
    pub fn check_document(&self, document: &Document) -> Vec<Finding> {
        let rel_path = document.rel_path_str();
        let fm = &document.frontmatter;
        let mut findings = Vec::new();

        if self.enabled(&rules::TITLE_PRESENT) && fm.title.trim().is_empty() {
            findings.push(Finding::new(
                &rel_path,
                &rules::TITLE_PRESENT,
                "title is missing or empty",
            ));
        }

        if self.enabled(&rules::SOURCE_PRESENT) && fm.source.trim().is_empty() {
            findings.push(Finding::new(
                &rel_path,
                &rules::SOURCE_PRESENT,
                "source is missing or empty",
            ));
        }

        if self.enabled(&rules::DATE_CAPTURED_VALID) && fm.date_captured.is_none() {
            let message = match &fm.date_captured_raw {
                Some(raw) => format!("date_captured '{raw}' is not a valid timestamp"),
                None => "date_captured is missing".to_string(),
            };
            findings.push(Finding::new(&rel_path, &rules::DATE_CAPTURED_VALID, message));
        }

        if self.enabled(&rules::DATE_PUBLISHED_KNOWN) && fm.date_published.is_none() {
            let message = match &fm.date_published_raw {
                Some(raw) => format!("date_published is the placeholder '{raw}'"),
                None => "date_published is missing".to_string(),
            };
            findings.push(Finding::new(
                &rel_path,
                &rules::DATE_PUBLISHED_KNOWN,
                message,
            ));
        }

        if self.enabled(&rules::AUTHOR_KNOWN) && !fm.author_known() {
            let message = match &fm.author {
                Some(raw) => format!("author is the placeholder '{raw}'"),
                None => "author is missing".to_string(),
            };
            findings.push(Finding::new(&rel_path, &rules::AUTHOR_KNOWN, message));
        }

        if self.enabled(&rules::DOMAIN_KNOWN) && !fm.domain_known() {
            let message = match &fm.domain {
                Some(raw) => format!("domain is the placeholder '{raw}'"),
                None => "domain is missing".to_string(),
            };
            findings.push(Finding::new(&rel_path, &rules::DOMAIN_KNOWN, message));
        }

        match CorpusPath::parse(&document.rel_path) {
            None => {
                if self.enabled(&rules::PATH_CONVENTION) {
                    findings.push(Finding::new(
                        &rel_path,
                        &rules::PATH_CONVENTION,
                        "filename does not match <year>/<date>_<category>_<slug>.md",
                    ));
                }
            }
            Some(corpus_path) => {
                if self.enabled(&rules::YEAR_CONSISTENT) {
                    if !corpus_path.year_matches_date() {
                        findings.push(Finding::new(
                            &rel_path,
                            &rules::YEAR_CONSISTENT,
                            format!(
                                "year directory {} does not match filename date {}",
                                corpus_path.year, corpus_path.date
                            ),
                        ));
                    }
                    if let Some(captured) = fm.date_captured {
                        if captured.year() != corpus_path.year {
                            findings.push(Finding::new(
                                &rel_path,
                                &rules::YEAR_CONSISTENT,
                                format!(
                                    "year directory {} does not match date_captured {}",
                                    corpus_path.year,
                                    captured.date_naive()
                                ),
                            ));
                        }
                    }
                }
            }
        }

        if self.enabled(&rules::CODE_EXAMPLES_FLAG) {
            match fm.code_examples {
                Some(true) if !document.has_code_fences() => {
                    findings.push(Finding::new(
                        &rel_path,
                        &rules::CODE_EXAMPLES_FLAG,
                        "code_examples is true but the body has no fenced code blocks",
                    ));
                }
                Some(false) if document.has_code_fences() => {
                    findings.push(Finding::new(
                        &rel_path,
                        &rules::CODE_EXAMPLES_FLAG,
                        format!(
                            "code_examples is false but the body has {} fenced code block(s)",
                            document.code_fence_count()
                        ),
                    ));
                }
                _ => {}
            }
        }

        findings
    }

    /// Run all rules over a parsed corpus.
    ///
    /// `parse_failures` carries `(rel_path, reason)` pairs for files whose
    /// envelope could not be parsed; these become `yaml-parses` findings.
    #[must_use]
    pub fn check_corpus(
        &self,
        documents: &[Document],
        parse_failures: &[(String, String)],
    ) -> ValidationReport {
        let mut findings = Vec::new();

        if self.enabled(&rules::YAML_PARSES) {
            for (rel_path, reason) in parse_failures {
                findings.push(Finding::new(rel_path, &rules::YAML_PARSES, reason.clone()));
            }
        }

        for document in documents {
            findings.extend(self.check_document(document));
        }

        if self.enabled(&rules::DUPLICATE_CONTENT) {
            findings.extend(duplicate_findings(documents));
        }

        let report = ValidationReport {
            files_checked: documents.len() + parse_failures.len(),
            findings,
        };
        debug!(
            "Validated {} files: {} errors, {} warnings",
            report.files_checked,
            report.error_count(),
            report.warning_count()
        );
        report
    }
}

/// Report every file whose content is byte-identical to another file.
fn duplicate_findings(documents: &[Document]) -> Vec<Finding> {
    let mut by_hash: HashMap<&str, Vec<String>> = HashMap::new();
    for document in documents {
        by_hash
            .entry(document.content_hash.as_str())
            .or_default()
            .push(document.rel_path_str());
    }

    let mut findings = Vec::new();
    for document in documents {
        let group = &by_hash[document.content_hash.as_str()];
        if group.len() < 2 {
            continue;
        }
        let rel_path = document.rel_path_str();
        let others: Vec<&str> = group
            .iter()
            .filter(|p| **p != rel_path)
            .map(String::as_str)
            .collect();
        findings.push(Finding::new(
            &rel_path,
            &rules::DUPLICATE_CONTENT,
            format!("content is identical to {}", others.join(", ")),
        ));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Frontmatter;
    use chrono::{TimeZone, Utc};

    fn validator() -> Validator {
        Validator::new(&ValidateConfig::default())
    }

    fn clean_document() -> Document {
        let frontmatter = Frontmatter {
            title: "gRPC streaming in .NET".to_string(),
            source: "https://example.dev/posts/grpc-streaming".to_string(),
            date_published: Some(Utc.with_ymd_and_hms(2024, 5, 18, 9, 0, 0).unwrap()),
            date_captured: Some(Utc.with_ymd_and_hms(2024, 5, 21, 14, 30, 12).unwrap()),
            domain: Some("example.dev".to_string()),
            author: Some("Rena Okafor".to_string()),
            category: Some("backend".to_string()),
            code_examples: Some(true),
            ..Frontmatter::default()
        };
        Document::new(
            "2024/2024-05-21_backend_grpc-streaming.md",
            frontmatter,
            "Intro\n\n```csharp\nvar x = 1;\n```\n".to_string(),
            "raw grpc doc",
        )
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let findings = validator().check_document(&clean_document());
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    #[test]
    fn test_missing_title_and_source() {
        let mut doc = clean_document();
        doc.frontmatter.title = String::new();
        doc.frontmatter.source = "  ".to_string();

        let findings = validator().check_document(&doc);
        let names: Vec<&str> = findings.iter().map(|f| f.rule).collect();
        assert!(names.contains(&"title-present"));
        assert!(names.contains(&"source-present"));
    }

    #[test]
    fn test_missing_date_captured_is_error() {
        let mut doc = clean_document();
        doc.frontmatter.date_captured = None;

        let findings = validator().check_document(&doc);
        let finding = findings
            .iter()
            .find(|f| f.rule == "date-captured-valid")
            .unwrap();
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding.message.contains("missing"));
    }

    #[test]
    fn test_unparseable_date_captured_names_the_value() {
        let mut doc = clean_document();
        doc.frontmatter.date_captured = None;
        doc.frontmatter.date_captured_raw = Some("mid-may".to_string());

        let findings = validator().check_document(&doc);
        let finding = findings
            .iter()
            .find(|f| f.rule == "date-captured-valid")
            .unwrap();
        assert!(finding.message.contains("mid-may"));
    }

    #[test]
    fn test_placeholder_fields_are_warnings() {
        let mut doc = clean_document();
        doc.frontmatter.date_published = None;
        doc.frontmatter.date_published_raw = Some("unknown".to_string());
        doc.frontmatter.author = Some("Unknown".to_string());
        doc.frontmatter.domain = None;

        let findings = validator().check_document(&doc);
        for rule in ["date-published-known", "author-known", "domain-known"] {
            let finding = findings.iter().find(|f| f.rule == rule).unwrap();
            assert_eq!(finding.severity, Severity::Warning, "rule {rule}");
        }
    }

    #[test]
    fn test_nonconforming_path() {
        let mut doc = clean_document();
        doc.rel_path = "2024/scratchpad.md".into();

        let findings = validator().check_document(&doc);
        assert!(findings.iter().any(|f| f.rule == "path-convention"));
        assert!(!findings.iter().any(|f| f.rule == "year-consistent"));
    }

    #[test]
    fn test_year_directory_mismatch() {
        let mut doc = clean_document();
        doc.rel_path = "2023/2024-05-21_backend_grpc-streaming.md".into();

        let findings = validator().check_document(&doc);
        let year_findings: Vec<_> = findings
            .iter()
            .filter(|f| f.rule == "year-consistent")
            .collect();
        // Both the filename date and the capture date disagree with 2023.
        assert_eq!(year_findings.len(), 2);
    }

    #[test]
    fn test_code_examples_flag_mismatch() {
        let mut doc = clean_document();
        doc.body = "No code at all.".to_string();

        let findings = validator().check_document(&doc);
        let finding = findings
            .iter()
            .find(|f| f.rule == "code-examples-flag")
            .unwrap();
        assert!(finding.message.contains("no fenced code blocks"));

        let mut doc = clean_document();
        doc.frontmatter.code_examples = Some(false);
        let findings = validator().check_document(&doc);
        assert!(findings.iter().any(|f| f.rule == "code-examples-flag"));
    }

    #[test]
    fn test_code_examples_flag_absent_is_fine() {
        let mut doc = clean_document();
        doc.frontmatter.code_examples = None;
        doc.body = "No code.".to_string();

        let findings = validator().check_document(&doc);
        assert!(!findings.iter().any(|f| f.rule == "code-examples-flag"));
    }

    #[test]
    fn test_check_corpus_reports_parse_failures() {
        let failures = vec![(
            "2024/2024-05-21_backend_broken.md".to_string(),
            "mapping values are not allowed in this context".to_string(),
        )];
        let report = validator().check_corpus(&[clean_document()], &failures);

        assert_eq!(report.files_checked, 2);
        let finding = report
            .findings
            .iter()
            .find(|f| f.rule == "yaml-parses")
            .unwrap();
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding.message.contains("mapping values"));
    }

    #[test]
    fn test_check_corpus_reports_duplicates() {
        let a = clean_document();
        let mut b = clean_document();
        b.rel_path = "2024/2024-05-22_backend_grpc-streaming-again.md".into();
        // Same raw content, so same hash.

        let report = validator().check_corpus(&[a, b], &[]);
        let dupes: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.rule == "duplicate-content")
            .collect();
        assert_eq!(dupes.len(), 2);
        assert!(dupes[0]
            .message
            .contains("2024/2024-05-22_backend_grpc-streaming-again.md"));
    }

    #[test]
    fn test_ignored_rules_are_skipped() {
        let config = ValidateConfig {
            ignore_rules: vec!["author-known".to_string(), "domain-known".to_string()],
        };
        let validator = Validator::new(&config);

        let mut doc = clean_document();
        doc.frontmatter.author = None;
        doc.frontmatter.domain = None;

        let findings = validator.check_document(&doc);
        assert!(!findings.iter().any(|f| f.rule == "author-known"));
        assert!(!findings.iter().any(|f| f.rule == "domain-known"));
    }

    #[test]
    fn test_report_counts_and_passes() {
        let mut doc = clean_document();
        doc.frontmatter.title = String::new();
        doc.frontmatter.author = None;

        let report = validator().check_corpus(&[doc], &[]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_clean());
        assert!(!report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_report_passes_with_warnings_only() {
        let mut doc = clean_document();
        doc.frontmatter.author = None;

        let report = validator().check_corpus(&[doc], &[]);
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
        assert!(report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_report_clean_corpus() {
        let report = validator().check_corpus(&[clean_document()], &[]);
        assert!(report.is_clean());
        assert!(report.passes(true));
        assert_eq!(report.files_checked, 1);
    }

    #[test]
    fn test_report_serialize() {
        let report = validator().check_corpus(&[clean_document()], &[]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("files_checked"));
        assert!(json.contains("findings"));
    }
}
