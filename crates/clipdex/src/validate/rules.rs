//! Built-in corpus validation rules.
//!
//! Each rule names one property of a well-formed corpus document. Errors
//! cover the properties every consumer depends on; warnings cover scraper
//! hygiene that degrades the corpus without breaking it.

use serde::Serialize;

/// How severe a rule violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The corpus is degraded but usable.
    Warning,
    /// The document breaks the corpus contract.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A named validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Stable rule name, used in reports and `ignore_rules` config.
    pub name: &'static str,

    /// Severity of a violation.
    pub severity: Severity,

    /// What the rule checks.
    pub description: &'static str,
}

/// The envelope parses as valid YAML.
pub const YAML_PARSES: Rule = Rule {
    name: "yaml-parses",
    severity: Severity::Error,
    description: "the front-matter envelope parses as valid YAML",
};

/// `title` is a non-empty string.
pub const TITLE_PRESENT: Rule = Rule {
    name: "title-present",
    severity: Severity::Error,
    description: "title is a non-empty string",
};

/// `source` is a non-empty string.
pub const SOURCE_PRESENT: Rule = Rule {
    name: "source-present",
    severity: Severity::Error,
    description: "source is a non-empty string",
};

/// `date_captured` is a valid timestamp.
pub const DATE_CAPTURED_VALID: Rule = Rule {
    name: "date-captured-valid",
    severity: Severity::Error,
    description: "date_captured is a valid ISO-8601 timestamp",
};

/// `date_published` is known (not missing or a placeholder).
pub const DATE_PUBLISHED_KNOWN: Rule = Rule {
    name: "date-published-known",
    severity: Severity::Warning,
    description: "date_published is present and not a placeholder",
};

/// `author` is known.
pub const AUTHOR_KNOWN: Rule = Rule {
    name: "author-known",
    severity: Severity::Warning,
    description: "author is present and not a placeholder",
};

/// `domain` is known.
pub const DOMAIN_KNOWN: Rule = Rule {
    name: "domain-known",
    severity: Severity::Warning,
    description: "domain is present and not a placeholder",
};

/// The filename follows the `<date>_<category>_<slug>.md` convention.
pub const PATH_CONVENTION: Rule = Rule {
    name: "path-convention",
    severity: Severity::Warning,
    description: "the path follows <year>/<date>_<category>_<slug>.md",
};

/// The year directory agrees with the capture date.
pub const YEAR_CONSISTENT: Rule = Rule {
    name: "year-consistent",
    severity: Severity::Warning,
    description: "the year directory matches the capture date",
};

/// The `code_examples` flag agrees with the body.
pub const CODE_EXAMPLES_FLAG: Rule = Rule {
    name: "code-examples-flag",
    severity: Severity::Warning,
    description: "the code_examples flag matches fenced code blocks in the body",
};

/// Another file holds identical content.
pub const DUPLICATE_CONTENT: Rule = Rule {
    name: "duplicate-content",
    severity: Severity::Warning,
    description: "no other file holds identical content",
};

/// All built-in rules, in reporting order.
pub const RULES: &[Rule] = &[
    YAML_PARSES,
    TITLE_PRESENT,
    SOURCE_PRESENT,
    DATE_CAPTURED_VALID,
    DATE_PUBLISHED_KNOWN,
    AUTHOR_KNOWN,
    DOMAIN_KNOWN,
    PATH_CONVENTION,
    YEAR_CONSISTENT,
    CODE_EXAMPLES_FLAG,
    DUPLICATE_CONTENT,
];

/// Look up a rule by name.
#[must_use]
pub fn rule(name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.name == name)
}
