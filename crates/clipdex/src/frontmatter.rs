//! Front-matter envelope codec.
//!
//! Corpus documents open with a fenced ```` ```yaml ```` block holding the
//! metadata record, followed by the Markdown body. Earlier scraper
//! revisions emitted classic `---` delimiters instead; both forms parse,
//! and serialization always emits the fenced form.
//!
//! Parsing is deliberately tolerant: the envelope itself must be valid
//! YAML, but every field inside it is optional, may be a placeholder
//! ("unknown"), and may use a scalar where a list is expected. Unrecognized
//! keys are preserved so a parsed document re-serializes without loss.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_yaml::{Mapping, Value};

use crate::document::{is_placeholder, Frontmatter};
use crate::error::{Error, Result};

/// Parse a document into its front-matter record and Markdown body.
///
/// `rel_path` is used only for error context.
///
/// # Errors
///
/// Returns [`Error::EnvelopeMissing`] when no envelope is found and
/// [`Error::EnvelopeParse`] when the envelope is not a YAML mapping.
pub fn parse(rel_path: &Path, text: &str) -> Result<(Frontmatter, String)> {
    let (yaml_src, body_src) = split_fenced(text)
        .or_else(|| split_dashed(text))
        .ok_or_else(|| Error::EnvelopeMissing {
            path: rel_path.to_path_buf(),
        })?;

    let value: Value = if yaml_src.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(yaml_src)
            .map_err(|e| Error::envelope_parse(rel_path, e.to_string()))?
    };

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        other => {
            return Err(Error::envelope_parse(
                rel_path,
                format!("expected a mapping, found {}", value_kind(&other)),
            ))
        }
    };

    let frontmatter = from_mapping(mapping);
    let body = body_src.trim_start_matches(['\r', '\n']).to_string();
    Ok((frontmatter, body))
}

/// Serialize a front-matter record and body into the canonical envelope.
///
/// The output opens with a fenced ```` ```yaml ```` block in a fixed key
/// order. Raw placeholder scalars are re-emitted verbatim; parsed
/// timestamps are emitted as RFC 3339.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> Result<String> {
    let mapping = to_mapping(frontmatter);
    let yaml = serde_yaml::to_string(&mapping)?;

    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str("```yaml\n");
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

/// Split a fenced ```` ```yaml ```` envelope into `(yaml, body)`.
fn split_fenced(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let after = trimmed
        .strip_prefix("```yaml")
        .or_else(|| trimmed.strip_prefix("```yml"))?;
    let after = after.strip_prefix('\r').unwrap_or(after);
    let after = after.strip_prefix('\n')?;
    find_closing(after, "```")
}

/// Split a `---`-delimited envelope into `(yaml, body)`.
fn split_dashed(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start_matches('\u{feff}');
    let after = trimmed.strip_prefix("---")?;
    let after = after.strip_prefix('\r').unwrap_or(after);
    let after = after.strip_prefix('\n')?;
    find_closing(after, "---")
}

/// Find the first line equal to `fence` and split around it.
fn find_closing<'a>(text: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == fence {
            return Some((&text[..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Human-readable YAML value kind for error messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Build a front-matter record from a parsed YAML mapping.
///
/// Recognized keys are extracted with per-field tolerance; whatever is
/// left over lands in `extra` untouched.
fn from_mapping(mapping: Mapping) -> Frontmatter {
    let mut fields: BTreeMap<String, Value> = mapping
        .into_iter()
        .filter_map(|(key, value)| key.as_str().map(|k| (k.to_string(), value)))
        .collect();

    let title = take_string(&mut fields, "title").unwrap_or_default();
    let source = take_string(&mut fields, "source").unwrap_or_default();
    let (date_published, date_published_raw) = take_datetime(&mut fields, "date_published");
    let (date_captured, date_captured_raw) = take_datetime(&mut fields, "date_captured");
    let domain = take_string(&mut fields, "domain");
    let author = take_string(&mut fields, "author");
    let category = take_string(&mut fields, "category");
    let technologies = take_string_list(&mut fields, "technologies");
    let programming_languages = take_string_list(&mut fields, "programming_languages");
    let tags = take_string_list(&mut fields, "tags");
    let key_concepts = take_string_list(&mut fields, "key_concepts");
    let code_examples = take_bool(&mut fields, "code_examples");
    let difficulty_level = take_string(&mut fields, "difficulty_level");
    let summary = take_string(&mut fields, "summary");

    Frontmatter {
        title,
        source,
        date_published,
        date_published_raw,
        date_captured,
        date_captured_raw,
        domain,
        author,
        category,
        technologies,
        programming_languages,
        tags,
        key_concepts,
        code_examples,
        difficulty_level,
        summary,
        extra: fields,
    }
}

/// Build the canonical YAML mapping for a front-matter record.
fn to_mapping(frontmatter: &Frontmatter) -> Mapping {
    let mut mapping = Mapping::new();

    if !frontmatter.title.is_empty() {
        insert_str(&mut mapping, "title", &frontmatter.title);
    }
    if !frontmatter.source.is_empty() {
        insert_str(&mut mapping, "source", &frontmatter.source);
    }
    insert_datetime(
        &mut mapping,
        "date_published",
        frontmatter.date_published,
        frontmatter.date_published_raw.as_deref(),
    );
    insert_datetime(
        &mut mapping,
        "date_captured",
        frontmatter.date_captured,
        frontmatter.date_captured_raw.as_deref(),
    );
    insert_opt_str(&mut mapping, "domain", frontmatter.domain.as_deref());
    insert_opt_str(&mut mapping, "author", frontmatter.author.as_deref());
    insert_opt_str(&mut mapping, "category", frontmatter.category.as_deref());
    insert_list(&mut mapping, "technologies", &frontmatter.technologies);
    insert_list(
        &mut mapping,
        "programming_languages",
        &frontmatter.programming_languages,
    );
    insert_list(&mut mapping, "tags", &frontmatter.tags);
    insert_list(&mut mapping, "key_concepts", &frontmatter.key_concepts);
    if let Some(flag) = frontmatter.code_examples {
        mapping.insert(Value::String("code_examples".to_string()), Value::Bool(flag));
    }
    insert_opt_str(
        &mut mapping,
        "difficulty_level",
        frontmatter.difficulty_level.as_deref(),
    );
    insert_opt_str(&mut mapping, "summary", frontmatter.summary.as_deref());

    for (key, value) in &frontmatter.extra {
        mapping.insert(Value::String(key.clone()), value.clone());
    }

    mapping
}

fn insert_str(mapping: &mut Mapping, key: &str, value: &str) {
    mapping.insert(
        Value::String(key.to_string()),
        Value::String(value.to_string()),
    );
}

fn insert_opt_str(mapping: &mut Mapping, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        insert_str(mapping, key, value);
    }
}

fn insert_list(mapping: &mut Mapping, key: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let sequence = values
        .iter()
        .map(|v| Value::String(v.clone()))
        .collect::<Vec<_>>();
    mapping.insert(Value::String(key.to_string()), Value::Sequence(sequence));
}

fn insert_datetime(
    mapping: &mut Mapping,
    key: &str,
    parsed: Option<DateTime<Utc>>,
    raw: Option<&str>,
) {
    if let Some(raw) = raw {
        insert_str(mapping, key, raw);
    } else if let Some(parsed) = parsed {
        insert_str(
            mapping,
            key,
            &parsed.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
}

/// Remove a scalar field as a trimmed string.
///
/// Non-scalar values are put back so they survive in `extra`.
fn take_string(fields: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    let value = fields.remove(key)?;
    match scalar_to_string(&value) {
        Some(s) => Some(s),
        None => {
            fields.insert(key.to_string(), value);
            None
        }
    }
}

/// Remove a list field, accepting either a sequence or a comma-joined string.
fn take_string_list(fields: &mut BTreeMap<String, Value>, key: &str) -> Vec<String> {
    let Some(value) = fields.remove(key) else {
        return Vec::new();
    };
    match &value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => {
            fields.insert(key.to_string(), value);
            Vec::new()
        }
    }
}

/// Remove a boolean field, accepting YAML booleans and common string forms.
fn take_bool(fields: &mut BTreeMap<String, Value>, key: &str) -> Option<bool> {
    let value = fields.remove(key)?;
    match &value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => {
                fields.insert(key.to_string(), value);
                None
            }
        },
        _ => {
            fields.insert(key.to_string(), value);
            None
        }
    }
}

/// Remove a datetime field as `(parsed, raw)`.
///
/// Placeholders and unparseable scalars keep their raw form only.
fn take_datetime(
    fields: &mut BTreeMap<String, Value>,
    key: &str,
) -> (Option<DateTime<Utc>>, Option<String>) {
    let Some(value) = fields.remove(key) else {
        return (None, None);
    };
    let Some(raw) = scalar_to_string(&value) else {
        fields.insert(key.to_string(), value);
        return (None, None);
    };
    if is_placeholder(&raw) {
        return (None, Some(raw));
    }
    match parse_datetime(&raw) {
        Some(parsed) => (Some(parsed), None),
        None => (None, Some(raw)),
    }
}

/// Parse a datetime scalar in the formats the scraper has been seen to emit.
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Render a scalar YAML value as a trimmed string.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
