//! Front-matter parsing
//!
//! A content file may open with one of three fenced metadata blocks:
//!
//! ```text
//! ---            +++            ;;;
//! yaml: here     toml = "here"  {"json": "here"}
//! ---            +++            ;;;
//! ```
//!
//! Whatever the format, the block is turned into a [`FieldMap`] of
//! format-neutral [`FieldValue`]s so the schema can be checked in one place.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

lazy_static! {
    /// `key: value` on an unindented line
    static ref TOP_LEVEL_ENTRY: Regex =
        Regex::new(r"^([A-Za-z0-9_-]+)[ \t]*:[ \t]+(\S.*?)\s*$").unwrap();

    /// `key:` with the value on the following lines
    static ref TOP_LEVEL_KEY: Regex = Regex::new(r"^([A-Za-z0-9_-]+)[ \t]*:[ \t]*$").unwrap();

    /// `- item` in a block sequence
    static ref BLOCK_ITEM: Regex = Regex::new(r"^([ \t]*)-(?:[ \t]+(\S.*?))?\s*$").unwrap();

    /// YAML 1.1 timestamp grammar
    static ref YAML_TIMESTAMP: Regex = Regex::new(
        r"^\d{4}-\d{1,2}-\d{1,2}(?:(?:[Tt]|[ \t]+)\d{1,2}:\d{2}:\d{2}(?:\.\d*)?(?:[ \t]*(?:Z|z|[-+]\d{1,2}(?::?\d{2})?))?)?$"
    )
    .unwrap();
}

/// Ordered front-matter fields, keyed by their name in the file
pub type FieldMap = IndexMap<String, FieldValue>;

/// A front-matter value, independent of the format it was written in
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Date(DateTime<Utc>),
    Sequence(Vec<FieldValue>),
    Mapping(FieldMap),
}

impl FieldValue {
    /// Human-readable kind, used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "a boolean",
            FieldValue::Number(_) => "a number",
            FieldValue::String(_) => "a string",
            FieldValue::Date(_) => "a date",
            FieldValue::Sequence(_) => "a sequence",
            FieldValue::Mapping(_) => "a mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The fence a metadata block was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    pub fn fence(&self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
            Format::Json => ";;;",
        }
    }
}

/// Front-matter block could not be parsed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("`{0}` block is never closed")]
    Unclosed(&'static str),

    #[error("front-matter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Front-matter data from a content file
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    /// `None` when the file has no metadata block at all
    pub format: Option<Format>,
    pub fields: FieldMap,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ParseError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        for format in [Format::Yaml, Format::Toml, Format::Json] {
            let Some(split) = split_block(content, format.fence()) else {
                continue;
            };
            let (block, body) = split?;
            let fields = match format {
                Format::Yaml => parse_yaml(block)?,
                Format::Toml => parse_toml(block)?,
                Format::Json => parse_json(block)?,
            };
            let fm = FrontMatter {
                format: Some(format),
                fields,
            };
            return Ok((fm, body.trim_start_matches(['\n', '\r'])));
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Cut `content` into (block, body) around a pair of fence lines.
/// `None` means the content does not open with this fence.
fn split_block<'a>(
    content: &'a str,
    fence: &'static str,
) -> Option<Result<(&'a str, &'a str), ParseError>> {
    let first_end = content.find('\n').unwrap_or(content.len());
    if content[..first_end].trim_end() != fence {
        return None;
    }

    let rest = content.get(first_end + 1..).unwrap_or("");
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            return Some(Ok((&rest[..offset], &rest[offset + line.len()..])));
        }
        offset += line.len();
    }

    Some(Err(ParseError::Unclosed(fence)))
}

fn parse_yaml(block: &str) -> Result<FieldMap, ParseError> {
    let value: serde_yaml::Value = serde_yaml::from_str(block)?;
    let mapping = match value {
        serde_yaml::Value::Null => return Ok(FieldMap::new()),
        serde_yaml::Value::Mapping(m) => m,
        other => return Err(ParseError::NotAMapping(from_yaml(other).kind())),
    };

    // serde_yaml does not resolve timestamps, so plain (unquoted) scalars
    // that look like one are promoted to dates here.
    let plain = PlainScalars::scan(block);

    let mut fields = FieldMap::new();
    for (key, value) in mapping {
        let Some(key) = yaml_key(&key) else {
            continue;
        };
        let value = match value {
            serde_yaml::Value::String(s) if plain.values.contains(key.as_str()) => {
                string_or_date(s)
            }
            serde_yaml::Value::Sequence(seq) => FieldValue::Sequence(
                seq.into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        serde_yaml::Value::String(s)
                            if plain.items.contains(&(key.as_str(), i)) =>
                        {
                            string_or_date(s)
                        }
                        other => from_yaml(other),
                    })
                    .collect(),
            ),
            other => from_yaml(other),
        };
        fields.insert(key, value);
    }
    Ok(fields)
}

fn string_or_date(s: String) -> FieldValue {
    match parse_timestamp(&s) {
        Some(date) => FieldValue::Date(date),
        None => FieldValue::String(s),
    }
}

/// Top-level values and top-level sequence items written as unquoted scalars
#[derive(Debug, Default)]
struct PlainScalars<'a> {
    values: HashSet<&'a str>,
    items: HashSet<(&'a str, usize)>,
}

impl<'a> PlainScalars<'a> {
    fn scan(block: &'a str) -> Self {
        let mut plain = PlainScalars::default();
        // Key owning the block sequence being read: (key, item indent, next index)
        let mut open: Option<(&str, Option<usize>, usize)> = None;

        for line in block.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some((key, indent, next)) = open.as_mut() {
                if let Some(caps) = BLOCK_ITEM.captures(line) {
                    let depth = caps.get(1).map_or(0, |m| m.len());
                    if *indent.get_or_insert(depth) == depth {
                        if caps.get(2).is_some_and(|m| !is_quoted(m.as_str())) {
                            plain.items.insert((*key, *next));
                        }
                        *next += 1;
                    }
                    continue;
                }
                if line.starts_with([' ', '\t']) {
                    continue;
                }
                open = None;
            }

            if let Some(caps) = TOP_LEVEL_KEY.captures(line) {
                if let Some(key) = caps.get(1) {
                    open = Some((key.as_str(), None, 0));
                }
            } else if let Some(caps) = TOP_LEVEL_ENTRY.captures(line) {
                let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let key = key.as_str();
                let value = value.as_str();
                if !is_quoted(value) {
                    plain.values.insert(key);
                } else if let Some(items) = flow_items(value) {
                    for (i, item) in items.iter().enumerate() {
                        if !is_quoted(item) {
                            plain.items.insert((key, i));
                        }
                    }
                }
            }
        }
        plain
    }
}

fn is_quoted(value: &str) -> bool {
    value.starts_with(['\'', '"', '!', '&', '*', '|', '>', '[', '{'])
}

/// Items of a single-line flow sequence such as `[a, "b", c]`.
/// `None` for anything nested or not closed on the same line.
fn flow_items(value: &str) -> Option<Vec<&str>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;

    let mut items = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[' | ']' | '{' | '}') => return None,
            (None, ',') => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return None;
    }

    let last = inner[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    Some(items)
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn from_yaml(value: serde_yaml::Value) -> FieldValue {
    match value {
        serde_yaml::Value::Null => FieldValue::Null,
        serde_yaml::Value::Bool(b) => FieldValue::Bool(b),
        serde_yaml::Value::Number(n) => FieldValue::Number(n.to_string()),
        serde_yaml::Value::String(s) => FieldValue::String(s),
        serde_yaml::Value::Sequence(seq) => {
            FieldValue::Sequence(seq.into_iter().map(from_yaml).collect())
        }
        serde_yaml::Value::Mapping(m) => FieldValue::Mapping(
            m.into_iter()
                .filter_map(|(k, v)| Some((yaml_key(&k)?, from_yaml(v))))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn parse_toml(block: &str) -> Result<FieldMap, ParseError> {
    let table: toml::Table = toml::from_str(block)?;
    Ok(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
}

fn from_toml(value: toml::Value) -> FieldValue {
    match value {
        toml::Value::String(s) => FieldValue::String(s),
        toml::Value::Integer(i) => FieldValue::Number(i.to_string()),
        toml::Value::Float(f) => FieldValue::Number(f.to_string()),
        toml::Value::Boolean(b) => FieldValue::Bool(b),
        toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            match parse_timestamp(&text) {
                Some(date) => FieldValue::Date(date),
                // A bare local time carries no date
                None => FieldValue::String(text),
            }
        }
        toml::Value::Array(items) => {
            FieldValue::Sequence(items.into_iter().map(from_toml).collect())
        }
        toml::Value::Table(t) => {
            FieldValue::Mapping(t.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
        }
    }
}

fn parse_json(block: &str) -> Result<FieldMap, ParseError> {
    let value: serde_json::Value = serde_json::from_str(block)?;
    match from_json(value) {
        FieldValue::Mapping(fields) => Ok(fields),
        other => Err(ParseError::NotAMapping(other.kind())),
    }
}

fn from_json(value: serde_json::Value) -> FieldValue {
    match value {
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Bool(b) => FieldValue::Bool(b),
        serde_json::Value::Number(n) => FieldValue::Number(n.to_string()),
        serde_json::Value::String(s) => FieldValue::String(s),
        serde_json::Value::Array(items) => {
            FieldValue::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => {
            FieldValue::Mapping(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Parse a YAML/TOML timestamp. A missing offset means UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if !YAML_TIMESTAMP.is_match(s) {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Trailing `Z` is UTC, same as no offset at all
    let local = s.trim_end_matches(['Z', 'z']).trim_end();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dt%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(local, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f %:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    None
}
