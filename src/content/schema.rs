//! The post schema: which front-matter fields a post must have, and their types

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::frontmatter::{FieldMap, FieldValue};
use crate::error::{FieldIssue, Problem, SchemaValidationError};

const STRING: &str = "a string";
const STRING_OR_DATE: &str = "a string or a date";
const STRING_SEQUENCE: &str = "a sequence of strings";

/// `publishDate` as written: either a free-form string or a real date.
///
/// No normalization happens at load time; call [`PublishDate::normalize`]
/// when a comparable instant is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PublishDate {
    StringDate(String),
    DateValue(DateTime<Utc>),
}

impl PublishDate {
    /// Resolve to an instant, parsing string dates in the common formats.
    /// Returns `None` for strings that are not recognisable dates.
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishDate::DateValue(date) => Some(*date),
            PublishDate::StringDate(s) => parse_date_string(s),
        }
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishDate::StringDate(s) => f.write_str(s),
            PublishDate::DateValue(date) if date.num_seconds_from_midnight() == 0 => {
                write!(f, "{}", date.format("%Y-%m-%d"))
            }
            PublishDate::DateValue(date) => f.write_str(&date.to_rfc3339()),
        }
    }
}

/// A validated post, built from one content file's front-matter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub title: String,
    /// Not guaranteed unique across a collection
    pub slug: String,
    pub publish_date: PublishDate,
    pub description: String,
    /// `None` when the field is absent; `Some(vec![])` only if written as `[]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Relative asset reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_title: Option<String>,
}

impl PostRecord {
    /// Check front-matter fields against the schema.
    ///
    /// Every field is checked and all issues are returned together; no record
    /// is produced unless all of them pass. Unknown fields are ignored.
    pub fn validate(path: &Path, fields: &FieldMap) -> Result<Self, SchemaValidationError> {
        let mut issues = Vec::new();

        let title = required_string(fields, "title", &mut issues);
        let slug = required_string(fields, "slug", &mut issues);
        let publish_date = publish_date(fields, &mut issues);
        let description = required_string(fields, "description", &mut issues);
        let tags = optional_strings(fields, "tags", &mut issues);
        let image = optional_string(fields, "image", &mut issues);
        let image_alt = optional_string(fields, "imageAlt", &mut issues);
        let image_title = optional_string(fields, "imageTitle", &mut issues);

        match (title, slug, publish_date, description) {
            (Some(title), Some(slug), Some(publish_date), Some(description))
                if issues.is_empty() =>
            {
                Ok(PostRecord {
                    title,
                    slug,
                    publish_date,
                    description,
                    tags,
                    image,
                    image_alt,
                    image_title,
                })
            }
            _ => Err(SchemaValidationError {
                path: path.to_path_buf(),
                issues,
            }),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

fn required_string(
    fields: &FieldMap,
    name: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match fields.get(name) {
        None => {
            issues.push(FieldIssue::missing(name));
            None
        }
        Some(value) => expect_string(name, value, issues),
    }
}

fn optional_string(
    fields: &FieldMap,
    name: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    fields
        .get(name)
        .and_then(|value| expect_string(name, value, issues))
}

fn expect_string(
    name: &'static str,
    value: &FieldValue,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match value {
        FieldValue::String(s) => Some(s.clone()),
        other => {
            issues.push(FieldIssue::wrong_type(name, STRING, other.kind()));
            None
        }
    }
}

fn publish_date(fields: &FieldMap, issues: &mut Vec<FieldIssue>) -> Option<PublishDate> {
    const NAME: &str = "publishDate";
    match fields.get(NAME) {
        None => {
            issues.push(FieldIssue::missing(NAME));
            None
        }
        Some(FieldValue::String(s)) => Some(PublishDate::StringDate(s.clone())),
        Some(FieldValue::Date(date)) => Some(PublishDate::DateValue(*date)),
        Some(other) => {
            issues.push(FieldIssue::wrong_type(NAME, STRING_OR_DATE, other.kind()));
            None
        }
    }
}

fn optional_strings(
    fields: &FieldMap,
    name: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<Vec<String>> {
    let items = match fields.get(name)? {
        FieldValue::Sequence(items) => items,
        other => {
            issues.push(FieldIssue::wrong_type(name, STRING_SEQUENCE, other.kind()));
            return None;
        }
    };

    let mut strings = Vec::with_capacity(items.len());
    let mut ok = true;
    for (index, item) in items.iter().enumerate() {
        match item {
            FieldValue::String(s) => strings.push(s.clone()),
            other => {
                ok = false;
                issues.push(FieldIssue {
                    field: name,
                    problem: Problem::WrongElementType {
                        index,
                        expected: STRING,
                        found: other.kind(),
                    },
                });
            }
        }
    }

    ok.then_some(strings)
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%B %d, %Y", "%b %d, %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use chrono::Datelike;

    fn validate(front_matter: &str) -> Result<PostRecord, SchemaValidationError> {
        let (fm, _) = FrontMatter::parse(front_matter).unwrap();
        PostRecord::validate(Path::new("post.md"), &fm.fields)
    }

    #[test]
    fn test_minimal_post_is_valid() {
        let post = validate(
            r#"---
title: "Hello"
slug: "hello"
publishDate: "2024-01-01"
description: "A post"
---
"#,
        )
        .unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.slug, "hello");
        assert_eq!(
            post.publish_date,
            PublishDate::StringDate("2024-01-01".to_string())
        );
        assert_eq!(post.description, "A post");
        assert_eq!(post.tags, None);
        assert_eq!(post.image, None);
        assert_eq!(post.image_alt, None);
        assert_eq!(post.image_title, None);
    }

    #[test]
    fn test_full_post_copies_fields_verbatim() {
        let post = validate(
            r#"---
title: "  Spaced Title  "
slug: my-post
publishDate: 2024-05-20
description: Everything set
tags: [rust, "static sites"]
image: covers/my-post.png
imageAlt: A cover image
imageTitle: The cover
---
"#,
        )
        .unwrap();

        assert_eq!(post.title, "  Spaced Title  ");
        assert!(matches!(post.publish_date, PublishDate::DateValue(_)));
        assert_eq!(
            post.tags,
            Some(vec!["rust".to_string(), "static sites".to_string()])
        );
        assert_eq!(post.image.as_deref(), Some("covers/my-post.png"));
        assert_eq!(post.image_alt.as_deref(), Some("A cover image"));
        assert_eq!(post.image_title.as_deref(), Some("The cover"));
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("Rust"));
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let err = validate("---\nimage: cover.png\n---\n").unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                FieldIssue::missing("title"),
                FieldIssue::missing("slug"),
                FieldIssue::missing("publishDate"),
                FieldIssue::missing("description"),
            ]
        );
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let complete = [
            ("title", "title: T"),
            ("slug", "slug: s"),
            ("publishDate", "publishDate: \"2024-01-01\""),
            ("description", "description: D"),
        ];
        for (missing, _) in complete {
            let body: Vec<_> = complete
                .iter()
                .filter(|(name, _)| *name != missing)
                .map(|(_, line)| *line)
                .collect();
            let content = format!("---\n{}\n---\n", body.join("\n"));
            let err = validate(&content).unwrap_err();
            assert_eq!(err.issues, vec![FieldIssue::missing(missing)]);
        }
    }

    #[test]
    fn test_single_string_tags_rejected() {
        let err = validate(
            "---\ntitle: T\nslug: s\npublishDate: \"2024-01-01\"\ndescription: D\ntags: rust\n---\n",
        )
        .unwrap_err();
        assert_eq!(
            err.issues,
            vec![FieldIssue::wrong_type("tags", STRING_SEQUENCE, "a string")]
        );
    }

    #[test]
    fn test_non_string_tag_element_rejected() {
        let err = validate(
            "---\ntitle: T\nslug: s\npublishDate: \"2024-01-01\"\ndescription: D\ntags: [rust, 42]\n---\n",
        )
        .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(
            err.issues[0].problem,
            Problem::WrongElementType {
                index: 1,
                expected: STRING,
                found: "a number",
            }
        );
    }

    #[test]
    fn test_wrong_types_are_not_coerced() {
        let err = validate(
            "---\ntitle: 42\nslug: true\npublishDate: 20240101\ndescription: D\nimage: null\n---\n",
        )
        .unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                FieldIssue::wrong_type("title", STRING, "a number"),
                FieldIssue::wrong_type("slug", STRING, "a boolean"),
                FieldIssue::wrong_type("publishDate", STRING_OR_DATE, "a number"),
                FieldIssue::wrong_type("image", STRING, "null"),
            ]
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let post = validate(
            "---\ntitle: T\nslug: s\npublishDate: \"2024-01-01\"\ndescription: D\ndraft: true\n---\n",
        )
        .unwrap();
        assert_eq!(post.slug, "s");
    }

    #[test]
    fn test_empty_tag_list_is_not_absent() {
        let post = validate(
            "---\ntitle: T\nslug: s\npublishDate: \"2024-01-01\"\ndescription: D\ntags: []\n---\n",
        )
        .unwrap();
        assert_eq!(post.tags, Some(Vec::new()));
    }

    #[test]
    fn test_normalize_publish_date() {
        let string = PublishDate::StringDate("2024-01-15 10:30:00".to_string());
        let normalized = string.normalize().unwrap();
        assert_eq!(normalized.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        let written = PublishDate::StringDate("March 3, 2023".to_string());
        assert_eq!(written.normalize().unwrap().month(), 3);

        let garbage = PublishDate::StringDate("someday".to_string());
        assert_eq!(garbage.normalize(), None);

        let date = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(PublishDate::DateValue(date).normalize(), Some(date));
        assert_eq!(PublishDate::DateValue(date).to_string(), "2024-02-29");
    }

    #[test]
    fn test_serialize_record() {
        let post = validate(
            "---\ntitle: T\nslug: s\npublishDate: 2024-01-01\ndescription: D\nimageAlt: alt\n---\n",
        )
        .unwrap();
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["publishDate"], "2024-01-01T00:00:00Z");
        assert_eq!(json["imageAlt"], "alt");
        assert!(json.get("tags").is_none());
    }
}
