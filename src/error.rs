//! Error types for content loading and validation

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the content layer
pub type Result<T> = std::result::Result<T, ContentError>;

/// What went wrong with a single front-matter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A required field is absent
    Missing,
    /// The field exists but has the wrong shape
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// A sequence element has the wrong shape
    WrongElementType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// A single failed constraint, tied to the field it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: Problem,
}

impl FieldIssue {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            problem: Problem::Missing,
        }
    }

    pub fn wrong_type(field: &'static str, expected: &'static str, found: &'static str) -> Self {
        Self {
            field,
            problem: Problem::WrongType { expected, found },
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "`{}` is required", self.field),
            Problem::WrongType { expected, found } => {
                write!(f, "`{}` expected {}, found {}", self.field, expected, found)
            }
            Problem::WrongElementType {
                index,
                expected,
                found,
            } => write!(
                f,
                "`{}[{}]` expected {}, found {}",
                self.field, index, expected, found
            ),
        }
    }
}

/// A file's front-matter does not satisfy the post schema.
///
/// Every issue found in the file is reported, not only the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    pub path: PathBuf,
    pub issues: Vec<FieldIssue>,
}

impl SchemaValidationError {
    /// Whether the given field is among the reported issues
    pub fn concerns(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid front-matter in {}: ", self.path.display())?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaValidationError {}

/// Content loading errors
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in {path}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("base directory of collection `{collection}` does not exist: {path}")]
    MissingBase { collection: String, path: PathBuf },

    #[error("failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("entry id `{id}` in collection `{collection}` is used by both {first} and {second}")]
    DuplicateId {
        collection: String,
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{} invalid file(s) in collection `{collection}`:\n{}", .errors.len(), list_errors(.errors))]
    Invalid {
        collection: String,
        errors: Vec<ContentError>,
    },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is about file content rather than the environment
    pub fn is_invalid_file(&self) -> bool {
        matches!(self, Self::FrontMatter { .. } | Self::Schema(_))
    }
}

fn list_errors(errors: &[ContentError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message_names_file_and_fields() {
        let err = SchemaValidationError {
            path: PathBuf::from("posts/hello.md"),
            issues: vec![
                FieldIssue::missing("title"),
                FieldIssue::wrong_type("tags", "a sequence of strings", "a string"),
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("posts/hello.md"));
        assert!(msg.contains("`title` is required"));
        assert!(msg.contains("`tags` expected a sequence of strings, found a string"));
        assert!(err.concerns("tags"));
        assert!(!err.concerns("slug"));
    }

    #[test]
    fn test_aggregate_error_lists_every_file() {
        let errors = vec![
            ContentError::Schema(SchemaValidationError {
                path: PathBuf::from("a.md"),
                issues: vec![FieldIssue::missing("slug")],
            }),
            ContentError::FrontMatter {
                path: PathBuf::from("b.mdx"),
                message: "unexpected end of stream".to_string(),
            },
        ];
        let err = ContentError::Invalid {
            collection: "posts".to_string(),
            errors,
        };

        let msg = err.to_string();
        assert!(msg.starts_with("2 invalid file(s) in collection `posts`"));
        assert!(msg.contains("a.md"));
        assert!(msg.contains("b.mdx"));
    }

    #[test]
    fn test_duplicate_id_names_both_files() {
        let err = ContentError::DuplicateId {
            collection: "posts".to_string(),
            id: "hello".to_string(),
            first: PathBuf::from("posts/hello.md"),
            second: PathBuf::from("posts/hello.mdx"),
        };

        let msg = err.to_string();
        assert!(msg.contains("`hello`"));
        assert!(msg.contains("posts/hello.md and posts/hello.mdx"));
        assert!(!err.is_invalid_file());
    }
}
