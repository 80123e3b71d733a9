//! File patterns with brace alternation (`*.{md,mdx}`)

use glob::{MatchOptions, Pattern};
use std::path::Path;

use crate::error::{ContentError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled collection pattern, matched against paths relative to the base
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    alternatives: Vec<Pattern>,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let alternatives = expand_braces(pattern)
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| ContentError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a path relative to the collection base
    pub fn matches(&self, relative: &Path) -> bool {
        // Patterns always use `/`, whatever the platform separator
        let normalized = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        self.alternatives
            .iter()
            .any(|p| p.matches_with(&normalized, MATCH_OPTIONS))
    }
}

/// Expand every `{a,b}` group into separate patterns.
/// Groups may be nested or repeated; an unclosed `{` is kept literally.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    // Find the matching close brace and split on top-level commas
    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let choice = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", prefix, choice, suffix))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("*.{md,mdx}"), vec!["*.md", "*.mdx"]);
        assert_eq!(expand_braces("*.md"), vec!["*.md"]);
        assert_eq!(
            expand_braces("{a,b}/*.{md,mdx}"),
            vec!["a/*.md", "a/*.mdx", "b/*.md", "b/*.mdx"]
        );
        assert_eq!(expand_braces("x{a,{b,c}}"), vec!["xa", "xb", "xc"]);
        assert_eq!(expand_braces("broken{md"), vec!["broken{md"]);
    }

    #[test]
    fn test_markdown_pattern() {
        let pattern = FilePattern::new("*.{md,mdx}").unwrap();
        assert!(pattern.matches(Path::new("hello.md")));
        assert!(pattern.matches(Path::new("hello.mdx")));
        assert!(!pattern.matches(Path::new("hello.markdown")));
        assert!(!pattern.matches(Path::new("hello.txt")));
        // A single star does not reach into subdirectories
        assert!(!pattern.matches(Path::new("2024/hello.md")));
        assert!(!pattern.matches(Path::new(".hidden.md")));
    }

    #[test]
    fn test_recursive_pattern() {
        let pattern = FilePattern::new("**/*.md").unwrap();
        assert!(pattern.matches(Path::new("2024/01/hello.md")));
        assert!(pattern.matches(Path::new("hello.md")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FilePattern::new("***.md").unwrap_err();
        assert!(matches!(err, ContentError::Pattern { .. }));
    }
}
