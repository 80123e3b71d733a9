//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Content collections, in declaration order
    pub collections: Vec<CollectionConfig>,

    /// What to do with a file that fails validation
    pub on_invalid: InvalidPolicy,

    /// Markdown rendering options for post bodies
    pub render: RenderConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            collections: vec![CollectionConfig::default()],
            on_invalid: InvalidPolicy::Abort,
            render: RenderConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}

/// A named collection: where its files live and which ones belong to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub name: String,
    /// Base directory, relative to the site root
    pub base: String,
    /// Glob matched against paths relative to `base`
    pub pattern: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "posts".to_string(),
            base: "src/data/blog-posts".to_string(),
            pattern: "*.{md,mdx}".to_string(),
        }
    }
}

/// Policy for files whose front-matter fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Validate everything, then fail the whole load listing each bad file
    #[default]
    Abort,
    /// Log a warning and leave the file out of the collection
    Skip,
}

/// Markdown extensions enabled when rendering post bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.collections.len(), 1);
        let posts = config.collection("posts").unwrap();
        assert_eq!(posts.base, "src/data/blog-posts");
        assert_eq!(posts.pattern, "*.{md,mdx}");
        assert_eq!(config.on_invalid, InvalidPolicy::Abort);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
on_invalid: skip
collections:
  - name: posts
    base: content/blog
  - name: notes
    base: content/notes
    pattern: "**/*.md"
render:
  smart_punctuation: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.on_invalid, InvalidPolicy::Skip);
        assert_eq!(config.collections.len(), 2);
        assert_eq!(config.collections[0].base, "content/blog");
        // Unset fields fall back to the defaults
        assert_eq!(config.collections[0].pattern, "*.{md,mdx}");
        assert_eq!(config.collection("notes").unwrap().pattern, "**/*.md");
        assert!(config.render.smart_punctuation);
        assert!(config.render.tables);
        assert!(config.collection("drafts").is_none());
    }
}
