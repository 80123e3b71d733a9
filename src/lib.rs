//! postdeck: schema-validated Markdown content collections
//!
//! A site declares named collections in `_config.yml`. Each collection is a
//! base directory plus a file pattern; every matching `.md`/`.mdx` file must
//! carry front-matter that satisfies the post schema, and is exposed as an
//! immutable [`content::PostEntry`].
//!
//! ```ignore
//! let site = postdeck::Site::new(".")?;
//! let store = site.load()?;
//! for post in store.posts()?.sorted_by_date() {
//!     println!("{} {}", post.data.publish_date, post.data.title);
//! }
//! ```

pub mod commands;
pub mod config;
pub mod content;
pub mod error;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file, relative to the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site: its configuration and where it lives
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Absolute base directory of a collection
    pub fn collection_dir(&self, collection: &config::CollectionConfig) -> PathBuf {
        self.base_dir.join(&collection.base)
    }

    /// Scan and validate every collection
    pub fn load(&self) -> error::Result<content::ContentStore> {
        content::loader::ContentLoader::new(self).load_all()
    }

    /// Markdown renderer configured for this site
    pub fn renderer(&self) -> content::MarkdownRenderer {
        content::MarkdownRenderer::with_config(&self.config.render)
    }
}
