//! Content loader - discovers collection files and validates them

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{Collection, ContentStore, FilePattern, FrontMatter, PostEntry, PostRecord};
use crate::config::{CollectionConfig, InvalidPolicy};
use crate::error::{ContentError, Result};
use crate::Site;

/// Loads collections from the site directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every configured collection
    pub fn load_all(&self) -> Result<ContentStore> {
        let collections = self
            .site
            .config
            .collections
            .iter()
            .map(|c| self.load_collection(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(ContentStore::new(collections))
    }

    /// Load one collection.
    ///
    /// Files are read and validated in parallel. A file is either fully valid
    /// or left out; what happens to the rest of the load when one is invalid
    /// depends on `on_invalid`.
    pub fn load_collection(&self, collection: &CollectionConfig) -> Result<Collection> {
        let base = self.site.collection_dir(collection);
        if !base.is_dir() {
            return Err(ContentError::MissingBase {
                collection: collection.name.clone(),
                path: base,
            });
        }

        let pattern = FilePattern::new(&collection.pattern)?;
        let files = find_files(&base, &pattern)?;
        info!(
            "Scanning {} file(s) for collection `{}` in {:?}",
            files.len(),
            collection.name,
            base
        );

        let results: Vec<Result<PostEntry>> =
            files.par_iter().map(|path| load_entry(&base, path)).collect();

        let mut entries = Vec::with_capacity(results.len());
        let mut invalid = Vec::new();
        for result in results {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) if e.is_invalid_file() => invalid.push(e),
                Err(e) => return Err(e),
            }
        }

        if !invalid.is_empty() {
            match self.site.config.on_invalid {
                InvalidPolicy::Abort => {
                    return Err(ContentError::Invalid {
                        collection: collection.name.clone(),
                        errors: invalid,
                    });
                }
                InvalidPolicy::Skip => {
                    for e in &invalid {
                        warn!("Skipping invalid file: {}", e);
                    }
                }
            }
        }

        check_unique_ids(&collection.name, &entries)?;

        let loaded = Collection::new(&collection.name, entries);
        for (slug, ids) in loaded.duplicate_slugs() {
            warn!(
                "Slug `{}` is used by {} entries in `{}`: {}",
                slug,
                ids.len(),
                collection.name,
                ids.join(", ")
            );
        }

        info!(
            "Loaded {} entries into `{}` ({} skipped)",
            loaded.len(),
            collection.name,
            invalid.len()
        );

        Ok(loaded)
    }
}

/// Files under `base` whose relative path matches `pattern`, sorted by path.
/// Anything the walk cannot read fails the scan.
fn find_files(base: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(base).follow_links(true).sort_by_file_name();
    // Without a separator the pattern can only match top-level files
    if !pattern.as_str().contains('/') {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ContentError::Walk {
            path: e.path().unwrap_or(base).to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = entry
            .path()
            .strip_prefix(base)
            .map(|relative| pattern.matches(relative))
            .unwrap_or(false);
        if matched {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Two files that differ only by extension map to the same id
fn check_unique_ids(collection: &str, entries: &[PostEntry]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(first) = seen.insert(&entry.id, &entry.path) {
            return Err(ContentError::DuplicateId {
                collection: collection.to_string(),
                id: entry.id.clone(),
                first: first.to_path_buf(),
                second: entry.path.clone(),
            });
        }
    }
    Ok(())
}

/// Read, parse and validate a single file
fn load_entry(base: &Path, path: &Path) -> Result<PostEntry> {
    debug!("Loading {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let data = PostRecord::validate(path, &fm.fields)?;

    Ok(PostEntry {
        id: entry_id(base, path),
        path: path.to_path_buf(),
        data,
        body: body.to_string(),
    })
}

/// Relative path without extension, always `/`-separated
fn entry_id(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
