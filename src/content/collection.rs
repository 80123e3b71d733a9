//! Collections of validated posts

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::{MarkdownRenderer, PostRecord};
use crate::error::{ContentError, Result};

/// One loaded content file
#[derive(Debug, Clone, Serialize)]
pub struct PostEntry {
    /// Path relative to the collection base, `/`-separated, without extension
    pub id: String,

    /// Full source file path
    #[serde(skip)]
    pub path: PathBuf,

    /// Validated front-matter
    pub data: PostRecord,

    /// Raw markdown after the front-matter block
    #[serde(skip)]
    pub body: String,
}

impl PostEntry {
    /// Render the markdown body to HTML
    pub fn render(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.body)
    }
}

/// A named, immutable set of posts keyed by file id
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    entries: IndexMap<String, PostEntry>,
}

impl Collection {
    /// Build a collection; entries are ordered by id
    pub fn new(name: impl Into<String>, entries: impl IntoIterator<Item = PostEntry>) -> Self {
        let mut entries: IndexMap<String, PostEntry> =
            entries.into_iter().map(|e| (e.id.clone(), e)).collect();
        entries.sort_keys();
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by file id
    pub fn get(&self, id: &str) -> Option<&PostEntry> {
        self.entries.get(id)
    }

    /// First entry (by id) with the given slug
    pub fn by_slug(&self, slug: &str) -> Option<&PostEntry> {
        self.iter().find(|e| e.data.slug == slug)
    }

    /// Every entry with the given slug. Slugs are not required to be unique.
    pub fn all_by_slug<'a>(&'a self, slug: &'a str) -> impl Iterator<Item = &'a PostEntry> + 'a {
        self.iter().filter(move |e| e.data.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostEntry> {
        self.entries.values()
    }

    /// Entries carrying the given tag
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a PostEntry> + 'a {
        self.iter().filter(move |e| e.data.has_tag(tag))
    }

    /// Tag name -> number of posts, in first-seen order
    pub fn tags(&self) -> IndexMap<&str, usize> {
        let mut tags = IndexMap::new();
        for entry in self.iter() {
            for tag in entry.data.tags.iter().flatten() {
                *tags.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        tags
    }

    /// Entries sorted by normalized publish date, newest first.
    /// Entries whose date cannot be normalized go last, in id order.
    pub fn sorted_by_date(&self) -> Vec<&PostEntry> {
        let mut entries: Vec<(Option<DateTime<Utc>>, &PostEntry)> = self
            .iter()
            .map(|e| (e.data.publish_date.normalize(), e))
            .collect();
        entries.sort_by(|(a, ea), (b, eb)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a).then_with(|| ea.id.cmp(&eb.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => ea.id.cmp(&eb.id),
        });
        entries.into_iter().map(|(_, e)| e).collect()
    }

    /// Slugs used by more than one entry, with the ids using them
    pub fn duplicate_slugs(&self) -> Vec<(&str, Vec<&str>)> {
        let mut by_slug: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for entry in self.iter() {
            by_slug
                .entry(entry.data.slug.as_str())
                .or_default()
                .push(entry.id.as_str());
        }
        by_slug.into_iter().filter(|(_, ids)| ids.len() > 1).collect()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a PostEntry;
    type IntoIter = indexmap::map::Values<'a, String, PostEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// All collections of a site, by name
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    collections: IndexMap<String, Collection>,
}

impl ContentStore {
    pub fn new(collections: impl IntoIterator<Item = Collection>) -> Self {
        Self {
            collections: collections
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| ContentError::UnknownCollection(name.to_string()))
    }

    /// The `posts` collection
    pub fn posts(&self) -> Result<&Collection> {
        self.get("posts")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }
}
