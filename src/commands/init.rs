//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let defaults = SiteConfig::default();
    let posts = &defaults.collections[0];

    // Create directory structure
    let posts_dir = target_dir.join(&posts.base);
    fs::create_dir_all(&posts_dir)?;

    // Create default _config.yml
    let config_content = format!(
        r#"# Content collections
# Every file matching `pattern` under `base` must carry valid post front-matter.
collections:
  - name: {name}
    base: {base}
    pattern: "{pattern}"

# What to do with a file whose front-matter is invalid:
#   abort - fail the whole load, listing every bad file
#   skip  - log a warning and leave the file out
on_invalid: abort

# Markdown rendering
render:
  tables: true
  footnotes: true
  strikethrough: true
  tasklists: true
  smart_punctuation: false
"#,
        name = posts.name,
        base = posts.base,
        pattern = posts.pattern,
    );

    fs::write(&config_path, config_content)?;

    // Create a sample post
    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
slug: hello-world
publishDate: {}
description: Your very first post.
tags:
  - welcome
---

Welcome! Every post in this directory needs `title`, `slug`, `publishDate`
and `description` in its front-matter. `tags`, `image`, `imageAlt` and
`imageTitle` are optional.

Run `postdeck check` to validate the collection.
"#,
        today
    );

    fs::write(posts_dir.join("hello-world.md"), sample_post)?;

    Ok(())
}
