//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Front-matter written into a freshly created post
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Scaffold<'a> {
    title: &'a str,
    slug: &'a str,
    publish_date: String,
    description: &'a str,
}

/// Create a post with every required field filled in.
/// Returns the path of the new file.
pub fn create_post(
    site: &Site,
    title: &str,
    slug: Option<&str>,
    description: Option<&str>,
) -> Result<PathBuf> {
    let collection = site
        .config
        .collections
        .first()
        .ok_or_else(|| anyhow::anyhow!("No collections configured"))?;

    let target_dir = site.collection_dir(collection);
    fs::create_dir_all(&target_dir)?;

    let slug = slug.map(str::to_string).unwrap_or_else(|| slug::slugify(title));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }
    if slug.contains(['/', '\\']) || slug.split('.').any(str::is_empty) {
        anyhow::bail!("Invalid slug {:?}: must be a plain file name", slug);
    }

    let file_path = target_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        slug: &slug,
        publish_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        description: description.unwrap_or(""),
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&scaffold)?);

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}
