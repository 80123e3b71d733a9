//! List collection content

use anyhow::Result;

use crate::Site;

/// List entries of a collection, newest first
pub fn run(site: &Site, collection: Option<&str>, tag: Option<&str>, json: bool) -> Result<()> {
    let store = site.load()?;
    let posts = super::select(site, &store, collection)?;

    let entries: Vec<_> = posts
        .sorted_by_date()
        .into_iter()
        .filter(|e| tag.map_or(true, |t| e.data.has_tag(t)))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} ({}):", posts.name(), entries.len());
    for entry in entries {
        println!(
            "  {} - {} [{}]",
            entry.data.publish_date, entry.data.title, entry.id
        );
    }

    Ok(())
}

/// List tags of a collection with their post counts
pub fn tags(site: &Site, collection: Option<&str>) -> Result<()> {
    let store = site.load()?;
    let posts = super::select(site, &store, collection)?;

    let mut tags: Vec<_> = posts.tags().into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("Tags ({}):", tags.len());
    for (tag, count) in tags {
        println!("  {} ({})", tag, count);
    }

    Ok(())
}
