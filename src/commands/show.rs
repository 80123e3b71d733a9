//! Show a single post

use anyhow::Result;

use crate::Site;

/// Print one post, looked up by slug, as JSON or rendered HTML
pub fn run(site: &Site, slug: &str, collection: Option<&str>, html: bool) -> Result<()> {
    let store = site.load()?;
    let posts = super::select(site, &store, collection)?;

    let mut matches = posts.all_by_slug(slug);
    let entry = matches
        .next()
        .ok_or_else(|| anyhow::anyhow!("No post with slug {:?} in `{}`", slug, posts.name()))?;

    let others: Vec<_> = matches.map(|e| e.id.as_str()).collect();
    if !others.is_empty() {
        tracing::warn!(
            "Slug {:?} is also used by: {}; showing {}",
            slug,
            others.join(", "),
            entry.id
        );
    }

    if html {
        print!("{}", entry.render(&site.renderer()));
    } else {
        println!("{}", serde_json::to_string_pretty(entry)?);
    }

    Ok(())
}
