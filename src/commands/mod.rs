//! CLI commands

pub mod check;
pub mod init;
pub mod list;
pub mod new;
pub mod show;

use anyhow::Result;

use crate::content::{Collection, ContentStore};
use crate::Site;

/// Pick a collection by name, defaulting to the first configured one
pub(crate) fn select<'s>(
    site: &Site,
    store: &'s ContentStore,
    name: Option<&str>,
) -> Result<&'s Collection> {
    let name = match name {
        Some(name) => name,
        None => site
            .config
            .collections
            .first()
            .map(|c| c.name.as_str())
            .ok_or_else(|| anyhow::anyhow!("No collections configured"))?,
    };
    Ok(store.get(name)?)
}
