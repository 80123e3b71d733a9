//! Validate every collection, once or on every change

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::content::ContentStore;
use crate::Site;

/// Load and validate all collections, printing a summary
pub fn run(site: &Site) -> Result<ContentStore> {
    let start = std::time::Instant::now();

    let store = site.load()?;

    for collection in store.iter() {
        println!(
            "{}: {} entries, {} tags",
            collection.name(),
            collection.len(),
            collection.tags().len()
        );
    }

    let duration = start.elapsed();
    tracing::info!("Checked in {:.2}s", duration.as_secs_f64());

    Ok(store)
}

/// Watch collection directories and the config file, re-checking on change
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid re-checks
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            let _ = tx.send(res);
        },
    )?;

    for collection in &site.config.collections {
        let dir = site.collection_dir(collection);
        if dir.exists() {
            debouncer.watcher().watch(&dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopped watching");
                break;
            }
            event = rx.recv() => match event {
                Some(Ok(events)) => {
                    let relevant: Vec<_> = events
                        .iter()
                        .filter(|e| {
                            let path_str = e.path.to_string_lossy();
                            !path_str.contains(".git")
                                && !path_str.contains(".DS_Store")
                                && !path_str.ends_with('~')
                        })
                        .collect();

                    if relevant.is_empty() {
                        continue;
                    }

                    for event in &relevant {
                        tracing::info!("File changed: {}", event.path.display());
                    }

                    // Config may have changed too, so start from a fresh site
                    let base_dir = site.base_dir.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        let site = Site::new(&base_dir)?;
                        run(&site)
                    })
                    .await?;

                    if let Err(e) = result {
                        tracing::error!("Check failed: {}", e);
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("Watch error: {:?}", e);
                }
                None => break,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{init, new};
    use tempfile::TempDir;

    #[test]
    fn test_check_initialized_site() {
        let dir = TempDir::new().unwrap();
        init::init_site(dir.path()).unwrap();
        let site = Site::new(dir.path()).unwrap();
        new::create_post(&site, "Second Post", None, None).unwrap();

        let store = run(&site).unwrap();
        assert_eq!(store.posts().unwrap().len(), 2);
    }

    #[test]
    fn test_check_fails_on_invalid_post() {
        let dir = TempDir::new().unwrap();
        init::init_site(dir.path()).unwrap();
        let site = Site::new(dir.path()).unwrap();
        let base = site.collection_dir(&site.config.collections[0]);
        std::fs::write(base.join("broken.md"), "---\ntitle: Broken\n---\n").unwrap();

        let err = run(&site).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("broken.md"));
        assert!(msg.contains("`slug` is required"));
    }
}
