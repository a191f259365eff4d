use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{error, info, warn};

/// Calls `on_change` whenever one of the watched files changes.
///
/// Parent directories are watched rather than the files themselves so that
/// editors which replace a file on save are still noticed. Dropping the
/// watcher stops the notifications.
pub struct SchemaWatcher {
    _watcher: RecommendedWatcher,
}

impl SchemaWatcher {
    pub fn new<F>(paths: Vec<PathBuf>, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

        let mut watched_dirs: Vec<PathBuf> = Vec::new();
        for path in &paths {
            if !path.exists() {
                warn!("Watched file does not exist, skipping: {}", path.display());
                continue;
            }
            let dir = parent_dir(path);
            if !watched_dirs.contains(&dir) {
                watcher.watch(&dir, RecursiveMode::NonRecursive)?;
                watched_dirs.push(dir);
            }
            info!("Watching {}", path.display());
        }

        let files: Vec<PathBuf> = paths.iter().filter_map(|p| p.canonicalize().ok()).collect();

        std::thread::spawn(move || loop {
            match rx.recv() {
                Ok(Ok(event)) => {
                    if !touches_any(&event, &files) {
                        continue;
                    }
                    // Debounce the burst of events a single save produces
                    std::thread::sleep(Duration::from_millis(100));
                    while rx.try_recv().is_ok() {}
                    info!("Schema change detected, regenerating...");
                    on_change();
                }
                Ok(Err(e)) => error!("Watch error: {:?}", e),
                Err(e) => {
                    error!("Watch channel error: {:?}", e);
                    break;
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches_any(event: &Event, files: &[PathBuf]) -> bool {
    event.paths.iter().any(|p| {
        let p = p.canonicalize().unwrap_or_else(|_| p.clone());
        files.contains(&p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("form-schema.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("forms/a.json")), PathBuf::from("forms"));
    }

    #[test]
    fn test_touches_any() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.json");
        std::fs::write(&file, "{}").unwrap();
        let files = vec![file.canonicalize().unwrap()];

        let hit = Event::new(EventKind::Any).add_path(file.clone());
        let miss = Event::new(EventKind::Any).add_path(dir.path().join("b.json"));
        assert!(touches_any(&hit, &files));
        assert!(!touches_any(&miss, &files));
    }
}
