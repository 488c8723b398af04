//! Utilities for loading RON files and watching a directory for changes.
//!
//! The watcher only flips a shared flag; the owning system decides when to
//! reload, so file events never touch ECS state from the notify thread.

use bevy::log::{error, warn};
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::ControllerError;

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Set to `true` by the notify thread when a watched file changes.
    _watcher: Option<RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// A watcher with no OS backing; `changed` never flips.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Return whether a change was observed since the last call, clearing the flag.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::replace(&mut *flag, false)
    }
}

/// Parse a single RON file into `T`.
///
/// # Errors
/// Returns `ControllerError::Io` if the file cannot be read and
/// `ControllerError::Ron` if its contents do not deserialize into `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, ControllerError> {
    let content = std::fs::read_to_string(path)?;
    ron::from_str::<T>(&content).map_err(|e| ControllerError::Ron {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load every `.ron` file in `dir`, sorted by file name.
///
/// Files that fail to parse are skipped with a warning. A missing directory
/// yields an empty list.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(dir: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    paths
        .iter()
        .filter_map(|p| match load_ron_file::<T>(p) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("skipping {}: {e}", p.display());
                None
            }
        })
        .collect()
}

/// Create a `RonWatcher` for modifications under `path`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or cannot
/// register `path`.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = Arc::clone(&changed);
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched_path)
                });
                if relevant {
                    match changed_clone.lock() {
                        Ok(mut flag) => *flag = true,
                        Err(poisoned) => *poisoned.into_inner() = true,
                    }
                }
            }
            Err(e) => error!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_watcher_reports_and_clears_changes() {
        let watcher = RonWatcher::stub();
        assert!(!watcher.take_changed());
        *watcher.changed.lock().unwrap() = true;
        assert!(watcher.take_changed());
        assert!(!watcher.take_changed());
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let items: Vec<u32> = load_ron_files("this/dir/does/not/exist");
        assert!(items.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let res: Result<u32, _> = load_ron_file(Path::new("no/such/file.ron"));
        assert!(matches!(res, Err(ControllerError::Io(_))));
    }
}
