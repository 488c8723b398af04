//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in a settings directory (`data/settings` for the
//! binary). If several files are present, the first one in file-name order that parses
//! wins. An empty or missing directory yields the defaults.
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

use crate::error::ControllerError;
use crate::ron::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;

/// Watches the settings directory and remembers where to reload from.
#[derive(Resource)]
pub struct SettingsWatcher {
    pub dir: String,
    pub watcher: RonWatcher,
}

/// Load settings from `dir`, falling back to defaults when nothing parses.
#[must_use]
pub fn load_settings_from_dir(dir: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(dir);
    items.into_iter().next().unwrap_or_default()
}

/// Load and validate settings from `dir`.
///
/// # Errors
/// Returns the validation error of the loaded settings.
pub fn load_validated_settings(dir: &str) -> Result<Settings, ControllerError> {
    let settings = load_settings_from_dir(dir);
    settings.validate()?;
    Ok(settings)
}

/// Create a watcher for the settings directory.
///
/// # Errors
/// Returns a `notify::Error` when the directory cannot be watched.
pub fn setup_settings_watcher(dir: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(dir).map(|watcher| SettingsWatcher { dir: dir.to_string(), watcher })
}

impl SettingsWatcher {
    /// A watcher that never reports changes, for when the OS watcher is unavailable.
    #[must_use]
    pub fn stub(dir: &str) -> Self {
        SettingsWatcher { dir: dir.to_string(), watcher: RonWatcher::stub() }
    }
}

/// Reload the `Settings` resource when the watched files change.
///
/// A reload that fails validation is dropped and the running settings stay in place.
///
/// # Arguments
/// * `watcher` - directory watcher whose changed flag is consumed here
/// * `settings` - replaced only when the new file validates
///
/// # Example
/// ```ignore
/// app.insert_resource(setup_settings_watcher("data/settings")?)
///     .add_systems(Update, check_settings_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }
    match load_validated_settings(&watcher.dir) {
        Ok(reloaded) => {
            info!("settings changed, reloaded from {}", watcher.dir);
            *settings = reloaded;
        }
        Err(e) => warn!("ignoring settings reload from {}: {e}", watcher.dir),
    }
}
