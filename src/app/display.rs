//! Display-related systems, such as syncing vsync
//! settings from the main `Settings` resource to the primary window's present mode.
use arcstep::settings::Settings;
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};

/// Sync `Settings.graphics.vsync` into the present mode of the primary window.
/// The last applied value is cached so the window is only touched on change.
///
/// # Arguments
/// - `settings`: source of the vsync preference.
/// - `windows`: the primary window whose present mode is updated.
/// - `last`: the last applied vsync state.
///
/// # Example
/// ```
/// app.add_systems(Update, crate::app::sync_vsync_settings);
/// ```
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.graphics.vsync;
    if *last == Some(desired) {
        return;
    }

    for mut w in &mut windows {
        w.present_mode = if desired { PresentMode::Fifo } else { PresentMode::AutoNoVsync };
    }
    *last = Some(desired);
}
