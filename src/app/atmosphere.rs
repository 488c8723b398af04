//! Sync of the sky renderer with `Settings.atmosphere`.
use arcstep::settings::Settings;
use bevy::prelude::*;
use bevy_atmosphere::prelude::AtmosphereSettings as BevyAtmosphereSettings;

/// Push resolution and dithering changes into the running atmosphere renderer.
/// `enabled` is only read at startup.
///
/// # Arguments
/// - `settings`: source of resolution and dithering.
/// - `last`: the last applied pair, so the renderer is only touched on change.
/// - `atm_settings`: the `bevy_atmosphere` renderer settings.
pub fn sync_atmosphere_settings(
    settings: Res<Settings>,
    mut last: Local<Option<(u32, bool)>>,
    mut atm_settings: ResMut<BevyAtmosphereSettings>,
) {
    let current = (settings.atmosphere.resolution, settings.atmosphere.dithering);
    if *last == Some(current) {
        return;
    }
    atm_settings.resolution = current.0;
    atm_settings.dithering = current.1;
    *last = Some(current);
}
