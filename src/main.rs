use arcstep::settings::loader as settings_loader;
use arcstep::{ControllerInputPlugin, ControllerPlugin, TrajectoryRenderPlugin};
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_atmosphere::prelude::*;

mod app;

const SETTINGS_DIR: &str = "data/settings";

fn main() {
    // Validation happens in `initialize`, after logging is up.
    let settings = settings_loader::load_settings_from_dir(SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub(SETTINGS_DIR));

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "arcstep".to_string(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: PresentMode::AutoNoVsync,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(FrameTimeDiagnosticsPlugin)
    .add_plugins(LogDiagnosticsPlugin::default())
    .add_plugins((ControllerPlugin, ControllerInputPlugin, TrajectoryRenderPlugin));

    if settings.atmosphere.enabled {
        app.add_plugins(AtmospherePlugin)
            .insert_resource(AtmosphereModel::default())
            .insert_resource(AtmosphereSettings {
                resolution: settings.atmosphere.resolution,
                dithering: settings.atmosphere.dithering,
                ..Default::default()
            })
            .add_systems(Update, crate::app::sync_atmosphere_settings);
    }

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, crate::app::setup);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, crate::app::sync_vsync_settings);

    app.run();
}
