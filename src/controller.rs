//! Plugins wiring the controller into a Bevy app.
//!
//! `initialize` runs once after the scene is spawned and refuses to start the
//! controller when a required reference or setting is missing. The per-frame tick is
//! one chained system set, so every stage sees the previous stage's writes.

use bevy::prelude::*;

use crate::camera::{
    camera_look, follow_player, grab_cursor, toggle_cursor_grab, zoom_camera, FreeLookRig, RigDefaults, ZoomState,
};
use crate::error::ControllerError;
use crate::input::{sample_frame_input, FrameInput};
use crate::player::{
    aim_and_jump, airborne_physics, apply_vertical_motion, ground_movement, KinematicMotor, Player, PlayerState,
    ReleasePoint,
};
use crate::settings::Settings;
use crate::trajectory::{draw_trajectory_lines, TrajectoryLine};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Device state is copied into `FrameInput`.
    Input,
    /// Movement, zoom, aim and the vertical move, in that order.
    Tick,
    /// Drawing of the jump arc.
    Render,
}

/// Inserted by `initialize` once the scene checks out; the tick only runs while present.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ControllerReady {
    pub player: Entity,
    pub camera: Entity,
}

/// Core controller: startup checks and the per-frame tick. Reads `FrameInput` and
/// `Settings`, both of which the app must provide.
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameInput>()
            .configure_sets(
                Update,
                (ControllerSet::Input, ControllerSet::Tick, ControllerSet::Render).chain(),
            )
            .add_systems(PostStartup, initialize)
            .add_systems(
                Update,
                (
                    airborne_physics::<KinematicMotor>,
                    ground_movement::<KinematicMotor>,
                    zoom_camera,
                    camera_look,
                    aim_and_jump,
                    apply_vertical_motion::<KinematicMotor>,
                    follow_player,
                )
                    .chain()
                    .in_set(ControllerSet::Tick)
                    .run_if(resource_exists::<ControllerReady>),
            );
    }
}

/// Samples keyboard and mouse into `FrameInput` and manages the cursor lock.
pub struct ControllerInputPlugin;

impl Plugin for ControllerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, grab_cursor).add_systems(
            Update,
            (sample_frame_input, toggle_cursor_grab).chain().in_set(ControllerSet::Input),
        );
    }
}

/// Draws the jump arc with gizmos.
pub struct TrajectoryRenderPlugin;

impl Plugin for TrajectoryRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_trajectory_lines.in_set(ControllerSet::Render));
    }
}

fn single<I: Iterator>(mut iter: I, what: &'static str) -> Result<I::Item, ControllerError> {
    let first = iter.next().ok_or(ControllerError::MissingReference(what))?;
    let rest = iter.count();
    if rest > 0 {
        return Err(ControllerError::Ambiguous { what, found: rest + 1 });
    }
    Ok(first)
}

type PlayerQuery<'w, 's> =
    Query<'w, 's, (Entity, Has<TrajectoryLine>), (With<Player>, With<PlayerState>, With<KinematicMotor>)>;

#[allow(clippy::type_complexity)]
fn check_scene<'a>(
    settings: &Settings,
    players: &PlayerQuery<'_, '_>,
    release_points: &Query<Entity, With<ReleasePoint>>,
    rigs: &'a Query<(Entity, &FreeLookRig)>,
) -> Result<((Entity, bool), (Entity, &'a FreeLookRig)), ControllerError> {
    settings.validate()?;
    let player = single(players.iter(), "player with PlayerState and KinematicMotor")?;
    single(release_points.iter(), "jump release point")?;
    let rig = single(rigs.iter(), "camera with FreeLookRig")?;
    Ok((player, rig))
}

/// Validate settings and scene references, capture the rig defaults and arm the tick.
///
/// On failure the error is logged and the app is asked to exit with an error code.
#[allow(clippy::needless_pass_by_value)]
pub fn initialize(
    mut commands: Commands,
    settings: Res<Settings>,
    players: PlayerQuery<'_, '_>,
    release_points: Query<Entity, With<ReleasePoint>>,
    rigs: Query<(Entity, &FreeLookRig)>,
    mut exit: EventWriter<AppExit>,
) {
    let checked = check_scene(&settings, &players, &release_points, &rigs);

    match checked {
        Ok(((player, has_line), (camera, rig))) => {
            let defaults = RigDefaults::capture(rig);
            let zoom = ZoomState::new(defaults, settings.camera.min_zoom_out, settings.camera.max_zoom_out);
            let mut rig = rig.clone();
            zoom.apply_to(&mut rig);
            commands.entity(camera).insert((zoom, rig));
            if !has_line {
                commands.entity(player).insert(TrajectoryLine::default());
            }
            commands.insert_resource(ControllerReady { player, camera });
            info!("controller ready: player {player:?}, camera {camera:?}, rig defaults {defaults:?}");
        }
        Err(e) => {
            error!("controller failed to initialize: {e}");
            exit.send(AppExit::error());
        }
    }
}
