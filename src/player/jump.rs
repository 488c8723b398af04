//! Aimed jump: launch velocity from the camera orientation.

use bevy::prelude::*;

use crate::camera::FreeLookRig;
use crate::input::FrameInput;
use crate::player::{Player, PlayerState, ReleasePoint};
use crate::settings::Settings;
use crate::trajectory::TrajectoryLine;

/// Launch velocity for a jump aimed along the camera.
///
/// `forward + up` is used as-is, so the launch speed depends on the camera pitch:
/// looking level gives a diagonal of length `sqrt(2)`, looking straight up doubles
/// the vertical component.
#[must_use]
pub fn launch_velocity(forward: Vec3, up: Vec3, jump_speed: f32, mass: f32) -> Vec3 {
    jump_speed * (forward + up) / mass
}

/// World position of a release point this frame.
///
/// Composes the player's current `Transform` with the release point's local one, since
/// `GlobalTransform` still holds last frame's pose until propagation in `PostUpdate`.
#[must_use]
pub fn release_origin(player: &Transform, release_local: &Transform) -> Vec3 {
    player.transform_point(release_local.translation)
}

/// Preview the arc while aim is held; launch and hide the preview on release.
///
/// # Arguments
/// * `input` - this frame's input snapshot; only `aim` is read
/// * `settings` - jump speed, mass, preview length and gravity
/// * `cameras` - the rig camera, whose forward and up vectors aim the jump
/// * `release_points` - `ReleasePoint` children and their parent player
/// * `players` - player state and the `TrajectoryLine` the preview is written to
#[allow(clippy::needless_pass_by_value)]
pub fn aim_and_jump(
    input: Res<FrameInput>,
    settings: Res<Settings>,
    cameras: Query<&Transform, (With<FreeLookRig>, Without<Player>)>,
    release_points: Query<(&Transform, &Parent), (With<ReleasePoint>, Without<Player>)>,
    mut players: Query<(Entity, &Transform, &mut PlayerState, &mut TrajectoryLine), With<Player>>,
) {
    if !(input.aim.held || input.aim.released) {
        return;
    }
    let Ok(camera) = cameras.get_single() else { return };
    let jump = &settings.jump;
    let velocity = launch_velocity(*camera.forward(), *camera.up(), jump.jump_speed, jump.mass);

    for (entity, body, mut state, mut line) in &mut players {
        if input.aim.held {
            let release = release_points.iter().find(|(_, parent)| parent.get() == entity);
            if let Some((local, _)) = release {
                line.write_arc(
                    release_origin(body, local),
                    velocity,
                    settings.physics.gravity().y,
                    jump.preview_duration(),
                    jump.time_between_points,
                );
            }
        }
        if input.aim.released {
            state.jump_velocity = velocity;
            line.hide();
            info!("jump launched with velocity {velocity:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_camera_launches_diagonally() {
        let v = launch_velocity(Vec3::NEG_Z, Vec3::Y, 25.0, 2.0);
        assert_eq!(v, Vec3::new(0.0, 12.5, -12.5));
    }

    #[test]
    fn release_origin_follows_body_pose() {
        let body = Transform::from_xyz(3.0, 1.0, -2.0).with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let local = Transform::from_xyz(0.0, 0.5, -0.6);
        let origin = release_origin(&body, &local);
        assert!((origin - Vec3::new(2.4, 1.5, -2.0)).length() < 1e-5);
    }

    #[test]
    fn direction_is_not_renormalized() {
        let v = launch_velocity(Vec3::NEG_Z, Vec3::Y, 1.0, 1.0);
        assert!((v.length() - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn magnitude_is_linear_in_speed_and_inverse_in_mass() {
        let fwd = Vec3::new(0.3, -0.2, -0.93).normalize();
        let up = Vec3::new(0.06, 0.98, 0.2).normalize();
        let base = launch_velocity(fwd, up, 10.0, 2.0).length();
        assert!((launch_velocity(fwd, up, 20.0, 2.0).length() - 2.0 * base).abs() < 1e-4);
        assert!((launch_velocity(fwd, up, 10.0, 4.0).length() - 0.5 * base).abs() < 1e-4);
        assert!((launch_velocity(fwd, up, 30.0, 1.0).length() - 6.0 * base).abs() < 1e-4);
    }
}
