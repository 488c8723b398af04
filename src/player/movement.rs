//! Grounded movement: camera-relative heading and a damped turn toward it.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::camera::FreeLookRig;
use crate::input::FrameInput;
use crate::player::{CharacterMotor, Player, PlayerState};
use crate::settings::Settings;

/// Input below this magnitude is treated as no input.
pub const INPUT_DEADZONE: f32 = 0.1;

/// Wrap an angle difference into `(-PI, PI]`.
#[must_use]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let mut d = (to - from).rem_euclid(TAU);
    if d > PI {
        d -= TAU;
    }
    d
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` carries the rate of change between calls. The result never overshoots
/// `target`.
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut out = target + (change + temp) * decay;

    if (target - current > 0.0) == (out > target) {
        out = target;
        *velocity = 0.0;
    }
    out
}

/// `smooth_damp` for angles in radians, taking the short way around.
#[must_use]
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// World yaw the player should face for axis input `(horizontal, vertical)` with the
/// camera at `camera_yaw`, or `None` inside the deadzone.
///
/// Yaw is measured counter-clockwise around +Y, zero facing -Z.
#[must_use]
pub fn target_yaw(horizontal: f32, vertical: f32, camera_yaw: f32) -> Option<f32> {
    let dir = Vec2::new(horizontal, vertical).normalize_or_zero();
    if dir.length() < INPUT_DEADZONE {
        return None;
    }
    Some((-dir.x).atan2(dir.y) + camera_yaw)
}

/// Unit ground-plane direction for a yaw.
#[must_use]
pub fn heading(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::NEG_Z
}

/// Yaw of a rotation around +Y.
#[must_use]
pub fn yaw_of(rotation: Quat) -> f32 {
    rotation.to_euler(EulerRot::YXZ).0
}

/// Move and turn the player from axis input while it is on the ground.
///
/// The heading is relative to the camera's yaw; the facing turns toward it with
/// `smooth_damp_angle` while the displacement follows the target heading at once.
///
/// # Arguments
/// * `time` - frame delta used for both the turn smoothing and the displacement
/// * `input` - this frame's axes
/// * `settings` - `ground_speed` and `turn_smooth_time`
/// * `cameras` - the rig camera whose yaw the input is relative to
/// * `players` - player transform, turn velocity and the motor that performs the move
#[allow(clippy::needless_pass_by_value)]
pub fn ground_movement<M: CharacterMotor + Component>(
    time: Res<Time>,
    input: Res<FrameInput>,
    settings: Res<Settings>,
    cameras: Query<&Transform, (With<FreeLookRig>, Without<Player>)>,
    mut players: Query<(&mut Transform, &mut PlayerState, &mut M), With<Player>>,
) {
    let Ok(camera) = cameras.get_single() else { return };
    let dt = time.delta_seconds();

    for (mut tf, mut state, mut motor) in &mut players {
        if !motor.is_grounded() {
            continue;
        }
        let Some(target) = target_yaw(input.horizontal, input.vertical, yaw_of(camera.rotation)) else {
            continue;
        };

        let current = yaw_of(tf.rotation);
        let angle = smooth_damp_angle(current, target, &mut state.turn_velocity, settings.movement.turn_smooth_time, dt);
        tf.rotation = Quat::from_rotation_y(angle);

        let delta = heading(target) * settings.movement.ground_speed * dt;
        motor.move_by(&mut tf, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn delta_angle_takes_short_way() {
        assert!((delta_angle(0.1, TAU - 0.1) - (-0.2)).abs() < 1e-5);
        assert!((delta_angle(-3.0, 3.0) - (6.0 - TAU)).abs() < 1e-5);
        assert!((delta_angle(0.0, PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut v = 0.0;
        let mut x = 0.0;
        for _ in 0..200 {
            x = smooth_damp(x, 1.0, &mut v, 0.1, 1.0 / 60.0);
            assert!(x <= 1.0 + 1e-6);
        }
        assert!((x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn smooth_damp_zero_dt_is_identity() {
        let mut v = 3.0;
        assert_eq!(smooth_damp(0.5, 1.0, &mut v, 0.1, 0.0), 0.5);
        assert_eq!(v, 3.0);
    }

    #[test]
    fn angle_damp_wraps_through_pi() {
        let mut v = 0.0;
        let start = PI - 0.1;
        let next = smooth_damp_angle(start, -PI + 0.1, &mut v, 0.1, 1.0 / 60.0);
        assert!(next > start);
    }

    #[test]
    fn forward_input_follows_camera_yaw() {
        let yaw = target_yaw(0.0, 1.0, 0.7).unwrap();
        assert!((yaw - 0.7).abs() < 1e-6);
        let dir = heading(target_yaw(0.0, 1.0, 0.0).unwrap());
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn strafe_and_back_inputs_map_to_side_and_rear() {
        let right = heading(target_yaw(1.0, 0.0, 0.0).unwrap());
        assert!((right - Vec3::X).length() < 1e-5);
        let back = heading(target_yaw(0.0, -1.0, 0.0).unwrap());
        assert!((back - Vec3::Z).length() < 1e-5);
        let left_yaw = target_yaw(-1.0, 0.0, 0.0).unwrap();
        assert!((left_yaw - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn no_input_means_no_heading() {
        assert!(target_yaw(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn yaw_round_trips_through_rotation() {
        let r = Quat::from_rotation_y(1.2);
        assert!((yaw_of(r) - 1.2).abs() < 1e-5);
    }
}
