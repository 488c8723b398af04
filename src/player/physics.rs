//! Player vertical physics: gravity accumulation and the launched jump velocity.
//!
//! While airborne the vertical speed accumulates gravity and the jump velocity is
//! re-scaled by the frame time every frame. Each frame, grounded or not, the motor
//! receives `v_speed + jump_velocity.y` as vertical displacement. Neither term is reset
//! on landing.

use bevy::prelude::*;

use crate::player::{CharacterMotor, Player, PlayerState};
use crate::settings::Settings;

/// Ground contact as reported by the motor after the previous move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalState {
    Grounded,
    Airborne,
}

impl VerticalState {
    #[must_use]
    pub fn from_grounded(grounded: bool) -> Self {
        if grounded { VerticalState::Grounded } else { VerticalState::Airborne }
    }
}

/// Advance the airborne terms of `state` by one frame of `dt` seconds.
pub fn integrate_airborne(state: &mut PlayerState, gravity: Vec3, dt: f32) {
    state.v_speed += gravity.y * dt;
    state.jump_velocity = state.jump_velocity * dt + gravity / 2.0 * dt * dt;
}

/// Vertical displacement handed to the motor this frame.
#[must_use]
pub fn vertical_displacement(state: &PlayerState) -> Vec3 {
    Vec3::new(0.0, state.v_speed + state.jump_velocity.y, 0.0)
}

/// Integrate gravity and the jump velocity for airborne players.
///
/// # Arguments
/// * `time` - frame delta
/// * `settings` - gravity vector from `Settings.physics`
/// * `players` - player state and the motor whose last move decides grounded or airborne
#[allow(clippy::needless_pass_by_value)]
pub fn airborne_physics<M: CharacterMotor + Component>(
    time: Res<Time>,
    settings: Res<Settings>,
    mut players: Query<(&mut PlayerState, &M), With<Player>>,
) {
    let gravity = settings.physics.gravity();
    let dt = time.delta_seconds();
    for (mut state, motor) in &mut players {
        if VerticalState::from_grounded(motor.is_grounded()) == VerticalState::Airborne {
            integrate_airborne(&mut state, gravity, dt);
        }
    }
}

/// Hand this frame's vertical displacement to the motor and log contact changes.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, (airborne_physics::<KinematicMotor>, apply_vertical_motion::<KinematicMotor>).chain());
/// ```
pub fn apply_vertical_motion<M: CharacterMotor + Component>(
    mut players: Query<(Entity, &mut Transform, &PlayerState, &mut M), With<Player>>,
) {
    for (entity, mut tf, state, mut motor) in &mut players {
        let before = VerticalState::from_grounded(motor.is_grounded());
        motor.move_by(&mut tf, vertical_displacement(state));
        let after = VerticalState::from_grounded(motor.is_grounded());
        if before != after {
            debug!("{entity:?} {before:?} -> {after:?} at y={:.2}", tf.translation.y);
        }
    }
}
