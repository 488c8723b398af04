//! Player components and systems (motor, movement, physics, jump).
//!
//! # Example:
//!
//! ```ignore
//! commands
//!     .spawn((
//!         TransformBundle::from_transform(Transform::from_xyz(0.0, 1.0, 0.0)),
//!         Player,
//!         PlayerState::default(),
//!         KinematicMotor::new(0.0, 1.0),
//!         TrajectoryLine::default(),
//!     ))
//!     .with_children(|p| {
//!         p.spawn((TransformBundle::from_transform(Transform::from_xyz(0.0, 0.5, -0.6)), ReleasePoint));
//!     });
//! ```
pub mod jump;
pub mod motor;
pub mod movement;
pub mod physics;

use bevy::prelude::*;

pub use jump::*;
pub use motor::*;
pub use movement::*;
pub use physics::*;

/// Marker for the controlled character.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Per-frame state owned by the controller. Position and facing live in the `Transform`.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerState {
    /// Accumulated vertical speed from gravity while airborne.
    pub v_speed: f32,
    /// Velocity assigned at launch, decayed every airborne frame.
    pub jump_velocity: Vec3,
    /// Angular velocity used by the turn smoothing.
    pub turn_velocity: f32,
}

/// Marks the point the jump arc is launched from, usually a child of the player.
#[derive(Component, Debug, Default)]
pub struct ReleasePoint;
