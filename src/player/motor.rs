//! Collision-aware displacement of the player body.
//!
//! The controller never writes the player's translation directly; it hands a
//! displacement to a `CharacterMotor`, which resolves collisions and reports whether
//! the body ended the move standing on something.

use bevy::prelude::*;

/// Moves a body by a displacement and reports ground contact from the last move.
pub trait CharacterMotor {
    fn move_by(&mut self, transform: &mut Transform, delta: Vec3);
    fn is_grounded(&self) -> bool;
}

/// Kinematic motor colliding against an infinite horizontal ground plane.
///
/// `foot_offset` is the distance from the transform origin down to the soles, so the
/// origin rests at `ground_height + foot_offset` when standing.
#[derive(Component, Debug, Clone)]
pub struct KinematicMotor {
    pub ground_height: f32,
    pub foot_offset: f32,
    grounded: bool,
}

impl KinematicMotor {
    #[must_use]
    pub fn new(ground_height: f32, foot_offset: f32) -> Self {
        Self { ground_height, foot_offset, grounded: false }
    }

    fn rest_height(&self) -> f32 {
        self.ground_height + self.foot_offset
    }
}

impl CharacterMotor for KinematicMotor {
    fn move_by(&mut self, transform: &mut Transform, delta: Vec3) {
        transform.translation += delta;
        let rest = self.rest_height();
        if transform.translation.y <= rest {
            transform.translation.y = rest;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_airborne_until_first_move() {
        let motor = KinematicMotor::new(0.0, 1.0);
        assert!(!motor.is_grounded());
    }

    #[test]
    fn clamps_to_ground_and_reports_contact() {
        let mut motor = KinematicMotor::new(0.0, 1.0);
        let mut tf = Transform::from_xyz(0.0, 3.0, 0.0);
        motor.move_by(&mut tf, Vec3::new(1.0, -5.0, 2.0));
        assert_eq!(tf.translation, Vec3::new(1.0, 1.0, 2.0));
        assert!(motor.is_grounded());
    }

    #[test]
    fn horizontal_move_on_ground_stays_grounded() {
        let mut motor = KinematicMotor::new(0.0, 1.0);
        let mut tf = Transform::from_xyz(0.0, 1.0, 0.0);
        motor.move_by(&mut tf, Vec3::new(0.5, 0.0, 0.0));
        assert!(motor.is_grounded());
    }

    #[test]
    fn leaving_the_ground_reports_airborne() {
        let mut motor = KinematicMotor::new(0.0, 1.0);
        let mut tf = Transform::from_xyz(0.0, 1.0, 0.0);
        motor.move_by(&mut tf, Vec3::Y * 4.0);
        assert_eq!(tf.translation.y, 5.0);
        assert!(!motor.is_grounded());
    }
}
