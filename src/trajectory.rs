//! Jump arc preview: closed-form projectile sampling and the polyline it is written to.
//!
//! Points are evaluated from the launch time directly rather than integrated step by
//! step, so the arc is exact at every sample whatever the step size.

use bevy::color::palettes::css::ORANGE;
use bevy::prelude::*;

/// Upper bound on the points of one arc. Validated settings stay far below it
/// (100 s at 0.01 s gives 10 001).
pub const MAX_TRAJECTORY_POINTS: usize = 1 << 16;

/// Number of points `sample_trajectory` produces for `duration` seconds at `step`.
///
/// `ceil(duration / step) + 1` for positive inputs, `1` (the origin alone) otherwise,
/// capped at `MAX_TRAJECTORY_POINTS`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn trajectory_point_count(duration: f32, step: f32) -> usize {
    if !(duration > 0.0 && step > 0.0) || !(duration / step).is_finite() {
        return 1;
    }
    let intervals = (duration / step).ceil();
    if intervals >= (MAX_TRAJECTORY_POINTS - 1) as f32 {
        return MAX_TRAJECTORY_POINTS;
    }
    intervals as usize + 1
}

/// Position at time `t` of a projectile launched from `origin` with `velocity`
/// under constant vertical acceleration `gravity_y`.
#[must_use]
pub fn point_at(origin: Vec3, velocity: Vec3, gravity_y: f32, t: f32) -> Vec3 {
    Vec3::new(
        origin.x + velocity.x * t,
        origin.y + velocity.y * t + 0.5 * gravity_y * t * t,
        origin.z + velocity.z * t,
    )
}

/// Sample the arc at `t = 0, step, 2*step, ...`; see `trajectory_point_count` for the length.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_trajectory(origin: Vec3, velocity: Vec3, gravity_y: f32, duration: f32, step: f32) -> Vec<Vec3> {
    let mut points = Vec::new();
    sample_trajectory_into(&mut points, origin, velocity, gravity_y, duration, step);
    points
}

/// Like `sample_trajectory` but overwrites `out`, reusing its allocation.
#[allow(clippy::cast_precision_loss)]
pub fn sample_trajectory_into(out: &mut Vec<Vec3>, origin: Vec3, velocity: Vec3, gravity_y: f32, duration: f32, step: f32) {
    let count = trajectory_point_count(duration, step);
    out.clear();
    out.reserve(count);
    out.push(origin);
    for i in 1..count {
        out.push(point_at(origin, velocity, gravity_y, i as f32 * step));
    }
}

/// Polyline owned by the controller: an ordered point buffer plus a visibility toggle.
///
/// The buffer is replaced wholesale on every write; it never accumulates.
#[derive(Component, Debug, Clone)]
pub struct TrajectoryLine {
    pub points: Vec<Vec3>,
    pub visible: bool,
    pub color: Color,
}

impl Default for TrajectoryLine {
    fn default() -> Self {
        Self { points: Vec::new(), visible: false, color: ORANGE.into() }
    }
}

impl TrajectoryLine {
    /// Overwrite the buffer with the arc described by the arguments and show the line.
    pub fn write_arc(&mut self, origin: Vec3, velocity: Vec3, gravity_y: f32, duration: f32, step: f32) {
        sample_trajectory_into(&mut self.points, origin, velocity, gravity_y, duration, step);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Draw visible trajectory lines as gizmo line strips.
///
/// # Arguments
/// * `gizmos` - immediate-mode line drawing, cleared every frame
/// * `lines` - every `TrajectoryLine`; hidden ones and single points are skipped
pub fn draw_trajectory_lines(mut gizmos: Gizmos, lines: Query<&TrajectoryLine>) {
    for line in &lines {
        if line.visible && line.points.len() > 1 {
            gizmos.linestrip(line.points.iter().copied(), line.color);
        }
    }
}
