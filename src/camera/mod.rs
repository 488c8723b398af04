//! Free-look orbit camera: mouse look, scroll zoom and player follow.
//!
//! The rig describes three orbit rings around the player (top, middle, bottom), each
//! with a height and a radius. Mouse motion moves the camera around and between the
//! rings; the scroll wheel only changes the middle ring's radius, offset from the
//! value the rig had at startup.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::input::FrameInput;
use crate::player::{heading, Player};
use crate::settings::Settings;

/// The camera never gets closer to the look target than this, whatever the radius.
const MIN_FOLLOW_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitLevel {
    Top,
    Middle,
    Bottom,
}

impl OrbitLevel {
    fn index(self) -> usize {
        match self {
            OrbitLevel::Top => 0,
            OrbitLevel::Middle => 1,
            OrbitLevel::Bottom => 2,
        }
    }
}

/// One ring of the rig, relative to the follow target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub height: f32,
    pub radius: f32,
}

impl Orbit {
    fn lerp(self, other: Orbit, t: f32) -> Orbit {
        Orbit {
            height: self.height + (other.height - self.height) * t,
            radius: self.radius + (other.radius - self.radius) * t,
        }
    }
}

/// The orbit parameters the zoom needs from a camera rig.
pub trait ZoomableRig {
    fn orbit_height(&self, level: OrbitLevel) -> f32;
    fn orbit_radius(&self, level: OrbitLevel) -> f32;
    fn set_orbit_radius(&mut self, level: OrbitLevel, radius: f32);
}

/// Three-ring free-look rig on the camera entity.
#[derive(Component, Debug, Clone)]
pub struct FreeLookRig {
    pub orbits: [Orbit; 3],
    /// Horizontal angle (radians); the camera looks along `heading(yaw)`.
    pub yaw: f32,
    /// Position between the rings: 0 bottom, 0.5 middle, 1 top.
    pub vertical: f32,
    /// Point on the player the camera looks at, relative to its origin.
    pub look_offset: Vec3,
}

impl Default for FreeLookRig {
    fn default() -> Self {
        Self {
            orbits: [
                Orbit { height: 10.0, radius: 6.0 },
                Orbit { height: 4.0, radius: 12.0 },
                Orbit { height: 0.5, radius: 8.0 },
            ],
            yaw: 0.0,
            vertical: 0.5,
            look_offset: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl ZoomableRig for FreeLookRig {
    fn orbit_height(&self, level: OrbitLevel) -> f32 {
        self.orbits[level.index()].height
    }

    fn orbit_radius(&self, level: OrbitLevel) -> f32 {
        self.orbits[level.index()].radius
    }

    fn set_orbit_radius(&mut self, level: OrbitLevel, radius: f32) {
        self.orbits[level.index()].radius = radius;
    }
}

impl FreeLookRig {
    /// Ring blended for the current `vertical` position.
    #[must_use]
    pub fn current_orbit(&self) -> Orbit {
        let [top, middle, bottom] = self.orbits;
        let v = self.vertical.clamp(0.0, 1.0);
        if v >= 0.5 {
            middle.lerp(top, (v - 0.5) * 2.0)
        } else {
            bottom.lerp(middle, v * 2.0)
        }
    }

    /// Camera offset from the follow target's origin.
    #[must_use]
    pub fn camera_offset(&self) -> Vec3 {
        let orbit = self.current_orbit();
        -heading(self.yaw) * orbit.radius.max(MIN_FOLLOW_RADIUS) + Vec3::Y * orbit.height
    }
}

/// Rig values captured once at startup; the zoom is applied relative to them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigDefaults {
    pub top_height: f32,
    pub top_radius: f32,
    pub middle_radius: f32,
}

impl RigDefaults {
    pub fn capture(rig: &impl ZoomableRig) -> Self {
        Self {
            top_height: rig.orbit_height(OrbitLevel::Top),
            top_radius: rig.orbit_radius(OrbitLevel::Top),
            middle_radius: rig.orbit_radius(OrbitLevel::Middle),
        }
    }
}

/// Zoom accumulator, always within the configured bounds.
#[derive(Component, Debug, Clone)]
pub struct ZoomState {
    pub zoom_out: f32,
    pub defaults: RigDefaults,
}

impl ZoomState {
    /// Start as close to no zoom as `[min, max]` allows.
    ///
    /// Panics if `min > max`; `Settings::validate` rejects such bounds.
    #[must_use]
    pub fn new(defaults: RigDefaults, min: f32, max: f32) -> Self {
        Self { zoom_out: 0.0_f32.clamp(min, max), defaults }
    }

    /// Middle ring radius for the current accumulator.
    #[must_use]
    pub fn middle_radius(&self) -> f32 {
        self.defaults.middle_radius + self.zoom_out
    }

    /// Write the zoomed middle radius into `rig`.
    pub fn apply_to(&self, rig: &mut impl ZoomableRig) {
        rig.set_orbit_radius(OrbitLevel::Middle, self.middle_radius());
    }
}

/// New zoom accumulator after one frame of `scroll`.
///
/// Scrolling away from the user (positive) zooms in by `step`, toward the user zooms out.
#[must_use]
pub fn apply_scroll(zoom_out: f32, scroll: f32, min: f32, max: f32, step: f32) -> f32 {
    let next = if scroll > 0.0 {
        zoom_out - step
    } else if scroll < 0.0 {
        zoom_out + step
    } else {
        zoom_out
    };
    next.clamp(min, max)
}

/// Apply scroll input to the zoom accumulator and write the middle ring radius.
///
/// The accumulator is re-clamped every frame, so bounds narrowed by a settings reload
/// take effect without waiting for the next scroll.
///
/// # Arguments
/// * `input` - this frame's input snapshot; only `scroll` is read
/// * `settings` - zoom bounds and step from `Settings.camera`
/// * `rigs` - cameras carrying both a `FreeLookRig` and the `ZoomState` added at startup
#[allow(clippy::needless_pass_by_value)]
pub fn zoom_camera(
    input: Res<FrameInput>,
    settings: Res<Settings>,
    mut rigs: Query<(&mut FreeLookRig, &mut ZoomState)>,
) {
    let cam = &settings.camera;
    for (mut rig, mut zoom) in &mut rigs {
        let next = apply_scroll(zoom.zoom_out, input.scroll, cam.min_zoom_out, cam.max_zoom_out, cam.zoom_per_scroll);
        if next == zoom.zoom_out {
            continue;
        }
        zoom.zoom_out = next;
        zoom.apply_to(rig.as_mut());
        debug!("zoom_out {} -> middle radius {}", zoom.zoom_out, zoom.middle_radius());
    }
}

/// Turn mouse motion into rig yaw and vertical position while the cursor is grabbed.
///
/// # Arguments
/// * `input` - this frame's input snapshot; `look` is the accumulated mouse motion
/// * `settings` - mouse sensitivity (inversion is already applied when sampling)
/// * `windows` - the primary window, used to skip look while the cursor is free
/// * `rigs` - rigs to turn
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    input: Res<FrameInput>,
    settings: Res<Settings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rigs: Query<&mut FreeLookRig>,
) {
    if input.look == Vec2::ZERO {
        return;
    }
    if let Ok(window) = windows.get_single() {
        if window.cursor.visible {
            return;
        }
    }
    let scale = settings.controls.mouse_sensitivity / 10000.0;
    for mut rig in &mut rigs {
        rig.yaw -= input.look.x * scale;
        rig.vertical = (rig.vertical + input.look.y * scale).clamp(0.0, 1.0);
    }
}

/// Place the camera on its rig around the player and aim it at the look target.
///
/// Runs last in the tick, after the player has moved for this frame.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, follow_player.after(apply_vertical_motion::<KinematicMotor>));
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn follow_player(
    players: Query<&Transform, (With<Player>, Without<FreeLookRig>)>,
    mut cameras: Query<(&mut Transform, &FreeLookRig), Without<Player>>,
) {
    let Ok(player) = players.get_single() else { return };
    for (mut tf, rig) in &mut cameras {
        let target = player.translation + rig.look_offset;
        tf.translation = player.translation + rig.camera_offset();
        tf.look_at(target, Vec3::Y);
    }
}

/// Lock and hide the cursor.
pub fn grab_cursor(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut w in &mut windows {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }
}

/// Toggle the cursor lock on the pause binding.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_cursor_grab(input: Res<FrameInput>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if !input.pause {
        return;
    }
    for mut w in &mut windows {
        if w.cursor.visible {
            w.cursor.grab_mode = CursorGrabMode::Locked;
            w.cursor.visible = false;
        } else {
            w.cursor.grab_mode = CursorGrabMode::None;
            w.cursor.visible = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_scrolls_clamp_at_minimum() {
        let mut z = 0.0;
        for i in 1..=5 {
            z = apply_scroll(z, 1.0, -10.0, 10.0, 2.0);
            assert_eq!(z, -2.0 * i as f32);
        }
        for _ in 0..3 {
            z = apply_scroll(z, 1.0, -10.0, 10.0, 2.0);
            assert_eq!(z, -10.0);
        }
    }

    #[test]
    fn zoom_never_leaves_bounds() {
        let mut z = 0.0;
        let mut state: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let scroll = ((state >> 16) % 3) as f32 - 1.0;
            z = apply_scroll(z, scroll, -7.0, 3.0, 2.5);
            assert!((-7.0..=3.0).contains(&z));
        }
    }

    #[test]
    fn zero_scroll_is_a_no_op() {
        assert_eq!(apply_scroll(4.0, 0.0, -10.0, 10.0, 2.0), 4.0);
    }

    #[test]
    fn zoom_starts_inside_bounds_that_exclude_zero() {
        let defaults = RigDefaults::capture(&FreeLookRig::default());
        assert_eq!(ZoomState::new(defaults, 2.0, 8.0).zoom_out, 2.0);
        assert_eq!(ZoomState::new(defaults, -6.0, -1.0).zoom_out, -1.0);
        assert_eq!(ZoomState::new(defaults, -10.0, 10.0).zoom_out, 0.0);

        let mut rig = FreeLookRig::default();
        ZoomState::new(defaults, 2.0, 8.0).apply_to(&mut rig);
        assert_eq!(rig.orbit_radius(OrbitLevel::Middle), 14.0);
    }

    #[test]
    fn rig_exposes_and_updates_orbits() {
        let mut rig = FreeLookRig::default();
        let defaults = RigDefaults::capture(&rig);
        assert_eq!(defaults.top_height, 10.0);
        assert_eq!(defaults.middle_radius, 12.0);
        rig.set_orbit_radius(OrbitLevel::Middle, 7.0);
        assert_eq!(rig.orbit_radius(OrbitLevel::Middle), 7.0);
        assert_eq!(rig.orbit_radius(OrbitLevel::Top), 6.0);
    }

    #[test]
    fn vertical_blends_between_rings() {
        let mut rig = FreeLookRig::default();
        rig.vertical = 0.5;
        assert_eq!(rig.current_orbit(), rig.orbits[1]);
        rig.vertical = 1.0;
        assert_eq!(rig.current_orbit(), rig.orbits[0]);
        rig.vertical = 0.0;
        assert_eq!(rig.current_orbit(), rig.orbits[2]);
        rig.vertical = 0.75;
        let o = rig.current_orbit();
        assert!((o.height - 7.0).abs() < 1e-5);
        assert!((o.radius - 9.0).abs() < 1e-5);
    }

    #[test]
    fn camera_sits_behind_the_heading() {
        let rig = FreeLookRig::default();
        let offset = rig.camera_offset();
        assert!((offset - Vec3::new(0.0, 4.0, 12.0)).length() < 1e-5);
    }

    #[test]
    fn follow_places_camera_on_rig() {
        let mut app = App::new();
        app.add_systems(Update, follow_player);
        app.world_mut().spawn((Transform::from_xyz(1.0, 1.0, 1.0), Player));
        let cam = app.world_mut().spawn((Transform::default(), FreeLookRig::default())).id();
        app.update();
        let tf = app.world().get::<Transform>(cam).unwrap();
        assert!((tf.translation - Vec3::new(1.0, 5.0, 13.0)).length() < 1e-5);
        assert!(tf.forward().z < 0.0);
    }
}
