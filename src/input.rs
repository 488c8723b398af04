//! Per-frame input snapshot.
//!
//! Raw device state is read once at the start of the frame into `FrameInput`; the
//! controller systems only ever look at the snapshot.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::settings::Settings;

/// Pixel-unit scroll events (touchpads) are scaled to roughly one line per notch.
const PIXELS_PER_LINE: f32 = 0.02;

/// Down/held/up state of a single bound button for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

/// Input for the current frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct FrameInput {
    /// Raw horizontal axis in [-1, 1], positive to the right.
    pub horizontal: f32,
    /// Raw vertical axis in [-1, 1], positive forward.
    pub vertical: f32,
    /// Scroll delta in lines; positive scrolls away from the user.
    pub scroll: f32,
    /// Mouse motion in pixels, already inverted per settings.
    pub look: Vec2,
    pub aim: ButtonState,
    pub pause: bool,
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Read keyboard, mouse buttons, wheel and motion into `FrameInput`.
///
/// Unknown bindings were rejected at startup; a binding that stops resolving after a
/// settings reload just reads as released.
///
/// # Arguments
/// * `keys`, `mouse` - keyboard and mouse button state
/// * `wheel`, `motion` - this frame's scroll and mouse motion events
/// * `settings` - key bindings and mouse inversion
/// * `input` - the snapshot overwritten for this frame
#[allow(clippy::needless_pass_by_value)]
pub fn sample_frame_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: EventReader<MouseWheel>,
    mut motion: EventReader<MouseMotion>,
    settings: Res<Settings>,
    mut input: ResMut<FrameInput>,
) {
    let held = |action: &str| settings.binding(action).is_ok_and(|b| b.pressed(&keys, &mouse));

    input.horizontal = axis(held("left"), held("right"));
    input.vertical = axis(held("back"), held("forward"));

    input.scroll = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * PIXELS_PER_LINE,
        })
        .sum();

    let mut look = Vec2::ZERO;
    for ev in motion.read() {
        look += ev.delta;
    }
    if settings.controls.invert_x {
        look.x = -look.x;
    }
    if settings.controls.invert_y {
        look.y = -look.y;
    }
    input.look = look;

    input.aim = match settings.binding("aim") {
        Ok(b) => ButtonState {
            pressed: b.just_pressed(&keys, &mouse),
            held: b.pressed(&keys, &mouse),
            released: b.just_released(&keys, &mouse),
        },
        Err(_) => ButtonState::default(),
    };
    input.pause = settings.binding("pause").is_ok_and(|b| b.just_pressed(&keys, &mouse));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_app() -> App {
        let mut app = App::new();
        app.add_event::<MouseWheel>()
            .add_event::<MouseMotion>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<FrameInput>()
            .insert_resource(Settings::default())
            .add_systems(Update, sample_frame_input);
        app
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut app = input_app();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyA);
            keys.press(KeyCode::KeyD);
            keys.press(KeyCode::KeyW);
        }
        app.update();
        let input = app.world().resource::<FrameInput>();
        assert_eq!(input.horizontal, 0.0);
        assert_eq!(input.vertical, 1.0);
    }

    #[test]
    fn aim_button_reports_press_and_release() {
        let mut app = input_app();
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        app.update();
        let aim = app.world().resource::<FrameInput>().aim;
        assert!(aim.pressed && aim.held && !aim.released);

        {
            let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            mouse.clear();
            mouse.release(MouseButton::Left);
        }
        app.update();
        let aim = app.world().resource::<FrameInput>().aim;
        assert!(!aim.held && aim.released);
    }

    #[test]
    fn wheel_events_sum_in_lines() {
        let mut app = input_app();
        let window = Entity::PLACEHOLDER;
        app.world_mut().send_event(MouseWheel { unit: MouseScrollUnit::Line, x: 0.0, y: 1.0, window });
        app.world_mut().send_event(MouseWheel { unit: MouseScrollUnit::Pixel, x: 0.0, y: 50.0, window });
        app.update();
        assert!((app.world().resource::<FrameInput>().scroll - 2.0).abs() < 1e-5);
    }
}
