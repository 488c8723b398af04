//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! through the RON watcher utilities (see `ron::setup_ron_watcher`). Every field has a
//! serde default, so a settings file only needs the values it overrides.
use bevy::prelude::{ButtonInput, KeyCode, MouseButton, Resource, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ControllerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

/// Sky rendering through `bevy_atmosphere`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereSettings {
    #[serde(default = "AtmosphereSettings::default_enabled")]
    pub enabled: bool, // Requires a restart to take effect
    #[serde(default = "AtmosphereSettings::default_resolution")]
    pub resolution: u32, // Skybox face resolution, multiple of 8
    #[serde(default = "AtmosphereSettings::default_dithering")]
    pub dithering: bool,
}

impl AtmosphereSettings {
    fn default_enabled() -> bool { true }
    fn default_resolution() -> u32 { 512 }
    fn default_dithering() -> bool { true }
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            resolution: Self::default_resolution(),
            dithering: Self::default_dithering(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse look multiplier, scaled down by 10000 when applied
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Action name -> key or mouse button identifier
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 30.0 }

    fn default_keybinds() -> HashMap<String, String> {
        DEFAULT_BINDINGS
            .iter()
            .map(|(action, key)| ((*action).to_string(), (*key).to_string()))
            .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Actions the controller reads, with the binding used when the settings file omits one.
pub const DEFAULT_BINDINGS: [(&str, &str); 6] = [
    ("forward", "W"),
    ("back", "S"),
    ("left", "A"),
    ("right", "D"),
    ("aim", "MouseLeft"),
    ("pause", "Escape"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_ground_speed")]
    pub ground_speed: f32, // World units per second while grounded
    #[serde(default = "MovementSettings::default_turn_smooth_time")]
    pub turn_smooth_time: f32, // Seconds for the facing angle to settle on the heading
}

impl MovementSettings {
    fn default_ground_speed() -> f32 { 40.0 }
    fn default_turn_smooth_time() -> f32 { 0.1 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            ground_speed: Self::default_ground_speed(),
            turn_smooth_time: Self::default_turn_smooth_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_min_zoom_out")]
    pub min_zoom_out: f32,
    #[serde(default = "CameraSettings::default_max_zoom_out")]
    pub max_zoom_out: f32,
    #[serde(default = "CameraSettings::default_zoom_per_scroll")]
    pub zoom_per_scroll: f32, // 0..=10
}

impl CameraSettings {
    fn default_min_zoom_out() -> f32 { -10.0 }
    fn default_max_zoom_out() -> f32 { 10.0 }
    fn default_zoom_per_scroll() -> f32 { 2.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_zoom_out: Self::default_min_zoom_out(),
            max_zoom_out: Self::default_max_zoom_out(),
            zoom_per_scroll: Self::default_zoom_per_scroll(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpSettings {
    #[serde(default = "JumpSettings::default_mass")]
    pub mass: f32, // Divisor applied to the launch velocity
    #[serde(default = "JumpSettings::default_jump_speed")]
    pub jump_speed: f32, // 1..=50
    #[serde(default = "JumpSettings::default_line_points")]
    pub line_points: u32, // Seconds of arc previewed, 10..=100
    #[serde(default = "JumpSettings::default_time_between_points")]
    pub time_between_points: f32, // Preview sampling step in seconds, 0.01..=0.25
}

impl JumpSettings {
    fn default_mass() -> f32 { 2.0 }
    fn default_jump_speed() -> f32 { 25.0 }
    fn default_line_points() -> u32 { 25 }
    fn default_time_between_points() -> f32 { 0.1 }

    /// Preview duration in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn preview_duration(&self) -> f32 {
        self.line_points as f32
    }
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            mass: Self::default_mass(),
            jump_speed: Self::default_jump_speed(),
            line_points: Self::default_line_points(),
            time_between_points: Self::default_time_between_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: (f32, f32, f32),
}

impl PhysicsSettings {
    fn default_gravity() -> (f32, f32, f32) { (0.0, -9.81, 0.0) }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.0, self.gravity.1, self.gravity.2)
    }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self { gravity: Self::default_gravity() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub atmosphere: AtmosphereSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub jump: JumpSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
}

impl Settings {
    /// Check every value the controller depends on.
    ///
    /// # Errors
    /// Returns the first `ControllerError::InvalidSetting` or
    /// `ControllerError::UnknownBinding` found.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let cam = &self.camera;
        if !(cam.min_zoom_out.is_finite() && cam.max_zoom_out.is_finite()) {
            return Err(ControllerError::invalid("camera.min_zoom_out", "zoom bounds must be finite"));
        }
        if cam.min_zoom_out > cam.max_zoom_out {
            return Err(ControllerError::invalid(
                "camera.min_zoom_out",
                format!("{} is greater than max_zoom_out {}", cam.min_zoom_out, cam.max_zoom_out),
            ));
        }
        if !(0.0..=10.0).contains(&cam.zoom_per_scroll) {
            return Err(ControllerError::invalid("camera.zoom_per_scroll", "must be within 0..=10"));
        }

        let jump = &self.jump;
        if !(jump.mass.is_finite() && jump.mass > 0.0) {
            return Err(ControllerError::invalid("jump.mass", "must be positive"));
        }
        if !(1.0..=50.0).contains(&jump.jump_speed) {
            return Err(ControllerError::invalid("jump.jump_speed", "must be within 1..=50"));
        }
        if !(10..=100).contains(&jump.line_points) {
            return Err(ControllerError::invalid("jump.line_points", "must be within 10..=100"));
        }
        if !(0.01..=0.25).contains(&jump.time_between_points) {
            return Err(ControllerError::invalid("jump.time_between_points", "must be within 0.01..=0.25"));
        }

        let mv = &self.movement;
        if !(mv.ground_speed.is_finite() && mv.ground_speed >= 0.0) {
            return Err(ControllerError::invalid("movement.ground_speed", "must be a non-negative number"));
        }
        if !(mv.turn_smooth_time.is_finite() && mv.turn_smooth_time >= 0.0) {
            return Err(ControllerError::invalid("movement.turn_smooth_time", "must be a non-negative number"));
        }

        if !self.physics.gravity().is_finite() {
            return Err(ControllerError::invalid("physics.gravity", "must be finite"));
        }

        for (action, _) in DEFAULT_BINDINGS {
            self.binding(action)?;
        }
        for (action, name) in &self.controls.keybinds {
            if Binding::parse(name).is_none() {
                return Err(ControllerError::UnknownBinding { action: action.clone(), name: name.clone() });
            }
        }
        Ok(())
    }

    /// Resolve the binding for `action`, falling back to the built-in default when the
    /// settings file does not mention it.
    ///
    /// # Errors
    /// `ControllerError::UnknownBinding` when the configured identifier is not recognised
    /// or the action has no default.
    pub fn binding(&self, action: &str) -> Result<Binding, ControllerError> {
        let name = self
            .controls
            .keybinds
            .get(action)
            .map(String::as_str)
            .or_else(|| DEFAULT_BINDINGS.iter().find(|(a, _)| *a == action).map(|(_, k)| *k))
            .unwrap_or_default();
        Binding::parse(name).ok_or_else(|| ControllerError::UnknownBinding {
            action: action.to_string(),
            name: name.to_string(),
        })
    }
}

/// A keyboard key or mouse button an action is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl Binding {
    /// Parse an identifier such as `"W"`, `"Space"`, `"F1"` or `"MouseLeft"`.
    /// Matching is case-insensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let s = name.trim().to_ascii_uppercase();

        let mouse = match s.as_str() {
            "MOUSELEFT" | "LMB" => Some(MouseButton::Left),
            "MOUSERIGHT" | "RMB" => Some(MouseButton::Right),
            "MOUSEMIDDLE" | "MMB" => Some(MouseButton::Middle),
            "MOUSEBACK" => Some(MouseButton::Back),
            "MOUSEFORWARD" => Some(MouseButton::Forward),
            _ => None,
        };
        if let Some(button) = mouse {
            return Some(Binding::Mouse(button));
        }

        keycode_from_str(&s).map(Binding::Key)
    }

    #[must_use]
    pub fn pressed(&self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match *self {
            Binding::Key(k) => keys.pressed(k),
            Binding::Mouse(b) => mouse.pressed(b),
        }
    }

    #[must_use]
    pub fn just_pressed(&self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match *self {
            Binding::Key(k) => keys.just_pressed(k),
            Binding::Mouse(b) => mouse.just_pressed(b),
        }
    }

    #[must_use]
    pub fn just_released(&self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match *self {
            Binding::Key(k) => keys.just_released(k),
            Binding::Mouse(b) => mouse.just_released(b),
        }
    }
}

/// Map an upper-cased key identifier to a `KeyCode`.
fn keycode_from_str(s: &str) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE, KeyCode::KeyF,
        KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL,
        KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO, KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR,
        KeyCode::KeyS, KeyCode::KeyT, KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX,
        KeyCode::KeyY, KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
        KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
    ];
    const FUNCTION: [KeyCode; 12] = [
        KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
        KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
    ];

    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() {
            return Some(LETTERS[(c as u8 - b'A') as usize]);
        }
        if c.is_ascii_digit() {
            return Some(DIGITS[(c as u8 - b'0') as usize]);
        }
    }

    if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        return n.checked_sub(1).and_then(|i| FUNCTION.get(i)).copied();
    }

    Some(match s {
        "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
        "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
        "UP" | "ARROWUP" => KeyCode::ArrowUp,
        "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
        "ESC" | "ESCAPE" => KeyCode::Escape,
        "SPACE" => KeyCode::Space,
        "TAB" => KeyCode::Tab,
        "ENTER" | "RETURN" => KeyCode::Enter,
        "BACKSPACE" => KeyCode::Backspace,
        "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
        "RSHIFT" => KeyCode::ShiftRight,
        "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
        "RCTRL" => KeyCode::ControlRight,
        "LALT" | "ALT" => KeyCode::AltLeft,
        "RALT" => KeyCode::AltRight,
        _ => return None,
    })
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn parses_keys_and_mouse_buttons() {
        assert_eq!(Binding::parse("w"), Some(Binding::Key(KeyCode::KeyW)));
        assert_eq!(Binding::parse("Space"), Some(Binding::Key(KeyCode::Space)));
        assert_eq!(Binding::parse("F12"), Some(Binding::Key(KeyCode::F12)));
        assert_eq!(Binding::parse("7"), Some(Binding::Key(KeyCode::Digit7)));
        assert_eq!(Binding::parse("MouseLeft"), Some(Binding::Mouse(MouseButton::Left)));
        assert_eq!(Binding::parse("F13"), None);
        assert_eq!(Binding::parse("F0"), None);
        assert_eq!(Binding::parse("Nope"), None);
    }

    #[test]
    fn missing_binding_falls_back_to_default() {
        let mut settings = Settings::default();
        settings.controls.keybinds.clear();
        assert_eq!(settings.binding("aim").unwrap(), Binding::Mouse(MouseButton::Left));
        assert_eq!(settings.binding("forward").unwrap(), Binding::Key(KeyCode::KeyW));
        assert!(settings.binding("teleport").is_err());
    }

    #[test]
    fn rejects_inverted_zoom_bounds() {
        let mut settings = Settings::default();
        settings.camera.min_zoom_out = 5.0;
        settings.camera.max_zoom_out = -5.0;
        assert!(matches!(
            settings.validate(),
            Err(ControllerError::InvalidSetting { field: "camera.min_zoom_out", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut settings = Settings::default();
        settings.jump.mass = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_unknown_keybind() {
        let mut settings = Settings::default();
        settings.controls.keybinds.insert("aim".into(), "Trackpad".into());
        assert!(matches!(settings.validate(), Err(ControllerError::UnknownBinding { .. })));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let settings: Settings = ron::from_str("(jump: (mass: 4.0), camera: (zoom_per_scroll: 1.5))").unwrap();
        assert_eq!(settings.jump.mass, 4.0);
        assert_eq!(settings.jump.jump_speed, 25.0);
        assert_eq!(settings.camera.zoom_per_scroll, 1.5);
        assert_eq!(settings.camera.max_zoom_out, 10.0);
        assert_eq!(settings.physics.gravity(), Vec3::new(0.0, -9.81, 0.0));
        assert!(settings.validate().is_ok());
    }
}
