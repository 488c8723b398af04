pub mod camera;
pub mod controller;
pub mod error;
pub mod input;
pub mod player;
pub mod ron;
pub mod settings;
pub mod trajectory;

pub use controller::{ControllerInputPlugin, ControllerPlugin, ControllerSet, TrajectoryRenderPlugin};
pub use error::ControllerError;
