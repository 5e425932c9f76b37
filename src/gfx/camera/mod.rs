pub mod camera;
pub mod camera_controller;
pub mod camera_settings;
pub mod camera_utils;

// Re-export main types
pub use camera::{Camera, CameraKind, FirstPersonControl, SphericalControl, TwoDControl};
pub use camera_controller::CameraController;
pub use camera_settings::{CameraSettings, CursorState};
