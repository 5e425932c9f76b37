use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// How the window cursor behaves while a camera is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    #[default]
    Normal,
    Hidden,
    /// Hidden and locked to the window
    Grabbed,
}

/// Projection and input parameters shared by every camera kind
///
/// Out-of-range values are clamped by the setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    fov: f32,
    pub aspect_ratio: f32,
    render_distance: f32,
    mouse_sensitivity: f32,
    wheel_sensitivity: f32,
    pub cursor: CursorState,
}

impl CameraSettings {
    /// Distance to the near clipping plane
    pub const DEPTH_NEAR: f32 = 0.01;

    pub const MIN_FOV: f32 = FRAC_PI_4;
    pub const MAX_FOV: f32 = 3.0 * FRAC_PI_4;
    pub const MIN_RENDER_DISTANCE: f32 = 10.0;
    pub const MIN_MOUSE_SENSITIVITY: f32 = 0.01;
    pub const MAX_MOUSE_SENSITIVITY: f32 = 10.0;
    pub const MIN_WHEEL_SENSITIVITY: f32 = 0.1;
    pub const MAX_WHEEL_SENSITIVITY: f32 = 50.0;

    pub fn new(render_distance: f32, aspect_ratio: f32, fov: f32) -> Self {
        Self::default()
            .with_render_distance(render_distance)
            .with_aspect_ratio(aspect_ratio)
            .with_fov(fov)
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.set_fov(fov);
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_render_distance(mut self, render_distance: f32) -> Self {
        self.set_render_distance(render_distance);
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.set_mouse_sensitivity(sensitivity);
        self
    }

    pub fn with_wheel_sensitivity(mut self, sensitivity: f32) -> Self {
        self.set_wheel_sensitivity(sensitivity);
        self
    }

    pub fn with_cursor(mut self, cursor: CursorState) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Vertical field of view in radians, clamped to `[π/4, 3π/4]`
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(Self::MIN_FOV, Self::MAX_FOV);
    }

    pub fn render_distance(&self) -> f32 {
        self.render_distance
    }

    pub fn set_render_distance(&mut self, render_distance: f32) {
        self.render_distance = render_distance.max(Self::MIN_RENDER_DISTANCE);
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity =
            sensitivity.clamp(Self::MIN_MOUSE_SENSITIVITY, Self::MAX_MOUSE_SENSITIVITY);
    }

    pub fn wheel_sensitivity(&self) -> f32 {
        self.wheel_sensitivity
    }

    pub fn set_wheel_sensitivity(&mut self, sensitivity: f32) {
        self.wheel_sensitivity =
            sensitivity.clamp(Self::MIN_WHEEL_SENSITIVITY, Self::MAX_WHEEL_SENSITIVITY);
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_2,
            aspect_ratio: 16.0 / 9.0,
            render_distance: 1000.0,
            mouse_sensitivity: 0.05,
            wheel_sensitivity: 1.0,
            cursor: CursorState::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CameraSettings::default();
        assert_eq!(settings.fov(), FRAC_PI_2);
        assert_eq!(settings.aspect_ratio, 16.0 / 9.0);
        assert_eq!(settings.render_distance(), 1000.0);
        assert_eq!(settings.mouse_sensitivity(), 0.05);
        assert_eq!(settings.wheel_sensitivity(), 1.0);
        assert_eq!(settings.cursor, CursorState::Normal);
    }

    #[test]
    fn test_setters_clamp() {
        let settings = CameraSettings::new(1.0, 1.0, 0.1)
            .with_mouse_sensitivity(100.0)
            .with_wheel_sensitivity(0.0);
        assert_eq!(settings.render_distance(), CameraSettings::MIN_RENDER_DISTANCE);
        assert_eq!(settings.fov(), CameraSettings::MIN_FOV);
        assert_eq!(settings.mouse_sensitivity(), CameraSettings::MAX_MOUSE_SENSITIVITY);
        assert_eq!(settings.wheel_sensitivity(), CameraSettings::MIN_WHEEL_SENSITIVITY);
        assert_eq!(CameraSettings::default().with_fov(3.0).fov(), CameraSettings::MAX_FOV);
    }
}
