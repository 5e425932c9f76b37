use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
};

use super::camera::Camera;

/// Translates winit events into camera input
pub struct CameraController {
    /// Pixels of touchpad scroll counted as one wheel line
    pub pixels_per_line: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            pixels_per_line: 20.0,
        }
    }
}

impl CameraController {
    pub fn new(pixels_per_line: f32) -> Self {
        Self { pixels_per_line }
    }

    /// Raw device input. Returns true if the camera may have moved.
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut Camera) -> bool {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                camera.on_mouse_motion(*delta);
                true
            }
            _ => false,
        }
    }

    /// Window-level input. Returns true if the event was consumed.
    pub fn process_window_events(&mut self, event: &WindowEvent, camera: &mut Camera) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                camera.on_mouse_button(*button, *state);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        *y as f32 / self.pixels_per_line
                    }
                };
                camera.on_scroll(lines);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_events(event, camera),
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut Camera) -> bool {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(code),
                state,
                repeat,
                ..
            } => {
                if *repeat && *state == ElementState::Pressed {
                    return false;
                }
                log::trace!("camera key {:?} {:?}", code, state);
                camera.on_key(*code, *state);
                true
            }
            _ => false,
        }
    }
}
