//! Cameras and their input handling
//!
//! A [`Camera`] holds the view and projection matrices plus the figure drawn
//! for it when another camera is current. Its [`CameraKind`] decides how
//! mouse and keyboard input move it:
//!
//! - **Spherical** orbits a target: left-drag rotates, middle-drag moves the
//!   target, scrolling changes the radius, `Shift + C` resets.
//! - **FirstPerson** flies freely: mouse looks around, `WASD` / `Space` /
//!   `Shift` move, scrolling changes the field of view.
//! - **TwoD** looks down -Z with an orthographic projection: left-drag pans,
//!   scrolling zooms.
//! - **Static** ignores input.

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{perspective, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::gfx::geometry::transform::wrap_radians;
use crate::gfx::model::{ComplexModel, Model};

use super::camera_settings::{CameraSettings, CursorState};
use super::camera_utils::{look_basis, OPENGL_TO_WGPU_MATRIX};

/// World units moved per dragged pixel, per unit of distance to the target
const PAN_PER_PIXEL: f32 = 0.002;

/// Orbit around a target in spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalControl {
    radius: f32,
    theta: f32,
    phi: f32,
    mouse_sensitivity: f32,
    scroll_sensitivity: f32,
    rotating: bool,
    panning: bool,
    initial: (f32, f32, f32, Vector3<f32>),
}

impl SphericalControl {
    pub const MIN_RADIUS: f32 = 1.0;
    /// Keeps θ away from the poles, where the basis degenerates
    pub const DELTA_THETA: f32 = 1e-5;
    pub const MIN_MOUSE_SENSITIVITY: f32 = 0.01;
    pub const MAX_MOUSE_SENSITIVITY: f32 = 10.0;
    pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.3;
    pub const MIN_SCROLL_SENSITIVITY: f32 = 1.0;
    pub const MAX_SCROLL_SENSITIVITY: f32 = 100.0;
    pub const DEFAULT_SCROLL_SENSITIVITY: f32 = 25.0;

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Degrees of rotation per dragged pixel
    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity =
            sensitivity.clamp(Self::MIN_MOUSE_SENSITIVITY, Self::MAX_MOUSE_SENSITIVITY);
    }

    /// Radius change per scroll line
    pub fn scroll_sensitivity(&self) -> f32 {
        self.scroll_sensitivity
    }

    pub fn set_scroll_sensitivity(&mut self, sensitivity: f32) {
        self.scroll_sensitivity =
            sensitivity.clamp(Self::MIN_SCROLL_SENSITIVITY, Self::MAX_SCROLL_SENSITIVITY);
    }

    fn set_orbit(&mut self, radius: f32, theta: f32, phi: f32, render_distance: f32) {
        self.radius = radius.clamp(Self::MIN_RADIUS, render_distance);
        self.theta = theta.clamp(Self::DELTA_THETA, PI - Self::DELTA_THETA);
        self.phi = wrap_radians(phi);
    }

    fn offset(&self) -> Vector3<f32> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vector3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi) * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct MovementKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

/// Free flight driven by yaw and pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonControl {
    yaw: f32,
    pitch: f32,
    /// World units per second
    pub speed: f32,
    looking: bool,
    keys: MovementKeys,
}

impl FirstPersonControl {
    pub const MAX_PITCH: f32 = 89.0 * PI / 180.0;
    pub const DEFAULT_SPEED: f32 = 5.0;

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn forward(&self) -> Vector3<f32> {
        Vector3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
    }
}

/// Orthographic top-down view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoDControl {
    /// Half the visible height in world units
    half_height: f32,
    distance: f32,
    panning: bool,
}

impl TwoDControl {
    pub const MIN_HALF_HEIGHT: f32 = 0.01;
    /// Zoom factor exponent per scroll line
    pub const ZOOM_STEP: f32 = 0.1;

    pub fn half_height(&self) -> f32 {
        self.half_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraKind {
    Spherical(SphericalControl),
    FirstPerson(FirstPersonControl),
    TwoD(TwoDControl),
    Static,
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vector3<f32>,
    target: Vector3<f32>,
    direction: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    settings: CameraSettings,
    figure: ComplexModel,
    kind: CameraKind,
    shift_held: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::spherical(
            Vector3::new(0.0, 2.0, 8.0),
            Vector3::new(0.0, 0.0, 0.0),
            CameraSettings::default(),
        )
    }
}

impl Camera {
    fn with_kind(
        position: Vector3<f32>,
        target: Vector3<f32>,
        settings: CameraSettings,
        kind: CameraKind,
    ) -> Self {
        let mut camera = Self {
            position,
            target,
            direction: Vector3::unit_z(),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            settings,
            figure: Model::camera_figure().into_complex(),
            kind,
            shift_held: false,
        };
        camera.update_matrices();
        camera
    }

    /// Orbiting camera placed at `position` around `target`
    pub fn spherical(position: Vector3<f32>, target: Vector3<f32>, settings: CameraSettings) -> Self {
        let offset = position - target;
        let distance = offset.magnitude();
        let theta = if distance > f32::EPSILON {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            FRAC_PI_2
        };
        let phi = offset.z.atan2(offset.x);

        let mut control = SphericalControl {
            radius: SphericalControl::MIN_RADIUS,
            theta: FRAC_PI_2,
            phi: 0.0,
            mouse_sensitivity: SphericalControl::DEFAULT_MOUSE_SENSITIVITY,
            scroll_sensitivity: SphericalControl::DEFAULT_SCROLL_SENSITIVITY,
            rotating: false,
            panning: false,
            initial: (0.0, 0.0, 0.0, target),
        };
        control.set_orbit(distance, theta, phi, settings.render_distance());
        control.initial = (control.radius, control.theta, control.phi, target);

        Self::with_kind(position, target, settings, CameraKind::Spherical(control))
    }

    /// Free-flying camera at `position` facing `target`
    pub fn first_person(position: Vector3<f32>, target: Vector3<f32>, settings: CameraSettings) -> Self {
        let forward = target - position;
        let forward = if forward.magnitude2() > f32::EPSILON {
            forward.normalize()
        } else {
            -Vector3::unit_z()
        };
        let control = FirstPersonControl {
            yaw: forward.z.atan2(forward.x),
            pitch: forward
                .y
                .asin()
                .clamp(-FirstPersonControl::MAX_PITCH, FirstPersonControl::MAX_PITCH),
            speed: FirstPersonControl::DEFAULT_SPEED,
            looking: false,
            keys: MovementKeys::default(),
        };
        Self::with_kind(position, target, settings, CameraKind::FirstPerson(control))
    }

    /// Orthographic camera above `target` on +Z, framing what a perspective
    /// camera at `position` would see
    pub fn two_d(position: Vector3<f32>, target: Vector3<f32>, settings: CameraSettings) -> Self {
        let distance = (position - target)
            .magnitude()
            .clamp(SphericalControl::MIN_RADIUS, settings.render_distance());
        let control = TwoDControl {
            half_height: distance * (settings.fov() * 0.5).tan(),
            distance,
            panning: false,
        };
        Self::with_kind(position, target, settings, CameraKind::TwoD(control))
    }

    /// Camera with a fixed look-at that ignores input
    pub fn fixed(position: Vector3<f32>, target: Vector3<f32>, settings: CameraSettings) -> Self {
        Self::with_kind(position, target, settings, CameraKind::Static)
    }

    /// Builder pattern: Replace the figure shown for this camera
    pub fn with_figure(mut self, figure: ComplexModel) -> Self {
        self.figure = figure;
        self
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    /// Unit vector from the target towards the camera
    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CameraSettings) {
        self.settings = settings;
        if let CameraKind::Spherical(control) = &mut self.kind {
            let (radius, theta, phi) = (control.radius, control.theta, control.phi);
            control.set_orbit(radius, theta, phi, settings.render_distance());
        }
        self.update_matrices();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.settings.aspect_ratio = aspect_ratio;
        self.update_matrices();
    }

    pub fn kind(&self) -> &CameraKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut CameraKind {
        &mut self.kind
    }

    pub fn is_two_d(&self) -> bool {
        matches!(self.kind, CameraKind::TwoD(_))
    }

    pub fn figure(&self) -> &ComplexModel {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut ComplexModel {
        &mut self.figure
    }

    /// Places the figure at the camera, local -Z along the view direction
    pub fn figure_matrix(&self) -> Matrix4<f32> {
        self.view.invert().unwrap_or_else(Matrix4::identity)
    }

    /// Moves the look-at point, keeping the kind's own parameters
    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
        self.update_matrices();
    }

    /// Sets the spherical coordinates of an orbiting camera.
    ///
    /// Radius, θ and φ are clamped the same way mouse input is.
    pub fn set_orbit(&mut self, radius: f32, theta: f32, phi: f32) {
        let render_distance = self.settings.render_distance();
        match &mut self.kind {
            CameraKind::Spherical(control) => {
                control.set_orbit(radius, theta, phi, render_distance);
                self.update_matrices();
            }
            _ => log::debug!("set_orbit ignored on a non-spherical camera"),
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match &mut self.kind {
            CameraKind::Spherical(control) => match button {
                MouseButton::Left => control.rotating = pressed,
                MouseButton::Middle => control.panning = pressed,
                _ => {}
            },
            CameraKind::FirstPerson(control) if button == MouseButton::Left => {
                control.looking = pressed;
            }
            CameraKind::TwoD(control) if button == MouseButton::Left => {
                control.panning = pressed;
            }
            _ => {}
        }
    }

    /// Raw pointer movement in pixels
    pub fn on_mouse_motion(&mut self, delta: (f64, f64)) {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        let render_distance = self.settings.render_distance();

        match &mut self.kind {
            CameraKind::Spherical(control) => {
                if control.rotating {
                    let step = control.mouse_sensitivity.to_radians();
                    let (radius, theta, phi) = (control.radius, control.theta, control.phi);
                    control.set_orbit(radius, theta - dy * step, phi + dx * step, render_distance);
                }
                if control.panning {
                    let scale = control.radius * PAN_PER_PIXEL;
                    self.target += (self.up * dy - self.right * dx) * scale;
                }
                if !(control.rotating || control.panning) {
                    return;
                }
            }
            CameraKind::FirstPerson(control) => {
                if !(control.looking || self.settings.cursor == CursorState::Grabbed) {
                    return;
                }
                let step = self.settings.mouse_sensitivity().to_radians();
                control.yaw = wrap_radians(control.yaw + dx * step);
                control.pitch = (control.pitch - dy * step)
                    .clamp(-FirstPersonControl::MAX_PITCH, FirstPersonControl::MAX_PITCH);
            }
            CameraKind::TwoD(control) => {
                if !control.panning {
                    return;
                }
                let scale = control.half_height * PAN_PER_PIXEL;
                self.target += Vector3::new(-dx, dy, 0.0) * scale;
            }
            CameraKind::Static => return,
        }
        self.update_matrices();
    }

    /// Scroll offset in lines, positive away from the user
    pub fn on_scroll(&mut self, offset: f32) {
        let render_distance = self.settings.render_distance();
        match &mut self.kind {
            CameraKind::Spherical(control) => {
                let (radius, theta, phi) = (control.radius, control.theta, control.phi);
                control.set_orbit(
                    radius - offset * control.scroll_sensitivity,
                    theta,
                    phi,
                    render_distance,
                );
            }
            CameraKind::FirstPerson(_) => {
                let step = (offset * self.settings.wheel_sensitivity()).to_radians();
                let fov = self.settings.fov() - step;
                self.settings.set_fov(fov);
            }
            CameraKind::TwoD(control) => {
                let factor = (-TwoDControl::ZOOM_STEP * offset * self.settings.wheel_sensitivity()).exp();
                control.half_height =
                    (control.half_height * factor).clamp(TwoDControl::MIN_HALF_HEIGHT, render_distance);
            }
            CameraKind::Static => return,
        }
        self.update_matrices();
    }

    pub fn on_key(&mut self, key: KeyCode, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        if matches!(key, KeyCode::ShiftLeft | KeyCode::ShiftRight) {
            self.shift_held = pressed;
        }

        match &mut self.kind {
            CameraKind::Spherical(control) => {
                if key == KeyCode::KeyC && pressed && self.shift_held {
                    log::info!("Resetting camera to its initial orbit");
                    let (radius, theta, phi, target) = control.initial;
                    control.radius = radius;
                    control.theta = theta;
                    control.phi = phi;
                    self.target = target;
                    self.update_matrices();
                }
            }
            CameraKind::FirstPerson(control) => match key {
                KeyCode::KeyW => control.keys.forward = pressed,
                KeyCode::KeyS => control.keys.backward = pressed,
                KeyCode::KeyA => control.keys.left = pressed,
                KeyCode::KeyD => control.keys.right = pressed,
                KeyCode::Space => control.keys.up = pressed,
                KeyCode::ShiftLeft | KeyCode::ShiftRight => control.keys.down = pressed,
                _ => {}
            },
            _ => {}
        }
    }

    /// Applies continuous input such as held movement keys
    pub fn update(&mut self, delta_time: f32) {
        if let CameraKind::FirstPerson(control) = &self.kind {
            let keys = control.keys;
            let axis = |positive: bool, negative: bool| (positive as i8 - negative as i8) as f32;

            let forward = control.forward();
            let velocity = forward * axis(keys.forward, keys.backward)
                + self.right * axis(keys.right, keys.left)
                + Vector3::unit_y() * axis(keys.up, keys.down);

            if velocity.magnitude2() > 0.0 {
                self.position += velocity.normalize() * control.speed * delta_time;
                self.update_matrices();
            }
        }
    }

    /// Recomputes position/target, basis, view and projection from the kind
    fn update_matrices(&mut self) {
        match &self.kind {
            CameraKind::Spherical(control) => {
                self.position = control.offset() + self.target;
            }
            CameraKind::FirstPerson(control) => {
                self.target = self.position + control.forward();
            }
            CameraKind::TwoD(control) => {
                self.position = self.target + Vector3::unit_z() * control.distance;
            }
            CameraKind::Static => {}
        }

        let (direction, right, up) = look_basis(self.position, self.target);
        self.direction = direction;
        self.right = right;
        self.up = up;

        self.view = Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            self.up,
        );

        let near = CameraSettings::DEPTH_NEAR;
        let far = self.settings.render_distance();
        let aspect = self.settings.aspect_ratio;
        self.projection = match &self.kind {
            CameraKind::TwoD(control) => {
                let h = control.half_height;
                OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-h * aspect, h * aspect, -h, h, near, far)
            }
            _ => OPENGL_TO_WGPU_MATRIX * perspective(Rad(self.settings.fov()), aspect, near, far),
        };
    }
}
