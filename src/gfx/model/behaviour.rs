//! Time-driven model animation
//!
//! A [`Behaviour`] owns up to three closures that advance a position, a size
//! and a set of rotation angles every frame. The resulting `T · S · R` matrix is
//! applied on top of the model's own transform.
//!
//! ```rust
//! use cgmath::Vector3;
//! use tartan::gfx::geometry::RotationAngles;
//! use tartan::gfx::model::behaviour::Behaviour;
//!
//! let mut spin = Behaviour::preset_rotate(RotationAngles::new(0.0, 1.0, 0.0));
//! spin.update(0.5);
//! assert_eq!(spin.rotation_angles(), RotationAngles::new(0.0, 0.5, 0.0));
//! assert_eq!(spin.position(), Vector3::new(0.0, 0.0, 0.0));
//! ```

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::error::{Result, TartanError};
use crate::gfx::geometry::transform::wrap_radians;
use crate::gfx::geometry::{RotationAngles, Size};

/// `(position, time, delta_time)`
pub type TranslationFn = Box<dyn FnMut(&mut Vector3<f32>, &mut f32, f32)>;
/// `(size, time, delta_time)`
pub type ScalingFn = Box<dyn FnMut(&mut Size, &mut f32, f32)>;
/// `(angles, time, delta_time)`
pub type RotationFn = Box<dyn FnMut(&mut RotationAngles, &mut f32, f32)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationParameters {
    pub shifts: Vector3<f32>,
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParameters {
    pub coefficients: Size,
    pub min: Size,
    pub max: Size,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParameters {
    pub position: Vector3<f32>,
    pub delta_phi: f32,
    pub delta_theta: f32,
}

pub struct Behaviour {
    translation: Option<TranslationFn>,
    scaling: Option<ScalingFn>,
    rotation: Option<RotationFn>,
    position: Vector3<f32>,
    size: Size,
    angles: RotationAngles,
    time: f32,
    translation_matrix: Matrix4<f32>,
    scale_matrix: Matrix4<f32>,
    rotation_matrix: Matrix4<f32>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            translation: None,
            scaling: None,
            rotation: None,
            position: Vector3::zero(),
            size: Size::ONE,
            angles: RotationAngles::ZERO,
            time: 0.0,
            translation_matrix: Matrix4::identity(),
            scale_matrix: Matrix4::identity(),
            rotation_matrix: Matrix4::identity(),
        }
    }
}

impl std::fmt::Debug for Behaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behaviour")
            .field("translation", &self.translation.is_some())
            .field("scaling", &self.scaling.is_some())
            .field("rotation", &self.rotation.is_some())
            .field("position", &self.position)
            .field("size", &self.size)
            .field("angles", &self.angles)
            .field("time", &self.time)
            .finish()
    }
}

impl Behaviour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: TranslationFn) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingFn) -> Self {
        self.scaling = Some(scaling);
        self
    }

    pub fn with_rotation(mut self, rotation: RotationFn) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Runs the closures, advances time and rebuilds the matrices
    pub fn update(&mut self, delta_time: f32) {
        if let Some(translation) = self.translation.as_mut() {
            translation(&mut self.position, &mut self.time, delta_time);
        }
        if let Some(scaling) = self.scaling.as_mut() {
            scaling(&mut self.size, &mut self.time, delta_time);
        }
        if let Some(rotation) = self.rotation.as_mut() {
            rotation(&mut self.angles, &mut self.time, delta_time);
        }
        self.time += delta_time;

        self.translation_matrix = Matrix4::from_translation(self.position);
        self.scale_matrix = Matrix4::from_nonuniform_scale(self.size.x, self.size.y, self.size.z);
        self.rotation_matrix = Matrix4::from_angle_x(Rad(self.angles.x))
            * Matrix4::from_angle_y(Rad(self.angles.y))
            * Matrix4::from_angle_z(Rad(self.angles.z));
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.translation_matrix * self.scale_matrix * self.rotation_matrix
    }

    pub fn translation_matrix(&self) -> Matrix4<f32> {
        self.translation_matrix
    }

    pub fn scale_matrix(&self) -> Matrix4<f32> {
        self.scale_matrix
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        self.rotation_matrix
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rotation_angles(&self) -> RotationAngles {
        self.angles
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Moves back and forth between `min` and `max` at `shifts` units per second.
    ///
    /// Each bound must contain the origin: `min <= 0 <= max` on every axis.
    pub fn linear_translation(
        shifts: Vector3<f32>,
        min: Vector3<f32>,
        max: Vector3<f32>,
    ) -> Result<TranslationFn> {
        check_position_bounds(min, max)?;
        let mut direction = Vector3::new(1.0, 1.0, 1.0);

        Ok(Box::new(move |position: &mut Vector3<f32>, _time: &mut f32, delta_time: f32| {
            *position += mul(direction, shifts) * delta_time;
            bounce_vector(position, &mut direction, min, max);
        }))
    }

    /// Like [`Behaviour::linear_translation`] but the step follows
    /// `shifts · sin(π/2 · (t mod 4))` and ignores the frame delta.
    pub fn sinusoidal_translation(
        shifts: Vector3<f32>,
        min: Vector3<f32>,
        max: Vector3<f32>,
    ) -> Result<TranslationFn> {
        check_position_bounds(min, max)?;
        let mut direction = Vector3::new(1.0, 1.0, 1.0);

        Ok(Box::new(move |position: &mut Vector3<f32>, time: &mut f32, _delta_time: f32| {
            let wave = (FRAC_PI_2 * (*time % 4.0)).sin();
            *position += mul(direction, shifts) * wave;
            bounce_vector(position, &mut direction, min, max);
        }))
    }

    /// Orbits the origin on the sphere through `position`, advancing the
    /// azimuth by `delta_phi` and the polar angle by `delta_theta` per second.
    pub fn spherical_translation(
        position: Vector3<f32>,
        delta_phi: f32,
        delta_theta: f32,
    ) -> Result<TranslationFn> {
        if position == Vector3::zero() {
            return Err(TartanError::InvalidBehaviour(
                "orbit position must not be the origin".to_string(),
            ));
        }

        let r = position.magnitude();
        let mut theta = (position.y / r).clamp(-1.0, 1.0).acos();
        let mut phi = wrap_radians(position.z.atan2(position.x));
        let mut theta_direction = 1.0f32;

        Ok(Box::new(move |position: &mut Vector3<f32>, _time: &mut f32, delta_time: f32| {
            phi = wrap_radians(phi + delta_phi * delta_time);
            theta += theta_direction * delta_theta * delta_time;

            // Crossing a pole continues on the opposite meridian
            if theta < 0.0 {
                theta = -theta;
                phi = wrap_radians(phi + PI);
                theta_direction = -theta_direction;
            } else if theta > PI {
                theta = TAU - theta;
                phi = wrap_radians(phi + PI);
                theta_direction = -theta_direction;
            }

            *position = Vector3::new(
                r * theta.sin() * phi.cos(),
                r * theta.cos(),
                r * theta.sin() * phi.sin(),
            );
        }))
    }

    /// Grows and shrinks between `min` and `max` at `coefficients` per second.
    ///
    /// `min` must lie in `[0, 1]` and `max` must be at least 1 on every axis.
    pub fn scaling(coefficients: Size, min: Size, max: Size) -> Result<ScalingFn> {
        let min_ok = [min.x, min.y, min.z].iter().all(|v| (0.0..=1.0).contains(v));
        if !min_ok {
            return Err(TartanError::InvalidBehaviour(format!(
                "minimum size {:?} must lie in [0, 1]",
                min
            )));
        }
        if max.x < 1.0 || max.y < 1.0 || max.z < 1.0 {
            return Err(TartanError::InvalidBehaviour(format!(
                "maximum size {:?} must be at least 1",
                max
            )));
        }

        let mut direction = Size::ONE;
        Ok(Box::new(move |size: &mut Size, _time: &mut f32, delta_time: f32| {
            *size += direction * coefficients * delta_time;
            bounce(&mut size.x, &mut direction.x, min.x, max.x);
            bounce(&mut size.y, &mut direction.y, min.y, max.y);
            bounce(&mut size.z, &mut direction.z, min.z, max.z);
        }))
    }

    /// Spins at `angles` radians per second
    pub fn rotation(angles: RotationAngles) -> RotationFn {
        Box::new(move |current: &mut RotationAngles, _time: &mut f32, delta_time: f32| {
            *current += angles * delta_time;
        })
    }

    pub fn preset_translate_scale_rotate(
        translation: TranslationParameters,
        scaling: ScalingParameters,
        angles: RotationAngles,
    ) -> Result<Behaviour> {
        Ok(Behaviour::new()
            .with_translation(Self::linear_translation(
                translation.shifts,
                translation.min,
                translation.max,
            )?)
            .with_scaling(Self::scaling(scaling.coefficients, scaling.min, scaling.max)?)
            .with_rotation(Self::rotation(angles)))
    }

    pub fn preset_translate_rotate(
        translation: TranslationParameters,
        angles: RotationAngles,
    ) -> Result<Behaviour> {
        Ok(Behaviour::new()
            .with_translation(Self::linear_translation(
                translation.shifts,
                translation.min,
                translation.max,
            )?)
            .with_rotation(Self::rotation(angles)))
    }

    pub fn preset_rotate(angles: RotationAngles) -> Behaviour {
        Behaviour::new().with_rotation(Self::rotation(angles))
    }

    pub fn preset_orbit(orbit: OrbitParameters) -> Result<Behaviour> {
        Ok(Behaviour::new().with_translation(Self::spherical_translation(
            orbit.position,
            orbit.delta_phi,
            orbit.delta_theta,
        )?))
    }
}

fn check_position_bounds(min: Vector3<f32>, max: Vector3<f32>) -> Result<()> {
    if min.x > 0.0 || min.y > 0.0 || min.z > 0.0 {
        return Err(TartanError::InvalidBehaviour(format!(
            "minimum position {:?} must not be positive",
            min
        )));
    }
    if max.x < 0.0 || max.y < 0.0 || max.z < 0.0 {
        return Err(TartanError::InvalidBehaviour(format!(
            "maximum position {:?} must not be negative",
            max
        )));
    }
    Ok(())
}

fn mul(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x * b.x, a.y * b.y, a.z * b.z)
}

/// Clamps `value` into `[min, max]`, reversing `direction` at either end
fn bounce(value: &mut f32, direction: &mut f32, min: f32, max: f32) {
    if *value >= max {
        *value = max;
        *direction = -1.0;
    }
    if *value <= min {
        *value = min;
        *direction = 1.0;
    }
}

fn bounce_vector(
    position: &mut Vector3<f32>,
    direction: &mut Vector3<f32>,
    min: Vector3<f32>,
    max: Vector3<f32>,
) {
    bounce(&mut position.x, &mut direction.x, min.x, max.x);
    bounce(&mut position.y, &mut direction.y, min.y, max.y);
    bounce(&mut position.z, &mut direction.z, min.z, max.z);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_new_behaviour_is_identity() {
        let mut behaviour = Behaviour::new();
        assert_eq!(behaviour.matrix(), Matrix4::identity());
        behaviour.update(1.0);
        assert_eq!(behaviour.size(), Size::ONE);
        assert_eq!(behaviour.matrix(), Matrix4::identity());
        assert_eq!(behaviour.time(), 1.0);
    }

    #[test]
    fn test_linear_translation_bounces() {
        let translate = Behaviour::linear_translation(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        )
        .expect("valid bounds");
        let mut behaviour = Behaviour::new().with_translation(translate);

        behaviour.update(0.75);
        assert!(approx(behaviour.position().x, 0.75));
        behaviour.update(0.5);
        assert!(approx(behaviour.position().x, 1.0), "clamped at max");
        behaviour.update(0.5);
        assert!(approx(behaviour.position().x, 0.5), "moving back");
    }

    #[test]
    fn test_translation_bounds_are_checked() {
        let bad_min = Behaviour::linear_translation(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        assert!(matches!(bad_min, Err(TartanError::InvalidBehaviour(_))));

        let bad_max = Behaviour::sinusoidal_translation(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::zero(),
            Vector3::new(1.0, -1.0, 1.0),
        );
        assert!(matches!(bad_max, Err(TartanError::InvalidBehaviour(_))));
    }

    #[test]
    fn test_sinusoidal_step_follows_time() {
        let translate = Behaviour::sinusoidal_translation(
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -10.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
        )
        .expect("valid bounds");
        let mut behaviour = Behaviour::new().with_translation(translate);

        // sin(0) at t = 0
        behaviour.update(1.0);
        assert!(approx(behaviour.position().y, 0.0));
        // sin(π/2) at t = 1
        behaviour.update(1.0);
        assert!(approx(behaviour.position().y, 1.0));
    }

    #[test]
    fn test_spherical_translation_keeps_radius() {
        let orbit = OrbitParameters {
            position: Vector3::new(3.0, 0.0, 4.0),
            delta_phi: 1.0,
            delta_theta: 2.0,
        };
        let mut behaviour = Behaviour::preset_orbit(orbit).expect("non-zero position");
        for _ in 0..50 {
            behaviour.update(0.1);
            assert!(approx(behaviour.position().magnitude(), 5.0));
        }
    }

    #[test]
    fn test_spherical_translation_starts_at_given_point() {
        let translate = Behaviour::spherical_translation(Vector3::new(-2.0, 1.0, 0.0), 0.0, 0.0)
            .expect("non-zero position");
        let mut behaviour = Behaviour::new().with_translation(translate);
        behaviour.update(0.1);
        let p = behaviour.position();
        assert!(approx(p.x, -2.0) && approx(p.y, 1.0) && approx(p.z, 0.0), "{:?}", p);
    }

    #[test]
    fn test_spherical_translation_rejects_origin() {
        let result = Behaviour::spherical_translation(Vector3::zero(), 1.0, 1.0);
        assert!(matches!(result, Err(TartanError::InvalidBehaviour(_))));
    }

    #[test]
    fn test_scaling_checks_and_bounces() {
        assert!(Behaviour::scaling(Size::ONE, Size::uniform(1.5), Size::uniform(2.0)).is_err());
        assert!(Behaviour::scaling(Size::ONE, Size::uniform(0.5), Size::uniform(0.9)).is_err());

        let scale = Behaviour::scaling(Size::uniform(1.0), Size::uniform(0.5), Size::uniform(2.0))
            .expect("valid bounds");
        let mut behaviour = Behaviour::new().with_scaling(scale);
        behaviour.update(2.0);
        assert_eq!(behaviour.size(), Size::uniform(2.0));
        behaviour.update(0.5);
        assert_eq!(behaviour.size(), Size::uniform(1.5));
    }

    #[test]
    fn test_matrix_composes_translate_scale_rotate() {
        let translation = TranslationParameters {
            shifts: Vector3::new(1.0, 0.0, 0.0),
            min: Vector3::new(-5.0, 0.0, 0.0),
            max: Vector3::new(5.0, 0.0, 0.0),
        };
        let scaling = ScalingParameters {
            coefficients: Size::new(1.0, 0.0, 0.0),
            min: Size::uniform(0.5),
            max: Size::uniform(3.0),
        };
        let mut behaviour = Behaviour::preset_translate_scale_rotate(
            translation,
            scaling,
            RotationAngles::new(0.0, 0.0, FRAC_PI_2),
        )
        .expect("valid parameters");
        behaviour.update(1.0);

        assert_eq!(
            behaviour.matrix(),
            behaviour.translation_matrix() * behaviour.scale_matrix() * behaviour.rotation_matrix()
        );
        assert_eq!(behaviour.size(), Size::new(2.0, 1.0, 1.0));
        assert!(approx(behaviour.matrix().w.x, 1.0));
    }
}
