//! Point light sources
//!
//! A [`LightSource`] is a complex model (its visible figure, possibly empty)
//! with Phong colours and distance attenuation. Its position is the figure's
//! tracked position, so moving the figure moves the light.

use std::ops::{Deref, DerefMut};

use cgmath::Vector3;

use crate::gfx::geometry::{generate_sphere, Size};
use crate::gfx::model::{ComplexModel, ModelUnit};
use crate::gfx::rendering::shader::ShaderKind;
use crate::gfx::resources::material::{Material, PhongModel};

/// Coefficients of `1 / (q·d² + l·d + c)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightAttenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for LightAttenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl LightAttenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Intensity multiplier at `distance`
    pub fn factor_at(&self, distance: f32) -> f32 {
        1.0 / (self.quadratic * distance * distance + self.linear * distance + self.constant)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LightSource {
    figure: ComplexModel,
    pub phong: PhongModel,
    pub attenuation: LightAttenuation,
}

impl Deref for LightSource {
    type Target = ComplexModel;

    fn deref(&self) -> &ComplexModel {
        &self.figure
    }
}

impl DerefMut for LightSource {
    fn deref_mut(&mut self) -> &mut ComplexModel {
        &mut self.figure
    }
}

impl LightSource {
    const FIGURE_SCALE: f32 = 0.2;

    pub fn new(phong: PhongModel, attenuation: LightAttenuation, figure: ComplexModel) -> Self {
        Self {
            figure: figure.with_shader(ShaderKind::Unlighted),
            phong,
            attenuation,
        }
    }

    /// White light at `position`, shown as a small sphere
    pub fn point(position: Vector3<f32>) -> Self {
        let sphere = ModelUnit::from_geometry(
            "Light",
            &generate_sphere(16, 8),
            Material::default().with_name("Light").with_color(1.0, 1.0, 1.0),
        );
        let mut figure = ComplexModel::from_unit(&sphere);
        figure.scale_by(Size::uniform(Self::FIGURE_SCALE));
        figure.move_by(position);

        Self::new(PhongModel::default(), LightAttenuation::default(), figure)
    }

    /// Builder pattern: Set the light colours
    pub fn with_phong(mut self, phong: PhongModel) -> Self {
        self.phong = phong;
        self
    }

    /// Builder pattern: Set the attenuation coefficients
    pub fn with_attenuation(mut self, attenuation: LightAttenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn figure(&self) -> &ComplexModel {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut ComplexModel {
        &mut self.figure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    #[test]
    fn test_attenuation_factor() {
        let attenuation = LightAttenuation::default();
        assert_eq!(attenuation.factor_at(0.0), 1.0);
        let expected = 1.0 / (0.032 * 100.0 + 0.09 * 10.0 + 1.0);
        assert!((attenuation.factor_at(10.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_default_light_has_no_figure() {
        let light = LightSource::default();
        assert!(light.is_empty());
        assert_eq!(light.position(), Vector3::zero());
        assert_eq!(light.attenuation, LightAttenuation::default());
    }

    #[test]
    fn test_point_light_tracks_position() {
        let mut light = LightSource::point(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(light.len(), 1);
        assert_eq!(light.shader(), ShaderKind::Unlighted);
        assert_eq!(light.position(), Vector3::new(1.0, 2.0, 3.0));

        light.move_by(Vector3::new(0.0, -2.0, 0.0));
        assert_eq!(light.position(), Vector3::new(1.0, 0.0, 3.0));
    }
}
