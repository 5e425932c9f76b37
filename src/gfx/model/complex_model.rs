use cgmath::{Vector3, Zero};

use crate::gfx::geometry::{RotationAngles, Size};
use crate::gfx::rendering::shader::ShaderKind;
use crate::wgpu_utils::BindGroupLayoutWithDesc;

use super::model_unit::ModelUnit;

/// A group of model units transformed together
///
/// Tracks the accumulated position, size and rotation of the group. Transforms
/// are forwarded to every unit.
#[derive(Debug, Clone)]
pub struct ComplexModel {
    units: Vec<ModelUnit>,
    position: Vector3<f32>,
    size: Size,
    rotation: RotationAngles,
    shader: ShaderKind,
}

impl Default for ComplexModel {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            position: Vector3::zero(),
            size: Size::ONE,
            rotation: RotationAngles::ZERO,
            shader: ShaderKind::Lighted,
        }
    }
}

impl ComplexModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_unit(unit: &ModelUnit) -> Self {
        Self::from_units(std::slice::from_ref(unit))
    }

    pub fn from_units(units: &[ModelUnit]) -> Self {
        Self {
            units: units.to_vec(),
            ..Self::default()
        }
    }

    /// Builder pattern: Select the shader program
    pub fn with_shader(mut self, shader: ShaderKind) -> Self {
        self.shader = shader;
        self
    }

    pub fn add(&mut self, unit: &ModelUnit) {
        self.units.push(unit.clone());
    }

    pub fn remove(&mut self, index: usize) -> Option<ModelUnit> {
        if index < self.units.len() {
            Some(self.units.remove(index))
        } else {
            None
        }
    }

    /// Appends clones of every unit to `target`
    pub fn copy_models_to(&self, target: &mut Vec<ModelUnit>) {
        target.extend(self.units.iter().cloned());
    }

    pub fn clear_models(&mut self) {
        self.units.clear();
    }

    pub fn units(&self) -> &[ModelUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [ModelUnit] {
        &mut self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rotation(&self) -> RotationAngles {
        self.rotation
    }

    pub fn shader(&self) -> ShaderKind {
        self.shader
    }

    pub fn set_shader(&mut self, shader: ShaderKind) {
        self.shader = shader;
    }

    pub fn move_by(&mut self, shift: Vector3<f32>) {
        for unit in &mut self.units {
            unit.move_by(shift);
        }
        self.position += shift;
    }

    pub fn move_to(&mut self, position: Vector3<f32>) {
        let shift = position - self.position;
        self.move_by(shift);
    }

    pub fn scale_by(&mut self, size: Size) {
        for unit in &mut self.units {
            unit.scale_by(size);
        }
        self.size *= size;
    }

    pub fn rotate(&mut self, angles: RotationAngles) {
        for unit in &mut self.units {
            unit.rotate(angles);
        }
        self.rotation += angles;
        self.size.update_after_rotation(angles);
    }

    /// Creates GPU resources for units that do not have them yet
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &BindGroupLayoutWithDesc) {
        for unit in self.units.iter_mut().filter(|unit| !unit.is_gpu_ready()) {
            unit.init_gpu_resources(device, layout);
        }
    }

    pub fn is_gpu_ready(&self) -> bool {
        self.units.iter().all(ModelUnit::is_gpu_ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::material::Material;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    fn cube_unit(name: &str) -> ModelUnit {
        ModelUnit::from_geometry(name, &generate_cube(), Material::default())
    }

    #[test]
    fn test_defaults() {
        let model = ComplexModel::new();
        assert!(model.is_empty());
        assert_eq!(model.position(), Vector3::zero());
        assert_eq!(model.size(), Size::ONE);
        assert_eq!(model.rotation(), RotationAngles::ZERO);
        assert_eq!(model.shader(), ShaderKind::Lighted);
    }

    #[test]
    fn test_add_remove_copy() {
        let unit = cube_unit("A");
        let mut model = ComplexModel::from_unit(&unit);
        model.add(&cube_unit("B"));
        assert_eq!(model.len(), 2);
        assert!(Arc::ptr_eq(model.units()[0].mesh(), unit.mesh()));

        let mut copies = Vec::new();
        model.copy_models_to(&mut copies);
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[1].name, "B");

        let removed = model.remove(0).expect("unit 0 exists");
        assert_eq!(removed.name, "A");
        assert!(model.remove(5).is_none());

        model.clear_models();
        assert!(model.is_empty());
    }

    #[test]
    fn test_transforms_propagate_and_track() {
        let mut model = ComplexModel::from_units(&[cube_unit("A"), cube_unit("B")]);
        model.move_by(Vector3::new(1.0, 0.0, 0.0));
        model.move_to(Vector3::new(0.0, 3.0, 0.0));
        assert_eq!(model.position(), Vector3::new(0.0, 3.0, 0.0));
        for unit in model.units() {
            assert_eq!(unit.translation_matrix().w.truncate(), Vector3::new(0.0, 3.0, 0.0));
        }

        model.scale_by(Size::new(2.0, 1.0, 1.0));
        model.scale_by(Size::uniform(3.0));
        assert_eq!(model.size(), Size::new(6.0, 3.0, 3.0));
    }

    #[test]
    fn test_rotation_updates_size() {
        let mut model = ComplexModel::from_unit(&cube_unit("A"));
        model.scale_by(Size::new(2.0, 1.0, 1.0));
        model.rotate(RotationAngles::new(0.0, 0.0, FRAC_PI_2));

        assert_eq!(model.rotation(), RotationAngles::new(0.0, 0.0, FRAC_PI_2));
        assert!((model.size().x + 1.0).abs() < 1e-5);
        assert!((model.size().y - 2.0).abs() < 1e-5);
    }
}
