//! Shader programs and the uniform dispatch protocol
//!
//! Every drawable goes through one of two programs. A [`ShaderKind`] selects the
//! WGSL source, the pipeline and a [`UniformDispatch`] table describing which
//! uniforms the program consumes. The lighted program takes the full Phong
//! material and up to [`MAX_LIGHT_SOURCES`] lights; the unlighted one only
//! needs a flat colour.
//!
//! Bind group 0 holds the per-frame [`FrameUniform`], bind group 1 the
//! per-unit [`ModelUniform`].

use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::camera::{camera_utils::convert_matrix4_to_array, Camera};
use crate::gfx::light::LightSource;
use crate::gfx::model::ModelUnit;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

/// Upper bound on light sources a scene may hold
pub const MAX_LIGHT_SOURCES: usize = 32;

pub const LIGHTED_SHADER: &str = include_str!("lighted.wgsl");
pub const UNLIGHTED_SHADER: &str = include_str!("unlighted.wgsl");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Lighted,
    Unlighted,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 2] = [ShaderKind::Lighted, ShaderKind::Unlighted];

    /// Name shared by the shader module and its pipeline
    pub fn label(self) -> &'static str {
        match self {
            ShaderKind::Lighted => "Lighted",
            ShaderKind::Unlighted => "Unlighted",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ShaderKind::Lighted => LIGHTED_SHADER,
            ShaderKind::Unlighted => UNLIGHTED_SHADER,
        }
    }

    pub fn dispatch(self) -> &'static UniformDispatch {
        match self {
            ShaderKind::Lighted => &UniformDispatch::LIGHTED,
            ShaderKind::Unlighted => &UniformDispatch::UNLIGHTED,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic
    pub attenuation: [f32; 4],
}

/// Per-frame data: camera matrices and light sources.
///
/// `light_count` is padded to 16 bytes so the light array starts on a
/// uniform-buffer array boundary.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_count: u32,
    _padding: [u32; 3],
    pub lights: [LightUniform; MAX_LIGHT_SOURCES],
}

impl Default for FrameUniform {
    fn default() -> Self {
        let identity = convert_matrix4_to_array(Matrix4::identity());
        Self {
            view: identity,
            projection: identity,
            ..bytemuck::Zeroable::zeroed()
        }
    }
}

/// Per-unit data: world matrix and material
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    /// Flat colour in the unlighted program
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub transparency: f32,
    _padding: [f32; 2],
}

impl Default for ModelUniform {
    fn default() -> Self {
        Self {
            model: convert_matrix4_to_array(Matrix4::identity()),
            ..bytemuck::Zeroable::zeroed()
        }
    }
}

fn extend(v: [f32; 3], w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

/// Functions a program uses to fill its uniforms. `None` means the program
/// has no such inputs.
pub struct UniformDispatch {
    pub use_camera: Option<fn(&mut FrameUniform, &Camera)>,
    pub use_model_unit: Option<fn(&ModelUnit, Matrix4<f32>) -> ModelUniform>,
    pub use_light_sources: Option<fn(&mut FrameUniform, &[&LightSource])>,
}

impl UniformDispatch {
    pub const LIGHTED: UniformDispatch = UniformDispatch {
        use_camera: Some(lighted_camera),
        use_model_unit: Some(lighted_model_unit),
        use_light_sources: Some(lighted_light_sources),
    };

    pub const UNLIGHTED: UniformDispatch = UniformDispatch {
        use_camera: Some(unlighted_camera),
        use_model_unit: Some(unlighted_model_unit),
        use_light_sources: None,
    };
}

fn unlighted_camera(frame: &mut FrameUniform, camera: &Camera) {
    frame.view = convert_matrix4_to_array(camera.view_matrix());
    frame.projection = convert_matrix4_to_array(camera.projection_matrix());
}

fn lighted_camera(frame: &mut FrameUniform, camera: &Camera) {
    unlighted_camera(frame, camera);
    let position = camera.position();
    frame.camera_position = [position.x, position.y, position.z, 1.0];
}

fn lighted_model_unit(unit: &ModelUnit, parent: Matrix4<f32>) -> ModelUniform {
    let phong = &unit.material.phong;
    ModelUniform {
        model: convert_matrix4_to_array(parent * unit.model_matrix()),
        ambient: extend(phong.ambient, 1.0),
        diffuse: extend(phong.diffuse, 1.0),
        specular: extend(phong.specular, 1.0),
        shininess: phong.shininess(),
        transparency: unit.material.transparency(),
        ..ModelUniform::default()
    }
}

fn unlighted_model_unit(unit: &ModelUnit, parent: Matrix4<f32>) -> ModelUniform {
    ModelUniform {
        model: convert_matrix4_to_array(parent * unit.model_matrix()),
        diffuse: extend(unit.material.phong.diffuse, 1.0),
        transparency: unit.material.transparency(),
        ..ModelUniform::default()
    }
}

fn lighted_light_sources(frame: &mut FrameUniform, lights: &[&LightSource]) {
    if lights.len() > MAX_LIGHT_SOURCES {
        log::warn!(
            "{} light sources given, only the first {} are used",
            lights.len(),
            MAX_LIGHT_SOURCES
        );
    }

    let count = lights.len().min(MAX_LIGHT_SOURCES);
    for (slot, light) in frame.lights.iter_mut().zip(lights.iter().take(count)) {
        let position = light.position();
        let attenuation = light.attenuation;
        *slot = LightUniform {
            position: [position.x, position.y, position.z, 1.0],
            ambient: extend(light.phong.ambient, 1.0),
            diffuse: extend(light.phong.diffuse, 1.0),
            specular: extend(light.phong.specular, 1.0),
            attenuation: [
                attenuation.constant,
                attenuation.linear,
                attenuation.quadratic,
                0.0,
            ],
        };
    }
    frame.light_count = count as u32;
}

/// Bind group layouts shared by both programs
pub struct ShaderLayouts {
    pub frame: BindGroupLayoutWithDesc,
    pub model: BindGroupLayoutWithDesc,
}

impl ShaderLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_sized::<FrameUniform>())
            .create(device, "Frame Bind Group Layout");
        let model = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_sized::<ModelUniform>())
            .create(device, "Model Bind Group Layout");
        Self { frame, model }
    }
}

/// One program's frame uniforms and the dispatch that fills them
pub struct ShaderProgram {
    kind: ShaderKind,
    frame: FrameUniform,
    frame_buffer: UniformBuffer<FrameUniform>,
    frame_bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    pub fn new(device: &wgpu::Device, kind: ShaderKind, layouts: &ShaderLayouts) -> Self {
        let frame = FrameUniform::default();
        let frame_buffer = UniformBuffer::new_with_data(device, &frame);
        let frame_bind_group = BindGroupBuilder::new(&layouts.frame)
            .resource(frame_buffer.binding_resource())
            .create(device, &format!("{} Frame Bind Group", kind.label()));

        Self {
            kind,
            frame,
            frame_buffer,
            frame_bind_group,
        }
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn use_camera(&mut self, camera: &Camera) {
        if let Some(use_camera) = self.kind.dispatch().use_camera {
            use_camera(&mut self.frame, camera);
        }
    }

    pub fn use_light_sources(&mut self, lights: &[&LightSource]) {
        if let Some(use_light_sources) = self.kind.dispatch().use_light_sources {
            use_light_sources(&mut self.frame, lights);
        }
    }

    /// Uniforms for drawing `unit` under `parent`
    pub fn model_uniform(&self, unit: &ModelUnit, parent: Matrix4<f32>) -> ModelUniform {
        match self.kind.dispatch().use_model_unit {
            Some(use_model_unit) => use_model_unit(unit, parent),
            None => ModelUniform::default(),
        }
    }

    /// Pushes the accumulated frame uniforms to the GPU
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        self.frame_buffer.update_content(queue, self.frame);
    }

    pub fn frame_bind_group(&self) -> &wgpu::BindGroup {
        &self.frame_bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraSettings;
    use crate::gfx::geometry::generate_triangle;
    use crate::gfx::resources::material::{Material, PhongModel};
    use cgmath::Vector3;

    fn red_unit() -> ModelUnit {
        let material = Material::default()
            .with_color(1.0, 0.0, 0.0)
            .with_transparency(0.25);
        ModelUnit::from_geometry("Tri", &generate_triangle(), material)
    }

    #[test]
    fn test_uniform_sizes_respect_alignment() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(std::mem::size_of::<ModelUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::offset_of!(FrameUniform, lights), 160);
    }

    #[test]
    fn test_lighted_model_dispatch_carries_material() {
        let unit = red_unit();
        let parent = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let uniform = (UniformDispatch::LIGHTED.use_model_unit.unwrap())(&unit, parent);

        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniform.specular, [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(uniform.shininess, PhongModel::DEFAULT_SHININESS);
        assert_eq!(uniform.transparency, 0.25);
    }

    #[test]
    fn test_unlighted_model_dispatch_is_flat_colour() {
        let unit = red_unit();
        let uniform = (UniformDispatch::UNLIGHTED.use_model_unit.unwrap())(&unit, Matrix4::identity());
        assert_eq!(uniform.diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniform.ambient, [0.0; 4]);
        assert_eq!(uniform.shininess, 0.0);
        assert_eq!(uniform.transparency, 0.25);
    }

    #[test]
    fn test_unlighted_has_no_light_dispatch() {
        assert!(UniformDispatch::UNLIGHTED.use_light_sources.is_none());
        assert!(UniformDispatch::LIGHTED.use_light_sources.is_some());
    }

    #[test]
    fn test_light_dispatch_fills_slots() {
        let a = LightSource::point(Vector3::new(1.0, 0.0, 0.0));
        let b = LightSource::point(Vector3::new(0.0, 5.0, 0.0));
        let mut frame = FrameUniform::default();
        (UniformDispatch::LIGHTED.use_light_sources.unwrap())(&mut frame, &[&a, &b]);

        assert_eq!(frame.light_count, 2);
        assert_eq!(frame.lights[1].position, [0.0, 5.0, 0.0, 1.0]);
        assert_eq!(frame.lights[0].attenuation, [1.0, 0.09, 0.032, 0.0]);
        assert_eq!(frame.lights[2], bytemuck::Zeroable::zeroed());
    }

    #[test]
    fn test_camera_dispatch() {
        let camera = Camera::spherical(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(0.0, 0.0, 0.0),
            CameraSettings::default(),
        );
        let mut lighted = FrameUniform::default();
        (UniformDispatch::LIGHTED.use_camera.unwrap())(&mut lighted, &camera);
        let p = camera.position();
        assert_eq!(lighted.camera_position, [p.x, p.y, p.z, 1.0]);
        assert_eq!(lighted.view, convert_matrix4_to_array(camera.view_matrix()));

        let mut unlighted = FrameUniform::default();
        (UniformDispatch::UNLIGHTED.use_camera.unwrap())(&mut unlighted, &camera);
        assert_eq!(unlighted.camera_position, [0.0; 4]);
        assert_eq!(unlighted.projection, lighted.projection);
    }
}
