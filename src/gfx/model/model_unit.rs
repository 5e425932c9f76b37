use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::geometry::{compute_vertex_normals, GeometryData, RotationAngles, Size};
use crate::gfx::rendering::shader::ModelUniform;
use crate::gfx::resources::material::Material;
use crate::gfx::resources::obj_file::{FaceVertex, ObjFileData, DEFAULT_OBJECT_NAME};
use crate::gfx::scene::vertex::Vertex3D;
use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, IndexBuffer, UniformBuffer, VertexBuffer};

/// Vertex and index buffers of an uploaded mesh
pub struct GpuMesh {
    pub vertex_buffer: VertexBuffer,
    pub index_buffer: IndexBuffer,
}

/// Immutable triangle mesh shared between clones of a unit
///
/// GPU buffers are created on first upload and reused afterwards.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    gpu: OnceLock<GpuMesh>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            gpu: OnceLock::new(),
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        Self::new(geometry.to_vertices(), geometry.indices.clone())
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Creates the GPU buffers unless another clone already did
    pub fn upload(&self, device: &wgpu::Device, label: &str) -> &GpuMesh {
        self.gpu.get_or_init(|| {
            log::debug!(
                "Uploading mesh '{}': {} vertices, {} triangles",
                label,
                self.vertices.len(),
                self.indices.len() / 3
            );
            GpuMesh {
                vertex_buffer: VertexBuffer::new(device, label, &self.vertices),
                index_buffer: IndexBuffer::new(device, label, &self.indices),
            }
        })
    }

    pub fn gpu(&self) -> Option<&GpuMesh> {
        self.gpu.get()
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("uploaded", &self.gpu.get().is_some())
            .finish()
    }
}

/// Per-unit uniform buffer and its bind group
struct UnitGpuResources {
    uniform: UniformBuffer<ModelUniform>,
    bind_group: wgpu::BindGroup,
}

/// A single mesh with one material and its own transform
///
/// The drawn matrix is `T · S · R`. Clones share the mesh but get their own
/// uniform buffer on the next [`ModelUnit::init_gpu_resources`].
pub struct ModelUnit {
    pub name: String,
    pub material: Material,
    mesh: Arc<Mesh>,
    translation: Matrix4<f32>,
    scale: Matrix4<f32>,
    rotation: Matrix4<f32>,
    gpu: Option<UnitGpuResources>,
}

impl Clone for ModelUnit {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            material: self.material.clone(),
            mesh: Arc::clone(&self.mesh),
            translation: self.translation,
            scale: self.scale,
            rotation: self.rotation,
            gpu: None,
        }
    }
}

impl std::fmt::Debug for ModelUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelUnit")
            .field("name", &self.name)
            .field("material", &self.material.name)
            .field("mesh", &self.mesh)
            .finish()
    }
}

impl ModelUnit {
    pub fn new(name: &str, mesh: Arc<Mesh>, material: Material) -> Self {
        let name = if name.is_empty() { DEFAULT_OBJECT_NAME } else { name };
        Self {
            name: name.to_string(),
            material,
            mesh,
            translation: Matrix4::identity(),
            scale: Matrix4::identity(),
            rotation: Matrix4::identity(),
            gpu: None,
        }
    }

    pub fn from_geometry(name: &str, geometry: &GeometryData, material: Material) -> Self {
        Self::new(name, Arc::new(Mesh::from_geometry(geometry)), material)
    }

    /// Builds a unit from one parsed OBJ object
    ///
    /// Each distinct `(v, vt, vn)` corner becomes one vertex. Corners without a
    /// texture coordinate get `(0, 0)`; if any corner lacks a normal, normals are
    /// recomputed from the faces.
    pub fn from_obj(data: &ObjFileData, material: Material) -> Self {
        let mut lookup: HashMap<FaceVertex, u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut tex_coords = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::with_capacity(data.faces.len() * 3);
        let mut all_normals = true;

        for face in &data.faces {
            for corner in face {
                let index = *lookup.entry(*corner).or_insert_with(|| {
                    positions.push(data.vertices[corner.position]);
                    tex_coords.push(corner.tex_coord.map_or([0.0, 0.0], |t| data.tex_coords[t]));
                    match corner.normal {
                        Some(n) => normals.push(data.normals[n]),
                        None => {
                            all_normals = false;
                            normals.push([0.0, 0.0, 0.0]);
                        }
                    }
                    positions.len() as u32 - 1
                });
                indices.push(index);
            }
        }

        if !all_normals {
            log::debug!("OBJ object '{}' lacks normals, computing them", data.name);
            normals = compute_vertex_normals(&positions, &indices);
        }

        let vertices = positions
            .iter()
            .zip(normals.iter())
            .zip(tex_coords.iter())
            .map(|((&position, &normal), &tex_coords)| Vertex3D {
                position,
                normal,
                tex_coords,
            })
            .collect();

        Self::new(&data.name, Arc::new(Mesh::new(vertices, indices)), material)
    }

    /// Object data with the unit's transform applied to the geometry
    pub fn to_obj_data(&self) -> ObjFileData {
        let model = self.model_matrix();
        let linear = Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate());
        let normal_matrix = linear.invert().map(|m| m.transpose()).unwrap_or(linear);

        let mut data = ObjFileData {
            name: self.name.clone(),
            material_name: self.material.name.clone(),
            ..Default::default()
        };

        for vertex in self.mesh.vertices() {
            let p = model * Vector4::new(vertex.position[0], vertex.position[1], vertex.position[2], 1.0);
            data.vertices.push([p.x, p.y, p.z]);
            data.tex_coords.push(vertex.tex_coords);

            let n = normal_matrix * Vector3::from(vertex.normal);
            let length = (n.x * n.x + n.y * n.y + n.z * n.z).sqrt();
            let n = if length > f32::EPSILON { n / length } else { n };
            data.normals.push([n.x, n.y, n.z]);
        }

        for triangle in self.mesh.indices().chunks_exact(3) {
            let corner = |i: u32| FaceVertex {
                position: i as usize,
                tex_coord: Some(i as usize),
                normal: Some(i as usize),
            };
            data.faces.push([corner(triangle[0]), corner(triangle[1]), corner(triangle[2])]);
        }

        data
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn translation_matrix(&self) -> Matrix4<f32> {
        self.translation
    }

    pub fn scale_matrix(&self) -> Matrix4<f32> {
        self.scale
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        self.rotation
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.translation * self.scale * self.rotation
    }

    pub fn move_by(&mut self, shift: Vector3<f32>) {
        self.translation = self.translation * Matrix4::from_translation(shift);
    }

    pub fn scale_by(&mut self, size: Size) {
        self.scale = self.scale * Matrix4::from_nonuniform_scale(size.x, size.y, size.z);
    }

    /// Applies rotations about X, then Y, then Z
    pub fn rotate(&mut self, angles: RotationAngles) {
        self.rotation = self.rotation
            * Matrix4::from_angle_x(cgmath::Rad(angles.x))
            * Matrix4::from_angle_y(cgmath::Rad(angles.y))
            * Matrix4::from_angle_z(cgmath::Rad(angles.z));
    }

    pub fn reset_transform(&mut self) {
        self.translation = Matrix4::identity();
        self.scale = Matrix4::identity();
        self.rotation = Matrix4::identity();
    }

    /// Uploads the shared mesh and creates this unit's uniform buffer
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &BindGroupLayoutWithDesc) {
        self.mesh.upload(device, &self.name);

        let uniform = UniformBuffer::new_with_data(device, &ModelUniform::default());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("{} Model Bind Group", self.name));

        self.gpu = Some(UnitGpuResources {
            uniform,
            bind_group,
        });
    }

    pub fn is_gpu_ready(&self) -> bool {
        self.gpu.is_some() && self.mesh.gpu().is_some()
    }

    /// Writes this frame's uniforms; a no-op before GPU initialisation
    pub fn write_uniform(&mut self, queue: &wgpu::Queue, uniform: ModelUniform) {
        if let Some(gpu) = &mut self.gpu {
            gpu.uniform.update_content(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use cgmath::{Point3, Transform};
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(actual: Point3<f32>, expected: Point3<f32>) {
        let d = actual - expected;
        assert!(
            d.x.abs() < 1e-6 && d.y.abs() < 1e-6 && d.z.abs() < 1e-6,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    fn quad_obj(with_normals: bool) -> ObjFileData {
        let normal = |n| if with_normals { Some(n) } else { None };
        let fv = |p, t| FaceVertex {
            position: p,
            tex_coord: Some(t),
            normal: normal(0),
        };
        ObjFileData {
            name: "Quad".to_string(),
            material_name: "M".to_string(),
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            normals: if with_normals { vec![[0.0, 0.0, 1.0]] } else { vec![] },
            faces: vec![[fv(0, 0), fv(1, 1), fv(2, 2)], [fv(0, 0), fv(2, 2), fv(3, 3)]],
        }
    }

    #[test]
    fn test_from_obj_deduplicates_corners() {
        let unit = ModelUnit::from_obj(&quad_obj(true), Material::default());
        assert_eq!(unit.name, "Quad");
        assert_eq!(unit.mesh().vertices().len(), 4);
        assert_eq!(unit.mesh().indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(unit.mesh().vertices()[2].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn test_from_obj_computes_missing_normals() {
        let unit = ModelUnit::from_obj(&quad_obj(false), Material::default());
        for vertex in unit.mesh().vertices() {
            assert!((vertex.normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_model_matrix_is_translate_scale_rotate() {
        let mut unit = ModelUnit::from_geometry("Cube", &generate_cube(), Material::default());
        unit.rotate(RotationAngles::new(0.0, 0.0, FRAC_PI_2));
        unit.scale_by(Size::new(2.0, 1.0, 1.0));
        unit.move_by(Vector3::new(0.0, 0.0, 5.0));

        // (1,0,0) -> rotated to (0,1,0) -> scaled (x only) -> translated
        let p = unit.model_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_close(p, Point3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_rotate_about_z_uses_z_axis() {
        let mut unit = ModelUnit::from_geometry("Cube", &generate_cube(), Material::default());
        unit.rotate(RotationAngles::new(0.0, 0.0, FRAC_PI_2));
        let p = unit.rotation_matrix().transform_point(Point3::new(0.0, 0.0, 1.0));
        assert_close(p, Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_clone_shares_mesh() {
        let unit = ModelUnit::from_geometry("", &generate_cube(), Material::default());
        assert_eq!(unit.name, DEFAULT_OBJECT_NAME);
        let copy = unit.clone();
        assert!(Arc::ptr_eq(unit.mesh(), copy.mesh()));
        assert!(!copy.is_gpu_ready());
    }

    #[test]
    fn test_obj_data_bakes_transform() {
        let mut unit = ModelUnit::from_obj(&quad_obj(true), Material::default().with_name("M"));
        unit.move_by(Vector3::new(0.0, 2.0, 0.0));
        let data = unit.to_obj_data();
        assert_eq!(data.material_name, "M");
        assert_eq!(data.vertices[0], [0.0, 2.0, 0.0]);
        assert_eq!(data.faces.len(), 2);
        assert_eq!(data.normals[0], [0.0, 0.0, 1.0]);
    }
}
