//! # Geometry
//!
//! Procedural primitive shapes, the transform bookkeeping types used by composite
//! models, and normal generation for meshes that arrive without normals.
//!
//! ## Supported Primitives
//!
//! - **Cube**, **Square**, **Triangle**, **Circle**
//! - **Sphere**, **Cylinder**, **Cone**, **Torus**
//! - **Tetrahedron**, **Octahedron**, **Icosahedron**
//! - **Camera body** (figure used to show cameras inside a scene)
//!
//! All shapes are Y-up and centred on the origin.
//!
//! ## Usage
//!
//! ```rust
//! use tartan::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube();
//! let sphere = generate_sphere(32, 16);
//! assert_eq!(cube.triangle_count(), 12);
//! assert!(sphere.vertex_count() > 0);
//! ```

pub mod primitives;
pub mod transform;

pub use primitives::*;
pub use transform::{RotationAngles, Size};

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry ready to be turned into a mesh
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index
    pub(crate) fn push_vertex(
        &mut self,
        position: [f32; 3],
        normal: [f32; 3],
        tex_coords: [f32; 2],
    ) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coords);
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Interleaves positions, normals and texture coordinates into GPU vertices
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

/// Computes smooth per-vertex normals by averaging the face normals of every
/// triangle that touches a vertex.
///
/// Vertices not referenced by any triangle get a zero normal.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let (v0, v1, v2) = (positions[i0], positions[i1], positions[i2]);

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for index in [i0, i1, i2] {
            for axis in 0..3 {
                normals[index][axis] += face_normal[axis];
            }
        }
    }

    for normal in normals.iter_mut() {
        let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if length > f32::EPSILON {
            normal.iter_mut().for_each(|c| *c /= length);
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_of_flat_triangle_point_up() {
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        for normal in normals {
            assert!((normal[1] - 1.0).abs() < 1e-6, "{:?}", normal);
        }
    }

    #[test]
    fn test_unreferenced_vertex_keeps_zero_normal() {
        let positions = [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [5.0, 5.0, 5.0],
        ];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_to_vertices_fills_missing_attributes() {
        let mut data = GeometryData::new();
        data.vertices.push([1.0, 2.0, 3.0]);
        let vertices = data.to_vertices();
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
    }
}
