//! # Primitive Shape Generation
//!
//! Generators for the built-in figures. Every shape is Y-up, centred on the
//! origin, and wound counter-clockwise when seen from outside.

use super::GeometryData;
use cgmath::{InnerSpace, Matrix3, Rad, SquareMatrix, Vector3};
use std::f32::consts::{PI, TAU};

/// Unit cube with vertices from -0.5 to 0.5 on all axes.
///
/// Each face gets its own four vertices so normals stay flat.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    // (normal, u axis, v axis) with u x v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    for (normal, u, v) in faces {
        let corner = |a: f32, b: f32| {
            [
                normal[0] * 0.5 + u[0] * (a - 0.5) + v[0] * (b - 0.5),
                normal[1] * 0.5 + u[1] * (a - 0.5) + v[1] * (b - 0.5),
                normal[2] * 0.5 + u[2] * (a - 0.5) + v[2] * (b - 0.5),
            ]
        };
        let i0 = data.push_vertex(corner(0.0, 0.0), normal, [0.0, 0.0]);
        let i1 = data.push_vertex(corner(1.0, 0.0), normal, [1.0, 0.0]);
        let i2 = data.push_vertex(corner(1.0, 1.0), normal, [1.0, 1.0]);
        let i3 = data.push_vertex(corner(0.0, 1.0), normal, [0.0, 1.0]);
        data.push_triangle(i0, i1, i2);
        data.push_triangle(i0, i2, i3);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// Returns a sphere of radius 1.0 centered at the origin.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        for long in 0..=long_segs {
            let phi = long as f32 * TAU / long_segs as f32;
            let point = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            data.push_vertex(
                point,
                point,
                [long as f32 / long_segs as f32, lat as f32 / lat_segs as f32],
            );
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            data.push_triangle(first, first + 1, second);
            data.push_triangle(second, first + 1, second + 1);
        }
    }

    data
}

/// Generate a plane in the XZ plane with its normal pointing up (+Y)
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` - Number of subdivisions along X
/// * `depth_segments` - Number of subdivisions along Z
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for row in 0..=d_segs {
        let v = row as f32 / d_segs as f32;
        for col in 0..=w_segs {
            let u = col as f32 / w_segs as f32;
            data.push_vertex(
                [(u - 0.5) * width, 0.0, (v - 0.5) * depth],
                [0.0, 1.0, 0.0],
                [u, v],
            );
        }
    }

    for row in 0..d_segs {
        for col in 0..w_segs {
            let i = row * (w_segs + 1) + col;
            let next_row = i + w_segs + 1;
            data.push_triangle(i, next_row, i + 1);
            data.push_triangle(i + 1, next_row, next_row + 1);
        }
    }

    data
}

/// Generate a cylinder along the Y axis, from -height/2 to height/2
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `height` - Height of the cylinder
/// * `segments` - Number of circular segments
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let half = height * 0.5;

    for i in 0..=segs {
        let angle = i as f32 * TAU / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = i as f32 / segs as f32;
        data.push_vertex([radius * cos_a, -half, radius * sin_a], [cos_a, 0.0, sin_a], [u, 0.0]);
        data.push_vertex([radius * cos_a, half, radius * sin_a], [cos_a, 0.0, sin_a], [u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        data.push_triangle(bottom, top, bottom + 2);
        data.push_triangle(top, top + 2, bottom + 2);
    }

    push_disc(&mut data, radius, half, segs, true);
    push_disc(&mut data, radius, -half, segs, false);

    data
}

/// Generate a cone along the Y axis with its apex at +height/2
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let half = height * 0.5;

    for i in 0..segs {
        let a0 = i as f32 * TAU / segs as f32;
        let a1 = (i + 1) as f32 * TAU / segs as f32;
        let mid = (a0 + a1) * 0.5;

        let slant = |a: f32| -> [f32; 3] {
            Vector3::new(a.cos() * height, radius, a.sin() * height)
                .normalize()
                .into()
        };

        let b0 = data.push_vertex(
            [radius * a0.cos(), -half, radius * a0.sin()],
            slant(a0),
            [i as f32 / segs as f32, 0.0],
        );
        let apex = data.push_vertex([0.0, half, 0.0], slant(mid), [(i as f32 + 0.5) / segs as f32, 1.0]);
        let b1 = data.push_vertex(
            [radius * a1.cos(), -half, radius * a1.sin()],
            slant(a1),
            [(i + 1) as f32 / segs as f32, 0.0],
        );
        data.push_triangle(b0, apex, b1);
    }

    push_disc(&mut data, radius, -half, segs, false);

    data
}

/// Generate a flat disc of the given radius in the XZ plane, facing +Y
pub fn generate_circle(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    push_disc(&mut data, radius, 0.0, segments.max(3), true);
    data
}

/// Generate an equilateral triangle with unit edges in the XY plane, facing +Z
pub fn generate_triangle() -> GeometryData {
    let mut data = GeometryData::new();
    let h = 3.0f32.sqrt() * 0.5;
    let normal = [0.0, 0.0, 1.0];

    let a = data.push_vertex([-0.5, -h / 3.0, 0.0], normal, [0.0, 0.0]);
    let b = data.push_vertex([0.5, -h / 3.0, 0.0], normal, [1.0, 0.0]);
    let c = data.push_vertex([0.0, 2.0 * h / 3.0, 0.0], normal, [0.5, 1.0]);
    data.push_triangle(a, b, c);

    data
}

/// Generate a torus around the Y axis
///
/// # Arguments
/// * `major_radius` - Distance from the centre to the middle of the tube
/// * `minor_radius` - Radius of the tube
/// * `major_segments` - Segments around the ring
/// * `minor_segments` - Segments around the tube
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let ring = major_segments.max(3);
    let tube = minor_segments.max(3);

    for i in 0..=ring {
        let u = i as f32 * TAU / ring as f32;
        for j in 0..=tube {
            let v = j as f32 * TAU / tube as f32;
            let normal = [v.cos() * u.cos(), v.sin(), v.cos() * u.sin()];
            let position = [
                major_radius * u.cos() + minor_radius * normal[0],
                minor_radius * normal[1],
                major_radius * u.sin() + minor_radius * normal[2],
            ];
            data.push_vertex(position, normal, [i as f32 / ring as f32, j as f32 / tube as f32]);
        }
    }

    for i in 0..ring {
        for j in 0..tube {
            let a = i * (tube + 1) + j;
            let b = a + tube + 1;
            data.push_triangle(a, a + 1, b);
            data.push_triangle(a + 1, b + 1, b);
        }
    }

    data
}

/// Regular tetrahedron inscribed in the unit sphere
pub fn generate_tetrahedron() -> GeometryData {
    let s = 1.0 / 3.0f32.sqrt();
    let corners = [[s, s, s], [s, -s, -s], [-s, s, -s], [-s, -s, s]];
    flat_polyhedron(&corners, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]])
}

/// Regular octahedron inscribed in the unit sphere
pub fn generate_octahedron() -> GeometryData {
    let corners = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let mut faces = Vec::with_capacity(8);
    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push([x, y, z]);
            }
        }
    }
    flat_polyhedron(&corners, &faces)
}

/// Regular icosahedron inscribed in the unit sphere
pub fn generate_icosahedron() -> GeometryData {
    let t = (1.0 + 5.0f32.sqrt()) * 0.5;
    let raw = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let corners: Vec<[f32; 3]> = raw
        .iter()
        .map(|&c| Vector3::from(c).normalize().into())
        .collect();

    #[rustfmt::skip]
    let faces = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    flat_polyhedron(&corners, &faces)
}

/// Figure used to show a camera: a box body with a lens opening towards -Z.
///
/// Local forward is -Z and local up is +Y.
pub fn generate_camera_body() -> GeometryData {
    let mut data = GeometryData::new();

    let body_depth = 0.7;
    data.merge(
        &generate_cube(),
        Vector3::new(0.5, 0.35, body_depth),
        Matrix3::identity(),
        Vector3::new(0.0, 0.0, 0.0),
    );

    let lens_height = 0.3;
    data.merge(
        &generate_cone(0.2, lens_height, 16),
        Vector3::new(1.0, 1.0, 1.0),
        Matrix3::from_angle_x(Rad(PI * 0.5)),
        Vector3::new(0.0, 0.0, -(body_depth + lens_height) * 0.5),
    );

    data
}

impl GeometryData {
    /// Appends `other` after scaling, rotating and translating it
    pub fn merge(
        &mut self,
        other: &GeometryData,
        scale: Vector3<f32>,
        rotation: Matrix3<f32>,
        offset: Vector3<f32>,
    ) {
        let base = self.vertices.len() as u32;
        for (i, &position) in other.vertices.iter().enumerate() {
            let p = Vector3::from(position);
            let p = rotation * Vector3::new(p.x * scale.x, p.y * scale.y, p.z * scale.z) + offset;

            let n = other.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let n = rotation * Vector3::new(n[0] / scale.x, n[1] / scale.y, n[2] / scale.z);
            let n = if n.magnitude2() > 0.0 { n.normalize() } else { n };

            self.push_vertex(
                p.into(),
                n.into(),
                other.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            );
        }
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

fn push_disc(data: &mut GeometryData, radius: f32, y: f32, segments: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);

    let rim_start = data.vertices.len() as u32;
    for i in 0..=segments {
        let angle = i as f32 * TAU / segments as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex(
            [radius * cos_a, y, radius * sin_a],
            normal,
            [0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a],
        );
    }

    for i in 0..segments {
        let current = rim_start + i;
        if facing_up {
            data.push_triangle(center, current + 1, current);
        } else {
            data.push_triangle(center, current, current + 1);
        }
    }
}

/// Builds a flat-shaded convex polyhedron, flipping any face that points inwards
fn flat_polyhedron(corners: &[[f32; 3]], faces: &[[usize; 3]]) -> GeometryData {
    let mut data = GeometryData::new();

    for &[a, b, c] in faces {
        let (mut pa, pb, mut pc) = (
            Vector3::from(corners[a]),
            Vector3::from(corners[b]),
            Vector3::from(corners[c]),
        );
        let mut normal = (pb - pa).cross(pc - pa).normalize();
        let centroid = (pa + pb + pc) / 3.0;
        if normal.dot(centroid) < 0.0 {
            std::mem::swap(&mut pa, &mut pc);
            normal = -normal;
        }

        let n: [f32; 3] = normal.into();
        let i0 = data.push_vertex(pa.into(), n, [0.0, 0.0]);
        let i1 = data.push_vertex(pb.into(), n, [1.0, 0.0]);
        let i2 = data.push_vertex(pc.into(), n, [0.5, 1.0]);
        data.push_triangle(i0, i1, i2);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's winding must agree with its stored normals
    fn assert_outward(data: &GeometryData) {
        for tri in data.indices.chunks_exact(3) {
            let p: Vec<Vector3<f32>> = tri.iter().map(|&i| Vector3::from(data.vertices[i as usize])).collect();
            let face = (p[1] - p[0]).cross(p[2] - p[0]);
            if face.magnitude2() < 1e-12 {
                continue;
            }
            let avg = tri
                .iter()
                .map(|&i| Vector3::from(data.normals[i as usize]))
                .fold(Vector3::new(0.0, 0.0, 0.0), |acc, n| acc + n);
            assert!(face.dot(avg) > 0.0, "triangle {:?} is wound inwards", tri);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_outward(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertices.len(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        assert_outward(&sphere);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9);
        assert_eq!(plane.indices.len(), 24);
        assert_outward(&plane);
    }

    #[test]
    fn test_round_shapes_face_outwards() {
        assert_outward(&generate_cylinder(1.0, 2.0, 12));
        assert_outward(&generate_cone(1.0, 2.0, 12));
        assert_outward(&generate_circle(1.0, 12));
        assert_outward(&generate_torus(1.0, 0.25, 16, 8));
        assert_outward(&generate_triangle());
    }

    #[test]
    fn test_polyhedra() {
        let tetra = generate_tetrahedron();
        assert_eq!(tetra.triangle_count(), 4);
        assert_outward(&tetra);

        let octa = generate_octahedron();
        assert_eq!(octa.triangle_count(), 8);
        assert_outward(&octa);

        let ico = generate_icosahedron();
        assert_eq!(ico.triangle_count(), 20);
        for v in &ico.vertices {
            assert!((Vector3::from(*v).magnitude() - 1.0).abs() < 1e-5);
        }
        assert_outward(&ico);
    }

    #[test]
    fn test_camera_body_lens_points_forward() {
        let body = generate_camera_body();
        let min_z = body.vertices.iter().map(|v| v[2]).fold(f32::MAX, f32::min);
        assert!((min_z + 0.65).abs() < 1e-5, "lens should end at z = -0.65, got {}", min_z);
        assert_outward(&body);
    }
}
