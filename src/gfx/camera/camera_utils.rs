use cgmath::{InnerSpace, Matrix4, Vector3};

/// Maps OpenGL clip depth `[-1, 1]` to wgpu's `[0, 1]`
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

/// Orientation of a camera at `position` looking at `target`.
///
/// Returns `(direction, right, up)` where `direction` points from the target
/// back to the camera. Falls back to the X axis for `right` when looking
/// straight along Y.
pub fn look_basis(
    position: Vector3<f32>,
    target: Vector3<f32>,
) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let offset = position - target;
    let direction = if offset.magnitude2() > f32::EPSILON {
        offset.normalize()
    } else {
        Vector3::unit_z()
    };

    let right = Vector3::unit_y().cross(direction);
    let right = if right.magnitude2() > f32::EPSILON {
        right.normalize()
    } else {
        Vector3::unit_x()
    };
    let up = direction.cross(right).normalize();

    (direction, right, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_remap() {
        let near = OPENGL_TO_WGPU_MATRIX * cgmath::Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * cgmath::Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);
    }

    #[test]
    fn test_look_basis_is_orthonormal() {
        let (direction, right, up) =
            look_basis(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(direction, Vector3::unit_z());
        assert_eq!(right, Vector3::unit_x());
        assert_eq!(up, Vector3::unit_y());

        let (direction, right, up) =
            look_basis(Vector3::new(0.0, 3.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(direction, Vector3::unit_y());
        assert_eq!(right, Vector3::unit_x());
        assert!(up.dot(direction).abs() < 1e-6);
    }
}
