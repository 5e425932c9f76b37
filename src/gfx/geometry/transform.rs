//! Size and rotation bookkeeping for composite models

use std::f32::consts::TAU;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use cgmath::Vector3;

/// Extent of a model relative to its initial size (1 × 1 × 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Size {
    pub const ONE: Size = Size::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn to_vec(self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Rotates the extent vector about X, then Y, then Z by the normalised angles.
    pub fn update_after_rotation(&mut self, angles: RotationAngles) {
        let (ax, ay, az) = angles.normalized();

        let (y, z) = (self.y, self.z);
        self.y = y * ax.cos() - z * ax.sin();
        self.z = y * ax.sin() + z * ax.cos();

        let (x, z) = (self.x, self.z);
        self.x = x * ay.cos() + z * ay.sin();
        self.z = -x * ay.sin() + z * ay.cos();

        let (x, y) = (self.x, self.y);
        self.x = x * az.cos() - y * az.sin();
        self.y = x * az.sin() + y * az.cos();
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<Vector3<f32>> for Size {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Size {
    fn add_assign(&mut self, rhs: Size) {
        *self = *self + rhs;
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Size {
    type Output = Size;

    fn mul(self, rhs: Size) -> Size {
        Size::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl MulAssign for Size {
    fn mul_assign(&mut self, rhs: Size) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, rhs: f32) -> Size {
        Size::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Rotation angles about the coordinate axes, in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationAngles {
    pub const ZERO: RotationAngles = RotationAngles::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_degrees(x: f32, y: f32, z: f32) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Angles wrapped into `[0, 2π)`
    pub fn normalized(&self) -> (f32, f32, f32) {
        (wrap_radians(self.x), wrap_radians(self.y), wrap_radians(self.z))
    }
}

/// Wraps an angle into `[0, 2π)`
pub fn wrap_radians(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

impl Add for RotationAngles {
    type Output = RotationAngles;

    fn add(self, rhs: RotationAngles) -> RotationAngles {
        RotationAngles::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for RotationAngles {
    fn add_assign(&mut self, rhs: RotationAngles) {
        *self = *self + rhs;
    }
}

impl Neg for RotationAngles {
    type Output = RotationAngles;

    fn neg(self) -> RotationAngles {
        RotationAngles::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for RotationAngles {
    type Output = RotationAngles;

    fn mul(self, rhs: f32) -> RotationAngles {
        RotationAngles::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_size_ops() {
        let a = Size::new(1.0, 2.0, 3.0);
        let b = Size::uniform(2.0);
        assert_eq!(a * b, Size::new(2.0, 4.0, 6.0));
        assert_eq!(a + b, Size::new(3.0, 4.0, 5.0));
        assert_eq!(a - b, Size::new(-1.0, 0.0, 1.0));
        assert_eq!(a * 0.5, Size::new(0.5, 1.0, 1.5));
        assert_eq!(Size::default(), Size::ONE);
    }

    #[test]
    fn test_size_rotation_about_z_swaps_x_and_y() {
        let mut size = Size::new(2.0, 1.0, 1.0);
        size.update_after_rotation(RotationAngles::new(0.0, 0.0, FRAC_PI_2));
        assert!(approx(size.x, -1.0));
        assert!(approx(size.y, 2.0));
        assert!(approx(size.z, 1.0));
    }

    #[test]
    fn test_size_rotation_about_x() {
        let mut size = Size::new(1.0, 3.0, 0.0);
        size.update_after_rotation(RotationAngles::new(FRAC_PI_2, 0.0, 0.0));
        assert!(approx(size.x, 1.0));
        assert!(approx(size.y, 0.0));
        assert!(approx(size.z, 3.0));
    }

    #[test]
    fn test_angles_normalize_into_range() {
        let angles = RotationAngles::new(-FRAC_PI_2, 5.0 * PI, TAU);
        let (x, y, z) = angles.normalized();
        assert!(approx(x, 1.5 * PI));
        assert!(approx(y, PI));
        assert!(approx(z, 0.0));
    }

    #[test]
    fn test_angles_arithmetic() {
        let sum = RotationAngles::new(1.0, 2.0, 3.0) + RotationAngles::new(1.0, 1.0, 1.0) * 2.0;
        assert_eq!(sum, RotationAngles::new(3.0, 4.0, 5.0));
        assert_eq!(-sum, RotationAngles::new(-3.0, -4.0, -5.0));
    }
}
