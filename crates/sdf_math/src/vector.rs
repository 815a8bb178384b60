// Vector utilities for raymarching
//
// Extends glam::Vec3 with the operations the distance-field code needs that
// glam does not provide in the expected form: rotations in degrees, a
// normalisation that tolerates the zero vector, mirror reflection and a
// modulo that takes the sign of the divisor.
//
// Value-returning methods leave the receiver alone; the `_mut` variants
// modify it in place and return it for chaining.

use glam::{Quat, Vec3};

/// Extension trait for Vec3 used throughout the scene and renderer crates.
pub trait Vec3Ext: Sized {
    /// Normalize, leaving a zero-length vector unchanged instead of producing NaN.
    fn normalize_safe(self) -> Self;

    /// Reflect on a plane with the given normal: `v - 2 * (v . n) * n`.
    ///
    /// The normal is expected to be unit length.
    fn reflected(self, normal: Self) -> Self;

    /// Rotate around the x-axis by `degrees`.
    fn rotated_x(self, degrees: f32) -> Self;

    /// Rotate around the y-axis by `degrees`.
    fn rotated_y(self, degrees: f32) -> Self;

    /// Rotate around the z-axis by `degrees`.
    fn rotated_z(self, degrees: f32) -> Self;

    /// Rotate around an arbitrary axis by `degrees`. The axis need not be normalized.
    fn rotated_axis(self, axis: Self, degrees: f32) -> Self;

    /// Component-wise floored modulo; the result has the sign of the divisor.
    fn floored_rem(self, divisor: Self) -> Self;

    /// Round every component to `digits` decimal places.
    fn rounded(self, digits: i32) -> Self;

    fn normalize_safe_mut(&mut self) -> &mut Self;
    fn reflect_mut(&mut self, normal: Self) -> &mut Self;
    fn rotate_x_mut(&mut self, degrees: f32) -> &mut Self;
    fn rotate_y_mut(&mut self, degrees: f32) -> &mut Self;
    fn rotate_z_mut(&mut self, degrees: f32) -> &mut Self;
    fn rotate_axis_mut(&mut self, axis: Self, degrees: f32) -> &mut Self;
    fn round_mut(&mut self, digits: i32) -> &mut Self;
}

impl Vec3Ext for Vec3 {
    fn normalize_safe(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            self
        } else {
            self / length
        }
    }

    fn reflected(self, normal: Self) -> Self {
        self - normal * (self.dot(normal) * 2.0)
    }

    fn rotated_x(self, degrees: f32) -> Self {
        let (sa, ca) = degrees.to_radians().sin_cos();
        Vec3::new(self.x, self.y * ca - self.z * sa, self.y * sa + self.z * ca)
    }

    fn rotated_y(self, degrees: f32) -> Self {
        let (sa, ca) = degrees.to_radians().sin_cos();
        Vec3::new(self.x * ca + self.z * sa, self.y, -self.x * sa + self.z * ca)
    }

    fn rotated_z(self, degrees: f32) -> Self {
        let (sa, ca) = degrees.to_radians().sin_cos();
        Vec3::new(self.x * ca - self.y * sa, self.x * sa + self.y * ca, self.z)
    }

    fn rotated_axis(self, axis: Self, degrees: f32) -> Self {
        Quat::from_axis_angle(axis.normalize(), degrees.to_radians()) * self
    }

    fn floored_rem(self, divisor: Self) -> Self {
        self - divisor * (self / divisor).floor()
    }

    fn rounded(self, digits: i32) -> Self {
        let factor = 10f32.powi(digits);
        (self * factor).round() / factor
    }

    fn normalize_safe_mut(&mut self) -> &mut Self {
        *self = self.normalize_safe();
        self
    }

    fn reflect_mut(&mut self, normal: Self) -> &mut Self {
        *self = self.reflected(normal);
        self
    }

    fn rotate_x_mut(&mut self, degrees: f32) -> &mut Self {
        *self = self.rotated_x(degrees);
        self
    }

    fn rotate_y_mut(&mut self, degrees: f32) -> &mut Self {
        *self = self.rotated_y(degrees);
        self
    }

    fn rotate_z_mut(&mut self, degrees: f32) -> &mut Self {
        *self = self.rotated_z(degrees);
        self
    }

    fn rotate_axis_mut(&mut self, axis: Self, degrees: f32) -> &mut Self {
        *self = self.rotated_axis(axis, degrees);
        self
    }

    fn round_mut(&mut self, digits: i32) -> &mut Self {
        *self = self.rounded(digits);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 0.0001, "{a} != {b}");
    }

    #[test]
    fn test_normalize_safe_zero() {
        assert_eq!(Vec3::ZERO.normalize_safe(), Vec3::ZERO);

        let mut v = Vec3::ZERO;
        v.normalize_safe_mut();
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_normalize_safe_matches_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(v.normalize_safe(), Vec3::new(0.6, 0.0, 0.8));
        assert_eq!(v.normalize_safe(), v / v.length());
    }

    #[test]
    fn test_reflect() {
        // Ray coming from top-left, going down onto a flat floor
        let v = Vec3::new(2.0, -1.0, 0.0);
        assert_eq!(v.reflected(Vec3::Y), Vec3::new(2.0, 1.0, 0.0));

        // Value variant leaves the receiver alone
        assert_eq!(v, Vec3::new(2.0, -1.0, 0.0));
    }

    #[test]
    fn test_reflect_mut_chains() {
        let mut v = Vec3::new(2.0, -1.0, 0.0);
        v.reflect_mut(Vec3::Y).round_mut(0);
        assert_eq!(v, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotations() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.rotated_x(90.0).rounded(0), Vec3::new(1.0, -3.0, 2.0));
        assert_eq!(v.rotated_y(90.0).rounded(0), Vec3::new(3.0, 2.0, -1.0));
        assert_eq!(v.rotated_z(90.0).rounded(0), Vec3::new(-2.0, 1.0, 3.0));
    }

    #[test]
    fn test_rotate_axis_matches_principal_axes() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_close(v.rotated_axis(Vec3::X, 90.0), v.rotated_x(90.0));
        assert_close(v.rotated_axis(Vec3::Y * 3.0, 37.0), v.rotated_y(37.0));
        assert_close(v.rotated_axis(Vec3::Z, -120.0), v.rotated_z(-120.0));

        let mut w = v;
        w.rotate_axis_mut(Vec3::X, 90.0);
        assert_close(w, v.rotated_x(90.0));
    }

    #[test]
    fn test_floored_rem_follows_divisor_sign() {
        let v = Vec3::new(-0.25, 1.5, 3.0);
        assert_eq!(v.floored_rem(Vec3::ONE), Vec3::new(0.75, 0.5, 0.0));
        assert_eq!(Vec3::splat(0.25).floored_rem(Vec3::splat(-1.0)), Vec3::splat(-0.75));
    }

    #[test]
    fn test_rounded() {
        assert_eq!(Vec3::new(1.2, 1.5, 1.7).rounded(0), Vec3::new(1.0, 2.0, 2.0));
        assert_eq!(
            Vec3::new(-0.70712, 0.70749, 0.0).rounded(3),
            Vec3::new(-0.707, 0.707, 0.0)
        );
    }
}
