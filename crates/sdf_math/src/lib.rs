// Re-export glam for convenience
pub use glam::*;

// Math types shared by the scene graph and the renderer
mod ray;
mod vector;

pub use ray::Ray;
pub use vector::Vec3Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);

        assert_eq!(Vec3::splat(1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(Vec3::from([1.0, 2.0, 3.0]), v);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_scalar_broadcast_both_sides() {
        assert_eq!(Vec3::ZERO + 1.0, Vec3::ONE);
        assert_eq!(Vec3::ZERO - 1.0, Vec3::splat(-1.0));
        assert_eq!(1.0 + Vec3::ZERO, Vec3::ONE);
        assert_eq!(1.0 - Vec3::splat(2.0), Vec3::splat(-1.0));
        assert_eq!(2.0 * Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(6.0 / Vec3::new(1.0, 2.0, 3.0), Vec3::new(6.0, 3.0, 2.0));
        assert_eq!(Vec3::new(1.0, 2.0, 3.0) - Vec3::ONE, Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_inplace_operators() {
        let mut v = Vec3::ZERO;
        v += 1.0;
        assert_eq!(v, Vec3::ONE);
        v *= Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cross_right_hand_rule() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::X.cross(Vec3::Z), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
    }

    #[test]
    fn test_distances() {
        assert_eq!(Vec3::new(5.0, 0.0, 0.0).distance(Vec3::ZERO), 5.0);
        assert_eq!(Vec3::ONE.distance_squared(Vec3::splat(2.0)), 3.0);
        assert_eq!(Vec3::new(5.0, 0.0, 0.0).length_squared(), 25.0);
    }
}
