use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// Rays are used for raymarching - they represent a half-line starting at
/// `origin` and traveling in `direction`. Sphere tracing steps along the ray
/// by the distance-field value, so the direction must be unit length for the
/// step sizes to be correct.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
