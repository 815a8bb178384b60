//! Camera ray generation.
//!
//! The frame loop hands every sample's normalized device coordinates
//! (`[-1, 1]` on both axes, +y up) to a camera and marches the ray it returns.

use sdf_math::{Ray, Vec2, Vec3, Vec3Ext};

/// Maps normalized device coordinates to a primary ray.
///
/// Implemented for any `Fn(Vec2) -> Ray + Sync`, so a closure can stand in
/// for a camera.
pub trait CameraRays: Sync {
    fn ray(&self, ndc: Vec2) -> Ray;
}

impl<F> CameraRays for F
where
    F: Fn(Vec2) -> Ray + Sync,
{
    fn ray(&self, ndc: Vec2) -> Ray {
        self(ndc)
    }
}

/// Parallel rays offset in the world xy plane.
///
/// Sample `(x, y)` starts at `origin + (x, y, 0) * scale` and travels along
/// `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orthographic {
    pub origin: Vec3,
    pub direction: Vec3,
    pub scale: f32,
}

impl Orthographic {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_safe(),
            scale: 1.0,
        }
    }

    /// Set the half extent of the view in world units.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl CameraRays for Orthographic {
    fn ray(&self, ndc: Vec2) -> Ray {
        let offset = Vec3::new(ndc.x, ndc.y, 0.0) * self.scale;
        Ray::new(self.origin + offset, self.direction)
    }
}

/// Perspective camera with all rays leaving a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinhole {
    look_from: Vec3,
    // Camera basis: u right, v up, w backwards
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Pinhole {
    /// Create a camera at `look_from` aimed at `look_at`.
    ///
    /// `vfov` is the vertical field of view in degrees and `aspect` the
    /// image width divided by its height.
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = half_height * aspect;

        let w = (look_from - look_at).normalize_safe();
        let u = vup.cross(w).normalize_safe();
        let v = w.cross(u);

        Self {
            look_from,
            u,
            v,
            w,
            half_width,
            half_height,
        }
    }

    /// Camera at `look_from` looking at `look_at` with +y up, sized for a
    /// `width` by `height` image.
    pub fn looking_at(look_from: Vec3, look_at: Vec3, vfov: f32, width: u32, height: u32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        Self::new(look_from, look_at, Vec3::Y, vfov, aspect)
    }
}

impl CameraRays for Pinhole {
    fn ray(&self, ndc: Vec2) -> Ray {
        let direction = -self.w
            + self.u * (ndc.x * self.half_width)
            + self.v * (ndc.y * self.half_height);
        Ray::new(self.look_from, direction.normalize_safe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_camera() {
        let camera = |ndc: Vec2| Ray::new(Vec3::new(ndc.x, ndc.y, -5.0), Vec3::Z);
        let ray = camera.ray(Vec2::new(0.5, -1.0));

        assert_eq!(ray.origin, Vec3::new(0.5, -1.0, -5.0));
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn test_orthographic_offsets_origin() {
        let camera = Orthographic::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 2.0));

        let ray = camera.ray(Vec2::new(-1.0, 1.0));
        assert_eq!(ray.origin, Vec3::new(-1.0, 1.0, -5.0));
        assert_eq!(ray.direction, Vec3::Z);

        let wide = camera.with_scale(3.0).ray(Vec2::new(1.0, 0.5));
        assert_eq!(wide.origin, Vec3::new(3.0, 1.5, -5.0));
    }

    #[test]
    fn test_pinhole_center_ray() {
        let camera = Pinhole::looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, 60.0, 4, 3);
        let ray = camera.ray(Vec2::ZERO);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -5.0));
        assert!((ray.direction - Vec3::Z).length() < 0.0001);
    }

    #[test]
    fn test_pinhole_corners() {
        let camera = Pinhole::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 2.0);

        // 90 degrees vertically: the top edge sits at 45 degrees
        let top = camera.ray(Vec2::new(0.0, 1.0));
        assert!((top.direction - Vec3::new(0.0, 1.0, -1.0).normalize()).length() < 0.0001);

        let right = camera.ray(Vec2::new(1.0, 0.0));
        assert!((right.direction - Vec3::new(2.0, 0.0, -1.0).normalize()).length() < 0.0001);
        assert!((right.direction.length() - 1.0).abs() < 0.0001);
    }
}
