//! Sphere tracing against a scene's distance field.
//!
//! A ray advances by the distance to the nearest surface until it is within
//! `epsilon` of one. There is no far clip: a ray that escapes the scene is a
//! miss once it uses up its iteration budget or the distance overflows.

use sdf_math::{Ray, Vec3, Vec3Ext};
use sdf_scene::{NodeId, Scene};
use serde::{Deserialize, Serialize};

/// Raymarch configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaymarchConfig {
    /// Maximum number of marching steps per ray
    pub max_iterations: u32,
    /// Distance threshold for a surface hit
    pub epsilon: f32,
    /// Step of the central differences used for normals
    pub normal_epsilon: f32,
}

impl Default for RaymarchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            epsilon: 0.0001,
            normal_epsilon: 0.001,
        }
    }
}

/// Where a marched ray ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Final global position; the surface point on a hit.
    pub position: Vec3,
    /// Primitive that was hit, `None` on a miss.
    pub hit: Option<NodeId>,
    /// Number of distance evaluations taken.
    pub steps: u32,
}

impl MarchResult {
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// March `ray` through the subtree at `root`, skipping `ignore`.
///
/// The ray direction must be unit length, otherwise steps over- or
/// undershoot the distance field.
pub fn march(
    scene: &Scene,
    root: NodeId,
    ray: &Ray,
    config: &RaymarchConfig,
    ignore: &[NodeId],
) -> MarchResult {
    let mut position = ray.origin;

    for step in 0..config.max_iterations {
        let (distance, owner) = scene.distance_at(root, position, ignore);

        // Nothing left to hit; stepping by infinity would only produce NaN
        if !distance.is_finite() {
            return MarchResult {
                position,
                hit: None,
                steps: step + 1,
            };
        }

        if distance <= config.epsilon {
            return MarchResult {
                position,
                hit: owner,
                steps: step + 1,
            };
        }

        position += ray.direction * distance;
    }

    MarchResult {
        position,
        hit: None,
        steps: config.max_iterations,
    }
}

/// Estimate the surface normal at `point` via central differences.
///
/// Uses the full distance field of `root`, so carving by sibling nodes is
/// reflected in the result. A vanishing gradient yields the zero vector.
pub fn estimate_normal(scene: &Scene, root: NodeId, point: Vec3, e: f32) -> Vec3 {
    let d = |offset: Vec3| scene.distance_only(root, point + offset);

    Vec3::new(
        d(Vec3::new(e, 0.0, 0.0)) - d(Vec3::new(-e, 0.0, 0.0)),
        d(Vec3::new(0.0, e, 0.0)) - d(Vec3::new(0.0, -e, 0.0)),
        d(Vec3::new(0.0, 0.0, e)) - d(Vec3::new(0.0, 0.0, -e)),
    )
    .normalize_safe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdf_scene::Shape;

    #[test]
    fn test_march_converges_on_sphere() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));
        let config = RaymarchConfig::default();

        let dir = Vec3::X;
        let result = march(&scene, sphere, &Ray::new(Vec3::new(-3.0, 0.707, 0.0), dir), &config, &[]);

        assert_eq!(result.hit, Some(sphere));
        assert_eq!(result.position.rounded(3), Vec3::new(-0.707, 0.707, 0.0));

        let normal = estimate_normal(&scene, sphere, result.position, config.normal_epsilon);
        assert_eq!(normal.rounded(3), Vec3::new(-0.707, 0.707, 0.0));
        assert_eq!(dir.reflected(normal).rounded(3), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_march_translated_sphere() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));
        let root = scene.translated(sphere, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let config = RaymarchConfig::default();

        let dir = Vec3::X;
        let result = march(&scene, root, &Ray::new(Vec3::new(-3.0, 1.707, 0.0), dir), &config, &[]);

        // The owner is the primitive, not the transform above it
        assert_eq!(result.hit, Some(sphere));
        assert_eq!(result.position.rounded(3), Vec3::new(-0.707, 1.707, 0.0));

        let normal = estimate_normal(&scene, root, result.position, config.normal_epsilon);
        assert_eq!(normal.rounded(3), Vec3::new(-0.707, 0.707, 0.0));
        assert_eq!(dir.reflected(normal).rounded(3), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_march_miss_exhausts_budget() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));
        let config = RaymarchConfig {
            max_iterations: 50,
            ..Default::default()
        };

        let result = march(&scene, sphere, &Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z), &config, &[]);

        assert!(!result.is_hit());
        assert_eq!(result.steps, 50);
        assert!(result.position.z < -5.0);
    }

    #[test]
    fn test_march_everything_ignored() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));
        let config = RaymarchConfig::default();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let result = march(&scene, sphere, &ray, &config, &[sphere]);

        assert_eq!(result.hit, None);
        assert_eq!(result.steps, 1);
        assert_eq!(result.position, ray.origin);
    }

    #[test]
    fn test_march_starts_inside() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));

        let result = march(&scene, sphere, &Ray::default(), &RaymarchConfig::default(), &[]);

        assert_eq!(result.hit, Some(sphere));
        assert_eq!(result.position, Vec3::ZERO);
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn test_normal_of_plane() {
        let mut scene = Scene::new();
        let plane = scene.add(Shape::plane(Vec3::Y));

        let normal = estimate_normal(&scene, plane, Vec3::new(3.0, 0.0, -2.0), 0.001);
        assert!((normal - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_normal_of_flat_field_is_zero() {
        // max(y, -y) = |y|: every central difference cancels at the origin
        let mut scene = Scene::new();
        let a = scene.add(Shape::plane(Vec3::Y));
        let b = scene.add(Shape::plane(-Vec3::Y));
        let slab = scene.combine(Shape::Intersection, &[a, b]).unwrap();

        assert_eq!(estimate_normal(&scene, slab, Vec3::ZERO, 0.001), Vec3::ZERO);
    }
}
