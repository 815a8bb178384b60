//! Signed distance evaluation over the scene tree.
//!
//! Every query runs in the local space of the node it starts at. The result
//! pairs the signed distance with the primitive that produced it, so the
//! renderer can look up the material and local position of whatever a ray
//! ends up touching.
//!
//! Nodes listed in the ignore set are treated as absent: a union or
//! intersection skips them, a difference skips them when they are carved
//! out and vanishes when its base is ignored, and a transform over an
//! ignored child vanishes. Reflection rays use this to leave the surface
//! they start on.

use sdf_math::Vec3;

use crate::scene::{NodeId, Scene};
use crate::shape::{Axis, Shape};

/// Distance reported when nothing contributes to a query.
pub const NO_DISTANCE: f32 = f32::INFINITY;

/// Signed distance to a sphere of `radius` at the origin.
#[inline]
pub fn sdf_sphere(point: Vec3, radius: f32) -> f32 {
    point.length() - radius
}

/// Signed distance to an infinite cylinder along `axis`.
#[inline]
pub fn sdf_tube(point: Vec3, radius: f32, axis: Axis) -> f32 {
    let mut flat = point;
    flat[axis.index()] = 0.0;
    flat.length() - radius
}

/// Signed distance to a plane through the origin with unit `normal`.
#[inline]
pub fn sdf_plane(point: Vec3, normal: Vec3) -> f32 {
    point.dot(normal)
}

impl Scene {
    /// Signed distance from `point` to the subtree at `id`, with the nearest primitive.
    ///
    /// Returns `(NO_DISTANCE, None)` when nothing in the subtree contributes,
    /// either because it is empty or because everything is ignored.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this scene.
    pub fn distance_at(&self, id: NodeId, point: Vec3, ignore: &[NodeId]) -> (f32, Option<NodeId>) {
        match self.eval(id, point, ignore) {
            Some((distance, owner)) => (distance, Some(owner)),
            None => (NO_DISTANCE, None),
        }
    }

    /// Signed distance only, with nothing ignored.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this scene.
    #[inline]
    pub fn distance_only(&self, id: NodeId, point: Vec3) -> f32 {
        self.distance_at(id, point, &[]).0
    }

    fn eval(&self, id: NodeId, point: Vec3, ignore: &[NodeId]) -> Option<(f32, NodeId)> {
        if ignore.contains(&id) {
            return None;
        }

        let node = self.get(id);
        let children = node.children();

        match node.shape() {
            Shape::Sphere { radius } => Some((sdf_sphere(point, *radius), id)),
            Shape::Tube { radius, axis } => Some((sdf_tube(point, *radius, *axis), id)),
            Shape::Plane { normal } => Some((sdf_plane(point, *normal), id)),

            Shape::Union => {
                let mut best: Option<(f32, NodeId)> = None;
                for &child in children {
                    if let Some((d, owner)) = self.eval(child, point, ignore) {
                        // strict `<` keeps the first of equal candidates
                        if best.map_or(true, |(dist, _)| d < dist) {
                            best = Some((d, owner));
                        }
                    }
                }
                best
            }

            Shape::Intersection => {
                let mut best: Option<(f32, NodeId)> = None;
                for &child in children {
                    if let Some((d, owner)) = self.eval(child, point, ignore) {
                        if best.map_or(true, |(dist, _)| d > dist) {
                            best = Some((d, owner));
                        }
                    }
                }
                best
            }

            Shape::Difference => {
                let (&base, carved) = children.split_first()?;
                let mut best = self.eval(base, point, ignore)?;
                for &child in carved {
                    if let Some((d, owner)) = self.eval(child, point, ignore) {
                        if -d > best.0 {
                            best = (-d, owner);
                        }
                    }
                }
                Some(best)
            }

            Shape::Translate { offset } => {
                let &child = children.first()?;
                self.eval(child, point - *offset, ignore)
            }

            Shape::Scale { factor } => {
                let &child = children.first()?;
                self.eval(child, point / *factor, ignore)
                    .map(|(d, owner)| (d * *factor, owner))
            }
        }
    }

    /// Convert a global position into the local space of `id`.
    ///
    /// Applies `to_local` of every node from the root down to `id`, so the
    /// outermost transform acts first.
    pub fn global_to_local(&self, id: NodeId, global: Vec3) -> Vec3 {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        chain
            .iter()
            .rev()
            .fold(global, |pos, &node| self.get(node).shape().to_local(pos))
    }

    /// Convert a position in the local space of `id` into global space.
    ///
    /// Inverse of `global_to_local`: applies `from_local` from `id` up to the root.
    pub fn local_to_global(&self, id: NodeId, local: Vec3) -> Vec3 {
        self.ancestors(id)
            .fold(local, |pos, node| self.get(node).shape().from_local(pos))
    }
}
