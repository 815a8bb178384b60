//! SDF scene graph
//!
//! Scenes are trees of signed-distance nodes held in an arena: primitives
//! (sphere, tube, plane) at the leaves, boolean combinators and spatial
//! transforms above them. Nodes are addressed by `NodeId` handles and every
//! node has at most one parent, so a subtree is never shared.

mod distance;
mod material;
mod scene;
mod shape;
mod tree;

pub use distance::{sdf_plane, sdf_sphere, sdf_tube, NO_DISTANCE};
pub use material::{Color, Material};
pub use scene::{Node, NodeId, Scene, SceneError, SceneResult, StructureError};
pub use shape::{Axis, Shape};
pub use tree::NodeVisitor;

/// Re-export the math kernel used by the scene API
pub use sdf_math::{Ray, Vec3, Vec3Ext};
