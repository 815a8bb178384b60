//! SDF Renderer - CPU Sphere Tracing
//!
//! Renders signed distance field scenes built with `sdf_scene`: rays are
//! marched through the scene's distance field, surfaces shaded from their
//! materials and mirror reflections followed up to a bounce budget.

mod bucket;
mod camera;
mod march;
mod renderer;
mod stats;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{CameraRays, Orthographic, Pinhole};
pub use march::{estimate_normal, march, MarchResult, RaymarchConfig};
pub use renderer::{
    clamp_01, color_to_rgba, sample_ndc, ImageBuffer, RenderConfig, RenderError, RenderResult,
    Raymarcher,
};
pub use stats::RenderStats;

/// Re-export the scene and math types needed to drive a render
pub use sdf_math::{Ray, Vec2, Vec3, Vec3Ext};
pub use sdf_scene::{Color, Material, NodeId, Scene, Shape};
