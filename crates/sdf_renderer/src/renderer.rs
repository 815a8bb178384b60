//! Shading and the frame loop.
//!
//! Implements sphere-traced rendering with:
//! - Mirror reflections up to a configurable bounce budget
//! - Supersampled anti-aliasing on a regular grid
//! - Bucketed rendering in parallel via rayon

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use sdf_math::{Ray, Vec2, Vec3, Vec3Ext};
use sdf_scene::{Color, Material, NodeId, Scene};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::CameraRays;
use crate::march::{estimate_normal, march, RaymarchConfig};
use crate::stats::RenderStats;

/// Errors raised when setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render root {0} is not part of the scene")]
    UnknownRoot(NodeId),

    #[error("Render cancelled")]
    Cancelled,

    #[error("Invalid render config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to read render config: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel along each axis; values below 1 mean 1
    pub antialias: u32,
    /// Maximum number of mirror bounces per camera ray
    pub max_reflections: u32,
    /// Color returned when a ray hits nothing
    pub background: Color,
    /// Color of nodes without a material
    pub default_color: Color,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Sphere tracing parameters
    pub march: RaymarchConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: 1,
            max_reflections: 5,
            background: Color::ZERO,
            default_color: Color::splat(0.5),
            bucket_size: 16,
            march: RaymarchConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Effective anti-aliasing factor, at least 1.
    pub fn samples_per_axis(&self) -> u32 {
        self.antialias.max(1)
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to 8-bit RGBA without gamma correction.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Row-major RGB image with the origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Add `color` onto the pixel at (x, y).
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] += color;
    }

    /// Replace every pixel with `f(pixel)`.
    pub fn map(&mut self, f: impl Fn(Color) -> Color) {
        for pixel in &mut self.pixels {
            *pixel = f(*pixel);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Two-tone text rendering, one line per row.
    ///
    /// A pixel is `bright` when any channel reaches `threshold`.
    pub fn threshold_mask(&self, threshold: f32, bright: &str, dark: &str) -> String {
        let mut out = String::new();
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            for c in row {
                let lit = c.x >= threshold || c.y >= threshold || c.z >= threshold;
                out.push_str(if lit { bright } else { dark });
            }
            out.push('\n');
        }
        out
    }
}

/// Map a sample grid index to normalized device coordinates.
///
/// x runs from -1 at the left to 1 at the right, y from 1 at the top row to
/// -1 at the bottom.
pub fn sample_ndc(x: u32, y: u32, grid_width: u32, grid_height: u32) -> Vec2 {
    let nx = (x as f32 / grid_width.saturating_sub(1).max(1) as f32 - 0.5) * 2.0;
    let ny = (y as f32 / grid_height.saturating_sub(1).max(1) as f32 - 0.5) * -2.0;
    Vec2::new(nx, ny)
}

/// Renders one scene tree.
///
/// Holds the scene read-only, so a single raymarcher can be shared by all
/// worker threads.
#[derive(Debug, Clone)]
pub struct Raymarcher<'s> {
    scene: &'s Scene,
    root: NodeId,
    config: RenderConfig,
    default_material: Material,
}

impl<'s> Raymarcher<'s> {
    /// Create a raymarcher for the tree at `root`.
    pub fn new(scene: &'s Scene, root: NodeId, config: RenderConfig) -> RenderResult<Self> {
        if scene.node(root).is_none() {
            return Err(RenderError::UnknownRoot(root));
        }
        let default_material = Material::color(config.default_color);
        Ok(Self {
            scene,
            root,
            config,
            default_material,
        })
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Compute the color seen by a ray.
    ///
    /// `bounces` is the number of reflections still allowed; `ignore` lists
    /// nodes the ray passes through.
    pub fn ray_color(&self, ray: &Ray, bounces: u32, ignore: &[NodeId]) -> Color {
        let mut stats = RenderStats::default();
        self.trace(ray, bounces, ignore, &mut stats)
    }

    fn trace(
        &self,
        ray: &Ray,
        bounces: u32,
        ignore: &[NodeId],
        stats: &mut RenderStats,
    ) -> Color {
        stats.rays += 1;

        let result = march(self.scene, self.root, ray, &self.config.march, ignore);
        match result.hit {
            Some(hit) => self.object_color(hit, result.position, ray.direction, bounces, stats),
            None => self.config.background,
        }
    }

    fn object_color(
        &self,
        hit: NodeId,
        global_pos: Vec3,
        direction: Vec3,
        bounces: u32,
        stats: &mut RenderStats,
    ) -> Color {
        let local_pos = self.scene.global_to_local(hit, global_pos);
        let material = self
            .scene
            .node(hit)
            .and_then(|node| node.material())
            .map_or(&self.default_material, |m| m.as_ref());

        let mut color_sum = Color::ZERO;
        let mut weight_sum = 0.0;

        for (layer, weight) in material.layers(local_pos) {
            if let Some(color) = layer.surface_color() {
                color_sum += color * weight;
                weight_sum += weight;
            }

            let reflective = layer.reflectivity();
            if reflective != 0.0 && bounces > 0 {
                let reflected = self.reflect_color(hit, global_pos, direction, bounces - 1, stats);
                color_sum += reflected * reflective;
                weight_sum += reflective;
            }
        }

        if weight_sum != 0.0 {
            color_sum / weight_sum
        } else {
            color_sum
        }
    }

    fn reflect_color(
        &self,
        hit: NodeId,
        global_pos: Vec3,
        direction: Vec3,
        bounces: u32,
        stats: &mut RenderStats,
    ) -> Color {
        stats.reflections += 1;

        let normal = estimate_normal(self.scene, self.root, global_pos, self.config.march.normal_epsilon);
        let reflected = Ray::new(global_pos, direction.reflected(normal));
        self.trace(&reflected, bounces, &[hit], stats)
    }

    /// Render output pixel (x, y) of a `width` by `height` image.
    ///
    /// Casts `antialias` squared camera samples and returns their sum.
    /// `render` divides the whole image by the sample count afterwards.
    pub fn render_pixel<C: CameraRays + ?Sized>(
        &self,
        camera: &C,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        stats: &mut RenderStats,
    ) -> Color {
        let aa = self.config.samples_per_axis();
        let (grid_width, grid_height) = (width * aa, height * aa);

        let mut pixel_color = Color::ZERO;
        for sy in 0..aa {
            for sx in 0..aa {
                let ndc = sample_ndc(x * aa + sx, y * aa + sy, grid_width, grid_height);
                pixel_color += self.trace(&camera.ray(ndc), self.config.max_reflections, &[], stats);
                stats.samples += 1;
            }
        }
        stats.pixels += 1;
        pixel_color
    }

    /// Render the scene and add the result onto `image`.
    ///
    /// With anti-aliasing every cell is then scaled by `1 / antialias²`,
    /// including whatever `image` held before the render.
    pub fn render<C: CameraRays>(&self, image: &mut ImageBuffer, camera: &C) -> RenderStats {
        let start = Instant::now();
        let buckets = generate_buckets(image.width, image.height, self.config.bucket_size);
        let (width, height) = (image.width, image.height);

        let results: Vec<BucketResult> = buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, self, camera, width, height))
            .collect();

        self.composite(image, results, start)
    }

    /// Like `render`, but stops between buckets once `cancel` is set.
    ///
    /// A cancelled render leaves `image` untouched.
    pub fn render_with_cancel<C: CameraRays>(
        &self,
        image: &mut ImageBuffer,
        camera: &C,
        cancel: &AtomicBool,
    ) -> RenderResult<RenderStats> {
        let start = Instant::now();
        let buckets = generate_buckets(image.width, image.height, self.config.bucket_size);
        let (width, height) = (image.width, image.height);

        let results: Option<Vec<BucketResult>> = buckets
            .par_iter()
            .map(|bucket| {
                if cancel.load(Ordering::Relaxed) {
                    None
                } else {
                    Some(render_bucket(bucket, self, camera, width, height))
                }
            })
            .collect();

        match results {
            Some(results) => Ok(self.composite(image, results, start)),
            None => {
                log::warn!("Render cancelled after {:.2?}", start.elapsed());
                Err(RenderError::Cancelled)
            }
        }
    }

    fn composite(&self, image: &mut ImageBuffer, results: Vec<BucketResult>, start: Instant) -> RenderStats {
        let mut stats = RenderStats::default();
        let total = results.len();

        for (done, result) in results.into_iter().enumerate() {
            let bucket = result.bucket;
            for (i, color) in result.pixels.into_iter().enumerate() {
                let local_x = i as u32 % bucket.width;
                let local_y = i as u32 / bucket.width;
                image.add(bucket.x + local_x, bucket.y + local_y, color);
            }
            stats.merge(&result.stats);
            log::debug!(
                "Bucket {} composited ({:.1}%)",
                bucket.index,
                (done + 1) as f32 / total as f32 * 100.0
            );
        }

        let aa = self.config.samples_per_axis();
        if aa > 1 {
            let inv_samples = 1.0 / (aa * aa) as f32;
            image.map(|c| c * inv_samples);
        }

        stats.elapsed = start.elapsed();
        log::info!("{}", stats);
        stats
    }
}
