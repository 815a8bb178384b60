//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Every bucket owns a disjoint
//! pixel range, so workers never write to the same pixel.

use crate::camera::CameraRays;
use crate::renderer::Raymarcher;
use crate::stats::RenderStats;
use sdf_scene::Color;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 16;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// A `bucket_size` of zero falls back to `DEFAULT_BUCKET_SIZE`.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = if bucket_size == 0 {
        DEFAULT_BUCKET_SIZE
    } else {
        bucket_size
    };

    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += size;
        }
        y += size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center, closest first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
    /// Counters for this bucket alone
    pub stats: RenderStats,
}

/// Render a single bucket of a `width` by `height` image.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket<C: CameraRays + ?Sized>(
    bucket: &Bucket,
    raymarcher: &Raymarcher<'_>,
    camera: &C,
    width: u32,
    height: u32,
) -> BucketResult {
    let mut stats = RenderStats::default();
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            pixels.push(raymarcher.render_pixel(camera, x, y, width, height, &mut stats));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Orthographic;
    use crate::renderer::RenderConfig;
    use sdf_math::Vec3;
    use sdf_scene::{Scene, Shape};

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 37, 16);
        assert_eq!(buckets.len(), 7 * 3);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 37);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(48, 48, 16);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        assert_eq!((buckets[0].x, buckets[0].y), (16, 16));
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_zero_bucket_size() {
        let buckets = generate_buckets(20, 20, 0);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn test_empty_image_has_no_buckets() {
        assert!(generate_buckets(0, 10, 16).is_empty());
    }

    #[test]
    fn test_render_bucket() {
        let mut scene = Scene::new();
        let sphere = scene.add(Shape::sphere(1.0));
        let raymarcher = Raymarcher::new(&scene, sphere, RenderConfig::default()).unwrap();
        let camera = Orthographic::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z).with_scale(4.0);

        // Centre pixel of a 5x5 image and its right neighbour, 2 units off axis
        let bucket = Bucket::new(2, 2, 2, 1, 0);
        let result = render_bucket(&bucket, &raymarcher, &camera, 5, 5);

        assert_eq!(result.pixels, vec![Color::splat(0.5), Color::ZERO]);
        assert_eq!(result.stats.pixels, 2);
        assert_eq!(result.stats.rays, 2);
    }
}
