//! Render statistics.

use std::fmt;
use std::time::Duration;

/// Counters gathered while rendering a frame.
///
/// Each bucket counts into its own instance; the frame loop merges them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Output pixels in the frame
    pub pixels: u64,
    /// Camera samples cast (pixels times antialias squared)
    pub samples: u64,
    /// Rays marched, primary and reflected
    pub rays: u64,
    /// Reflection rays spawned
    pub reflections: u64,
    /// Wall-clock render time
    pub elapsed: Duration,
}

impl RenderStats {
    /// Add the counters of `other` into `self`.
    ///
    /// Elapsed time is not summed: buckets overlap in time.
    pub fn merge(&mut self, other: &RenderStats) {
        self.pixels += other.pixels;
        self.samples += other.samples;
        self.rays += other.rays;
        self.reflections += other.reflections;
    }

    pub fn rays_per_pixel(&self) -> f64 {
        self.rays as f64 / self.pixels.max(1) as f64
    }

    pub fn reflections_per_pixel(&self) -> f64 {
        self.reflections as f64 / self.pixels.max(1) as f64
    }

    /// Ray throughput; zero when no time was recorded.
    pub fn rays_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.rays as f64 / seconds
        } else {
            0.0
        }
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "render time {:.2} sec, {} rays ({:.2}/pixel, {:.2}/sec), {} reflections ({:.3}/pixel)",
            self.elapsed.as_secs_f64(),
            self.rays,
            self.rays_per_pixel(),
            self.rays_per_second(),
            self.reflections,
            self.reflections_per_pixel(),
        )
    }
}
