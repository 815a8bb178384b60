//! Surface materials.
//!
//! Materials live outside the node tree and are shared between nodes via
//! `Arc`. Shading asks a material for its weighted layers at a point in the
//! hit primitive's local space.

use std::sync::Arc;

use sdf_math::{Vec3, Vec3Ext};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A surface material.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Flat color with optional mirror reflection.
    ///
    /// A material without a color contributes only its reflection.
    Color {
        color: Option<Color>,
        reflective: f32,
    },
    /// 3D checkerboard alternating between two materials.
    ///
    /// Space is split into axis-aligned cells of size `scale`; each cell is
    /// halved along every axis and the parity of the halves picks `first`
    /// or `second`.
    Checker {
        first: Arc<Material>,
        second: Arc<Material>,
        scale: Vec3,
    },
}

impl Default for Material {
    fn default() -> Self {
        Material::color(Color::ONE)
    }
}

impl Material {
    /// Opaque, non-reflective color.
    pub fn color(color: Color) -> Self {
        Material::Color {
            color: Some(color),
            reflective: 0.0,
        }
    }

    /// Color blended with a mirror reflection weighted by `reflective`.
    pub fn reflective(color: Color, reflective: f32) -> Self {
        Material::Color {
            color: Some(color),
            reflective,
        }
    }

    /// Pure reflector without a color of its own.
    pub fn mirror(reflective: f32) -> Self {
        Material::Color {
            color: None,
            reflective,
        }
    }

    /// Checkerboard of two materials with the given cell size per axis.
    ///
    /// Every component of `scale` must be non-zero.
    pub fn checker(first: Arc<Material>, second: Arc<Material>, scale: Vec3) -> Self {
        debug_assert!(scale.cmpne(Vec3::ZERO).all(), "checker scale must be non-zero");
        Material::Checker {
            first,
            second,
            scale,
        }
    }

    /// Surface color, if this material has one.
    pub fn surface_color(&self) -> Option<Color> {
        match self {
            Material::Color { color, .. } => *color,
            Material::Checker { .. } => None,
        }
    }

    /// Weight of the mirror reflection term.
    pub fn reflectivity(&self) -> f32 {
        match self {
            Material::Color { reflective, .. } => *reflective,
            Material::Checker { .. } => 0.0,
        }
    }

    /// Resolve the materials visible at `local_pos` with their blend weights.
    ///
    /// Every current variant yields exactly one layer of weight 1. A checker
    /// resolves into whichever sub-material owns the cell, recursively, so the
    /// returned layers are always `Material::Color`.
    pub fn layers(&self, local_pos: Vec3) -> Vec<(&Material, f32)> {
        match self {
            Material::Color { .. } => vec![(self, 1.0)],
            Material::Checker {
                first,
                second,
                scale,
            } => {
                let cell = local_pos.floored_rem(*scale) / *scale;
                let odd = (cell.x >= 0.5) ^ (cell.y >= 0.5) ^ (cell.z >= 0.5);
                let chosen = if odd { first } else { second };
                chosen.layers(local_pos)
            }
        }
    }
}
