//! Typed parameters for every kind of scene node.
//!
//! The set of node kinds is closed: three primitives, three boolean
//! combinators and two spatial transforms. Distance evaluation dispatches on
//! this enum (see `distance.rs`).

use std::fmt;

use sdf_math::Vec3;

use crate::scene::SceneError;

/// Coordinate axis for the infinite tube primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a `Vec3`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = SceneError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(SceneError::InvalidAxis(other)),
        }
    }
}

/// The geometry carried by a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Sphere of `radius` centred at the local origin.
    Sphere { radius: f32 },
    /// Infinite cylinder of `radius` running along `axis`.
    Tube { radius: f32, axis: Axis },
    /// Plane through the origin. The normal must be unit length.
    Plane { normal: Vec3 },
    /// Closest of all children.
    Union,
    /// First child with every later child carved out of it.
    Difference,
    /// Region shared by all children.
    Intersection,
    /// Moves its single child by `offset`.
    Translate { offset: Vec3 },
    /// Uniformly scales its single child by `factor`.
    ///
    /// A zero factor is a caller error: the query point is divided by it.
    Scale { factor: f32 },
}

impl Shape {
    /// Sphere with the given radius.
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Tube along the axis with index `axis` (0, 1 or 2).
    pub fn tube(radius: f32, axis: usize) -> Result<Self, SceneError> {
        Ok(Shape::Tube {
            radius,
            axis: Axis::try_from(axis)?,
        })
    }

    /// Plane with the given normal.
    pub fn plane(normal: Vec3) -> Self {
        Shape::Plane { normal }
    }

    /// Translation by `offset`.
    pub fn translate(offset: Vec3) -> Self {
        Shape::Translate { offset }
    }

    /// Uniform scale by `factor`.
    pub fn scale(factor: f32) -> Self {
        debug_assert!(factor != 0.0, "scale factor must be non-zero");
        Shape::Scale { factor }
    }

    /// Type name used for node naming and descriptions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "Sphere",
            Shape::Tube { .. } => "Tube",
            Shape::Plane { .. } => "Plane",
            Shape::Union => "Union",
            Shape::Difference => "Difference",
            Shape::Intersection => "Intersection",
            Shape::Translate { .. } => "Translate",
            Shape::Scale { .. } => "Scale",
        }
    }

    /// Primitives are leaves; everything else owns children.
    pub fn can_have_children(&self) -> bool {
        !self.is_primitive()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Shape::Sphere { .. } | Shape::Tube { .. } | Shape::Plane { .. }
        )
    }

    pub fn is_transform(&self) -> bool {
        matches!(self, Shape::Translate { .. } | Shape::Scale { .. })
    }

    /// Convert a point from the parent's space into this node's space.
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Translate { offset } => point - *offset,
            Shape::Scale { factor } => point / *factor,
            _ => point,
        }
    }

    /// Convert a point from this node's space back into the parent's space.
    #[inline]
    pub fn from_local(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Translate { offset } => point + *offset,
            Shape::Scale { factor } => point * *factor,
            _ => point,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Sphere { radius } => write!(f, "Sphere(radius={radius})"),
            Shape::Tube { radius, axis } => {
                write!(f, "Tube(radius={radius}, axis={})", axis.index())
            }
            Shape::Plane { normal } => {
                write!(f, "Plane(normal=[{}, {}, {}])", normal.x, normal.y, normal.z)
            }
            Shape::Translate { offset } => write!(
                f,
                "Translate(offset=[{}, {}, {}])",
                offset.x, offset.y, offset.z
            ),
            Shape::Scale { factor } => write!(f, "Scale(factor={factor})"),
            Shape::Union | Shape::Difference | Shape::Intersection => {
                write!(f, "{}()", self.kind_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_from_index() {
        assert_eq!(Axis::try_from(0usize).unwrap(), Axis::X);
        assert_eq!(Axis::try_from(2usize).unwrap(), Axis::Z);
        assert!(matches!(Axis::try_from(3usize), Err(SceneError::InvalidAxis(3))));
    }

    #[test]
    fn test_tube_rejects_illegal_axis() {
        assert!(Shape::tube(1.0, 1).is_ok());
        assert!(matches!(Shape::tube(1.0, 7), Err(SceneError::InvalidAxis(7))));
    }

    #[test]
    fn test_leaf_flags() {
        assert!(!Shape::sphere(1.0).can_have_children());
        assert!(!Shape::plane(Vec3::Y).can_have_children());
        assert!(Shape::Union.can_have_children());
        assert!(Shape::scale(2.0).can_have_children());
        assert!(Shape::translate(Vec3::X).is_transform());
        assert!(!Shape::Difference.is_transform());
    }

    #[test]
    fn test_local_round_trip() {
        let point = Vec3::new(1.0, -2.0, 4.0);
        for shape in [
            Shape::translate(Vec3::new(0.5, 1.0, -3.0)),
            Shape::scale(4.0),
            Shape::Union,
        ] {
            assert_eq!(shape.from_local(shape.to_local(point)), point);
        }
        assert_eq!(Shape::scale(2.0).to_local(point), Vec3::new(0.5, -1.0, 2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::sphere(1.0).to_string(), "Sphere(radius=1)");
        assert_eq!(
            Shape::tube(0.5, 1).unwrap().to_string(),
            "Tube(radius=0.5, axis=1)"
        );
        assert_eq!(
            Shape::plane(Vec3::new(0.0, 1.0, 0.0)).to_string(),
            "Plane(normal=[0, 1, 0])"
        );
        assert_eq!(Shape::Union.to_string(), "Union()");
        assert_eq!(Shape::scale(2.5).to_string(), "Scale(factor=2.5)");
    }
}
