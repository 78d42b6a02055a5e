//! Geometry sum type embedded in collisions and visuals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::{BoxShape, Capsule, Cylinder, Ellipsoid, Mesh, Plane, Sphere};

/// The shape held by a `<geometry>` element.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    /// `<geometry>` with no shape child.
    #[default]
    Empty,
    /// `<box>`.
    Box(BoxShape),
    /// `<cylinder>`.
    Cylinder(Cylinder),
    /// `<sphere>`.
    Sphere(Sphere),
    /// `<capsule>`.
    Capsule(Capsule),
    /// `<ellipsoid>`.
    Ellipsoid(Ellipsoid),
    /// `<plane>`.
    Plane(Plane),
    /// `<mesh>`.
    Mesh(Mesh),
}

impl Geometry {
    /// The XML tag of the shape, or `"empty"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Box(_) => "box",
            Self::Cylinder(_) => "cylinder",
            Self::Sphere(_) => "sphere",
            Self::Capsule(_) => "capsule",
            Self::Ellipsoid(_) => "ellipsoid",
            Self::Plane(_) => "plane",
            Self::Mesh(_) => "mesh",
        }
    }

    /// Volume of closed primitive shapes; `None` for empty, plane and mesh.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        match self {
            Self::Box(s) => Some(s.volume()),
            Self::Cylinder(s) => Some(s.volume()),
            Self::Sphere(s) => Some(s.volume()),
            Self::Capsule(s) => Some(s.volume()),
            Self::Ellipsoid(s) => Some(s.volume()),
            Self::Empty | Self::Plane(_) | Self::Mesh(_) => None,
        }
    }

    /// The cylinder, if this is one.
    #[must_use]
    pub fn as_cylinder(&self) -> Option<&Cylinder> {
        match self {
            Self::Cylinder(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable access to the cylinder, if this is one.
    pub fn as_cylinder_mut(&mut self) -> Option<&mut Cylinder> {
        match self {
            Self::Cylinder(c) => Some(c),
            _ => None,
        }
    }

    /// The box, if this is one.
    #[must_use]
    pub fn as_box(&self) -> Option<&BoxShape> {
        match self {
            Self::Box(b) => Some(b),
            _ => None,
        }
    }

    /// The sphere, if this is one.
    #[must_use]
    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Self::Sphere(s) => Some(s),
            _ => None,
        }
    }

    /// The mesh, if this is one.
    #[must_use]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_type_names() {
        assert_eq!(Geometry::default().type_name(), "empty");
        assert_eq!(Geometry::Cylinder(Cylinder::default()).type_name(), "cylinder");
        assert_eq!(Geometry::Mesh(Mesh::new("model://m.dae")).type_name(), "mesh");
    }

    #[test]
    fn test_volume_dispatch() {
        let b = Geometry::Box(BoxShape::new(Vector3::new(3.0, 4.0, 5.0)));
        assert_eq!(b.volume(), Some(60.0));
        assert_eq!(Geometry::Plane(Plane::default()).volume(), None);
    }

    #[test]
    fn test_mutation_through_accessor() {
        let mut geom = Geometry::Cylinder(Cylinder::default());
        let snapshot = geom.clone();
        geom.as_cylinder_mut().unwrap().set_radius(0.123);
        assert_eq!(geom.as_cylinder().unwrap().radius(), 0.123);
        assert_eq!(snapshot.as_cylinder().unwrap().radius(), 0.5);
    }
}
