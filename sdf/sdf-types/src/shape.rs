//! Primitive shape value objects.
//!
//! Every shape is a plain value: cloning produces an independent instance and
//! setters store whatever they are given. Derived quantities such as
//! [`Cylinder::volume`] are recomputed from the current fields on every call,
//! so a negative dimension simply yields a degenerate (possibly negative)
//! result rather than an error.

use std::f64::consts::PI;

use nalgebra::{Vector2, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Box
// ============================================================================

/// Axis-aligned box given by its full edge lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxShape {
    size: Vector3<f64>,
}

impl Default for BoxShape {
    fn default() -> Self {
        Self {
            size: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl BoxShape {
    /// Create a box with the given edge lengths.
    #[must_use]
    pub fn new(size: Vector3<f64>) -> Self {
        Self { size }
    }

    /// Edge lengths in meters.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.size
    }

    /// Set the edge lengths.
    pub fn set_size(&mut self, size: Vector3<f64>) {
        self.size = size;
    }

    /// Volume in cubic meters.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }
}

// ============================================================================
// Cylinder
// ============================================================================

/// Cylinder aligned with its local Z axis.
///
/// # Example
///
/// ```
/// use sdf_types::Cylinder;
///
/// let mut cylinder = Cylinder::default();
/// assert_eq!(cylinder.radius(), 0.5);
/// assert_eq!(cylinder.length(), 1.0);
///
/// let snapshot = cylinder;
/// cylinder.set_radius(2.0);
/// assert_eq!(snapshot.radius(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cylinder {
    radius: f64,
    length: f64,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            radius: 0.5,
            length: 1.0,
        }
    }
}

impl Cylinder {
    /// Create a cylinder from radius and length.
    #[must_use]
    pub const fn new(radius: f64, length: f64) -> Self {
        Self { radius, length }
    }

    /// Radius in meters.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the radius. Not validated.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Length along Z in meters.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Set the length. Not validated.
    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    /// Volume, `π r² l`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        PI * self.radius.powi(2) * self.length
    }
}

// ============================================================================
// Sphere
// ============================================================================

/// Sphere centered on its frame origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sphere {
    radius: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl Sphere {
    /// Create a sphere with the given radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Radius in meters.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the radius.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Volume, `4/3 π r³`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }
}

// ============================================================================
// Capsule
// ============================================================================

/// Cylinder with hemispherical caps, aligned with local Z.
///
/// `length` is the length of the cylindrical section only.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capsule {
    radius: f64,
    length: f64,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            radius: 0.5,
            length: 1.0,
        }
    }
}

impl Capsule {
    /// Create a capsule from radius and cylinder length.
    #[must_use]
    pub const fn new(radius: f64, length: f64) -> Self {
        Self { radius, length }
    }

    /// Radius in meters.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the radius.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Length of the cylindrical section in meters.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Set the cylindrical length.
    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    /// Volume of the cylinder plus both caps.
    #[must_use]
    pub fn volume(&self) -> f64 {
        PI * self.radius.powi(2) * self.length + 4.0 / 3.0 * PI * self.radius.powi(3)
    }
}

// ============================================================================
// Ellipsoid
// ============================================================================

/// Ellipsoid with semi-axes along local X, Y and Z.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    radii: Vector3<f64>,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self {
            radii: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Ellipsoid {
    /// Create an ellipsoid from its three semi-axes.
    #[must_use]
    pub fn new(radii: Vector3<f64>) -> Self {
        Self { radii }
    }

    /// Semi-axes in meters.
    #[must_use]
    pub fn radii(&self) -> Vector3<f64> {
        self.radii
    }

    /// Set the semi-axes.
    pub fn set_radii(&mut self, radii: Vector3<f64>) {
        self.radii = radii;
    }

    /// Volume, `4/3 π abc`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radii.x * self.radii.y * self.radii.z
    }
}

// ============================================================================
// Plane
// ============================================================================

/// Plane through the frame origin. `size` only bounds rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    normal: Vector3<f64>,
    size: Vector2<f64>,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vector3::z(),
            size: Vector2::new(1.0, 1.0),
        }
    }
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal falls back to +Z.
    #[must_use]
    pub fn new(normal: Vector3<f64>, size: Vector2<f64>) -> Self {
        let mut plane = Self {
            normal: Vector3::z(),
            size,
        };
        plane.set_normal(normal);
        plane
    }

    /// Unit normal.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Set the normal; it is stored normalized.
    pub fn set_normal(&mut self, normal: Vector3<f64>) {
        self.normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
    }

    /// Extent along the plane's two in-plane axes.
    #[must_use]
    pub fn size(&self) -> Vector2<f64> {
        self.size
    }

    /// Set the in-plane extent.
    pub fn set_size(&mut self, size: Vector2<f64>) {
        self.size = size;
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// Reference to an external mesh resource.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// Resource URI.
    pub uri: String,
    /// Per-axis scale.
    pub scale: Vector3<f64>,
    /// Optional submesh name.
    pub submesh: Option<String>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            uri: String::new(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            submesh: None,
        }
    }
}

impl Mesh {
    /// Create a mesh reference with unit scale.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }
}
