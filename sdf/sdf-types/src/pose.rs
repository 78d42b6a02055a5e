//! Rigid transform type used for every `<pose>` in a scene description.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ValueParseError, parse_floats};

/// Position and orientation of a frame relative to another frame.
///
/// The text form is six numbers, `x y z roll pitch yaw`, with the rotation
/// given as fixed-axis roll/pitch/yaw in radians.
///
/// # Example
///
/// ```
/// use sdf_types::Pose3d;
///
/// let a = Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
/// let b = Pose3d::new(0.0, 2.0, 0.0, 0.0, 0.0, 0.0);
/// let ab = a.compose(&b);
/// assert_eq!(ab, Pose3d::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0));
///
/// let parsed: Pose3d = "0 1 0 0 0 0".parse().unwrap();
/// assert_eq!(parsed.position.y, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose3d {
    /// Translation.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose3d {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose3d {
    /// Create a pose from a translation and fixed-axis roll/pitch/yaw.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            rotation: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// The identity pose.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// Roll, pitch and yaw of the rotation, in radians.
    #[must_use]
    pub fn rpy(&self) -> Vector3<f64> {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        Vector3::new(roll, pitch, yaw)
    }

    /// Transform a point from this pose's frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Compute the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two poses: `self * other`.
    ///
    /// If `self` is the pose of frame B in frame A and `other` is the pose of
    /// frame C in frame B, the result is the pose of C in A.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}

impl fmt::Display for Pose3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpy = self.rpy();
        let values = [
            self.position.x,
            self.position.y,
            self.position.z,
            rpy.x,
            rpy.y,
            rpy.z,
        ];
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            // Avoid printing "-0".
            write!(f, "{}", if *v == 0.0 { 0.0 } else { *v })?;
        }
        Ok(())
    }
}

impl FromStr for Pose3d {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, z, roll, pitch, yaw] = parse_floats::<6>(s, "pose")?;
        Ok(Self::new(x, y, z, roll, pitch, yaw))
    }
}
