//! Value types for SDFormat scene descriptions.
//!
//! This crate provides the plain data shared by every layer of the scene
//! description stack:
//!
//! - [`Pose3d`] - Position and orientation of one frame in another
//! - [`Color`] - RGBA colors for lights and materials
//! - Shapes ([`BoxShape`], [`Cylinder`], [`Sphere`], [`Capsule`],
//!   [`Ellipsoid`], [`Plane`], [`Mesh`]) and the [`Geometry`] sum type
//!
//! # Design Philosophy
//!
//! These types are **pure data** with copy semantics. Cloning a shape or a
//! pose never aliases the original, and setters store values as given:
//! dimensions are not validated, derived quantities (volume) are recomputed
//! from the current fields on every call.
//!
//! # Example
//!
//! ```
//! use sdf_types::{Cylinder, Geometry};
//! use std::f64::consts::PI;
//!
//! let mut cylinder = Cylinder::default();
//! cylinder.set_radius(0.2);
//! cylinder.set_length(3.0);
//! assert!((cylinder.volume() - PI * 0.04 * 3.0).abs() < 1e-12);
//!
//! let geometry = Geometry::Cylinder(cylinder);
//! assert_eq!(geometry.type_name(), "cylinder");
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::many_single_char_names
)]

mod color;
mod error;
mod geometry;
mod pose;
mod shape;
mod vector;

pub use color::Color;
pub use error::ValueParseError;
pub use geometry::Geometry;
pub use pose::Pose3d;
pub use shape::{BoxShape, Capsule, Cylinder, Ellipsoid, Mesh, Plane, Sphere};
pub use vector::{format_vector2, format_vector3, parse_vector2, parse_vector3};

// Re-export nalgebra so downstream crates agree on the math types.
pub use nalgebra;
