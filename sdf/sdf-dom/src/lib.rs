//! SDFormat document object model with frame semantics.
//!
//! This crate loads scene descriptions into a typed object model and answers
//! pose queries over the frames they declare:
//!
//! - [`Element`] / [`parse_element_str`] - XML text to a plain element tree
//! - [`Root`], [`World`], [`Model`], [`Link`], [`Joint`], [`Frame`],
//!   [`Collision`], [`Visual`], [`Light`], [`Actor`] - the typed DOM
//! - [`FrameGraph`] / [`SemanticPose`] - relative pose resolution per scope
//! - [`Error`] / [`ErrorCode`] - accumulated load and resolution errors
//!
//! # Loading
//!
//! Loading never stops at the first problem. [`Root::load_sdf_string`]
//! returns every error it found, and whatever could be loaded stays
//! available. Only malformed markup aborts a load.
//!
//! # Frame semantics
//!
//! Every world and model owns a [`FrameGraph`] whose vertices are its links,
//! joints, nested models and explicit frames. A pose is a transform relative
//! to a named frame of the same scope; resolving walks `relative_to` edges to
//! the scope frame and composes the transforms on the way. Cycles are
//! detected and reported as [`ErrorCode::PoseCycleDetected`].
//!
//! # Example
//!
//! ```
//! use sdf_dom::Root;
//! use sdf_dom::sdf_types::Pose3d;
//!
//! let mut root = Root::new();
//! let errors = root.load_sdf_string(
//!     r#"<sdf version="1.9">
//!          <world name="default">
//!            <frame name="table"><pose>1 0 0.5 0 0 0</pose></frame>
//!            <frame name="cup"><pose relative_to="table">0 1 0 0 0 0</pose></frame>
//!          </world>
//!        </sdf>"#,
//! );
//! assert!(errors.is_empty());
//!
//! let world = root.world_by_index(0).unwrap();
//! let cup = world.frame_by_name("cup").unwrap();
//! let pose = cup.semantic_pose(world.frame_graph()).resolve().unwrap();
//! assert_eq!(pose, Pose3d::new(1.0, 1.0, 0.5, 0.0, 0.0, 0.0));
//! ```
//!
//! # Ownership
//!
//! Containers own their children. `*_by_index` and `*_by_name` borrow into
//! that storage and `*_mut` variants allow in-place edits; `clone()` is a
//! deep copy sharing nothing with the original. Nothing here is
//! synchronized, so a [`Root`] shared between threads needs an external lock.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::too_many_lines)]

mod actor;
mod collision;
mod config;
mod element;
mod error;
mod frame;
mod frame_graph;
mod geometry;
mod joint;
mod light;
mod link;
mod model;
mod parse;
mod root;
mod semantic_pose;
mod visual;
mod world;

pub use actor::{Actor, Animation, Script, Skin, Trajectory, Waypoint};
pub use collision::Collision;
pub use config::{EnforcementPolicy, ParserConfig};
pub use element::{Element, parse_element_str};
pub use error::{Error, ErrorCode, Errors};
pub use frame::Frame;
pub use frame_graph::{FrameGraph, FrameKind, FrameVertex, MODEL_FRAME, WORLD_FRAME};
pub use joint::{Joint, JointAxis, JointType};
pub use light::{Attenuation, Light, LightType, Spot};
pub use link::{Inertia, Inertial, Link};
pub use model::Model;
pub use root::{Root, RootContent};
pub use semantic_pose::SemanticPose;
pub use visual::{Material, Visual};
pub use world::World;

// Re-export the value types so callers need a single dependency.
pub use sdf_types;

/// Version written by [`Root::to_xml_string`] for new documents.
pub const SDF_VERSION: &str = "1.9";

/// Newest document version this crate understands.
///
/// Documents declaring another version still load; the difference is only
/// logged.
pub const SDF_PROTOCOL_VERSION: &str = "1.9";
