//! `<collision>` elements.

use sdf_types::{Geometry, Pose3d};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::frame_graph::FrameGraph;
use crate::geometry::{geometry_element, load_geometry};
use crate::parse::{Load, check_children, describe, load_frame_name, load_pose, push_pose};
use crate::semantic_pose::SemanticPose;

/// Collision shape of a link.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collision {
    name: String,
    pose: Pose3d,
    pose_relative_to: String,
    geometry: Geometry,
    xml_parent_name: String,
}

impl Collision {
    /// Create a collision with an empty geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Collision name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Pose as written, in [`pose_relative_to`](Self::pose_relative_to).
    #[must_use]
    pub const fn raw_pose(&self) -> &Pose3d {
        &self.pose
    }

    /// Set the raw pose.
    pub fn set_raw_pose(&mut self, pose: Pose3d) {
        self.pose = pose;
    }

    /// Frame the pose is expressed in; empty means the parent link.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Collision geometry.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable collision geometry.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Set the geometry.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    /// Name of the link this collision belongs to.
    #[must_use]
    pub fn xml_parent_name(&self) -> &str {
        &self.xml_parent_name
    }

    pub(crate) fn set_xml_parent_name(&mut self, name: &str) {
        self.xml_parent_name = name.to_string();
    }

    /// Pose query against the enclosing model's frame graph.
    ///
    /// Resolves relative to the parent link by default.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_child(
            graph,
            self.pose,
            &self.pose_relative_to,
            &self.xml_parent_name,
        )
    }

    /// Write as a `<collision>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("collision").with_attribute("name", &self.name);
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        element.push_child(geometry_element(&self.geometry));
        element
    }
}

impl Load for Collision {
    const TAG: &'static str = "collision";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;
        let Some(geometry) = element.child("geometry") else {
            errors.push(Error::missing_element("geometry", describe(element)));
            return None;
        };

        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(
            element,
            &["pose", "geometry", "surface", "laser_retro", "max_contacts", "density"],
            config,
            errors,
        );

        Some(Self {
            name,
            pose,
            pose_relative_to,
            geometry: load_geometry(geometry, config, errors),
            xml_parent_name: String::new(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
