//! Explicit `<frame>` elements.

use sdf_types::Pose3d;

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::Errors;
use crate::frame_graph::{FrameGraph, FrameKind, FrameVertex};
use crate::parse::{Load, check_children, load_frame_name, load_pose, push_pose};
use crate::semantic_pose::SemanticPose;

/// A named coordinate frame with no body of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    name: String,
    attached_to: String,
    pose: Pose3d,
    pose_relative_to: String,
}

impl Frame {
    /// Create a frame at the identity pose, attached to the scope frame.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Frame name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Frame this one is attached to; empty means the scope frame.
    #[must_use]
    pub fn attached_to(&self) -> &str {
        &self.attached_to
    }

    /// Set the frame this one is attached to.
    pub fn set_attached_to(&mut self, frame: impl Into<String>) {
        self.attached_to = frame.into();
    }

    /// Pose as written.
    #[must_use]
    pub const fn raw_pose(&self) -> &Pose3d {
        &self.pose
    }

    /// Set the raw pose.
    pub fn set_raw_pose(&mut self, pose: Pose3d) {
        self.pose = pose;
    }

    /// Frame the pose is expressed in; empty means `attached_to`.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Pose query against the enclosing scope's frame graph.
    ///
    /// Resolves relative to `attached_to` by default.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_vertex(
            graph,
            &self.name,
            self.pose,
            &self.pose_relative_to,
            &self.attached_to,
        )
    }

    /// Name of the link, model or world this frame ultimately moves with.
    ///
    /// # Errors
    ///
    /// `FrameAttachedToInvalid` or `FrameAttachedToCycle`.
    pub fn resolve_attached_to_body(&self, graph: &FrameGraph) -> Result<String, Errors> {
        graph.resolve_attached_body(&self.name)
    }

    pub(crate) fn vertex(&self) -> FrameVertex {
        let relative_to = if self.pose_relative_to.is_empty() {
            &self.attached_to
        } else {
            &self.pose_relative_to
        };
        FrameVertex::new(self.name.as_str(), FrameKind::Frame, self.pose)
            .with_relative_to(relative_to.as_str())
            .with_attached_to(self.attached_to.as_str())
    }

    /// Write as a `<frame>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("frame").with_attribute("name", &self.name);
        if !self.attached_to.is_empty() {
            element.set_attribute("attached_to", &self.attached_to);
        }
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        element
    }
}

impl Load for Frame {
    const TAG: &'static str = "frame";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;
        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(element, &["pose"], config, errors);
        Some(Self {
            name,
            attached_to: element.attribute("attached_to").unwrap_or_default().to_string(),
            pose,
            pose_relative_to,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::parse_element_str;
    use crate::error::ErrorCode;

    #[test]
    fn test_load() {
        let element = parse_element_str(
            "<frame name='f' attached_to='link'><pose relative_to='other'>1 0 0 0 0 0</pose></frame>",
        )
        .unwrap();
        let mut errors = Errors::new();
        let frame = Frame::load(&element, &ParserConfig::default(), &mut errors).unwrap();
        assert!(errors.is_empty());
        assert_eq!(frame.attached_to(), "link");
        assert_eq!(frame.pose_relative_to(), "other");

        let vertex = frame.vertex();
        assert_eq!(vertex.relative_to(), "other");
        assert_eq!(vertex.attached_to(), "link");
    }

    #[test]
    fn test_relative_to_defaults_to_attached_to() {
        let mut frame = Frame::new("f");
        frame.set_attached_to("link");
        assert_eq!(frame.vertex().relative_to(), "link");
    }

    #[test]
    fn test_reserved_name() {
        let element = parse_element_str("<frame name='world'/>").unwrap();
        let mut errors = Errors::new();
        assert!(Frame::load(&element, &ParserConfig::default(), &mut errors).is_none());
        assert_eq!(errors[0].code(), ErrorCode::ReservedName);
    }

    #[test]
    fn test_resolve_attached_to_body() {
        let mut graph = FrameGraph::world();
        let mut frame = Frame::new("f");
        frame.set_raw_pose(Pose3d::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0));
        graph.add_vertex(frame.vertex()).unwrap();

        assert_eq!(frame.resolve_attached_to_body(&graph).unwrap(), "world");
        assert_eq!(
            frame.semantic_pose(&graph).resolve().unwrap(),
            Pose3d::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0)
        );
    }
}
