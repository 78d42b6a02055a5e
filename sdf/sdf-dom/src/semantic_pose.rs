//! Pose queries against a scope's frame graph.

use sdf_types::Pose3d;

use crate::error::Errors;
use crate::frame_graph::FrameGraph;

/// A DOM object's raw pose together with what it is expressed in.
///
/// Obtained from an object's `semantic_pose` method. Resolution only reads
/// the graph; the result reflects the graph as it is at call time.
///
/// # Example
///
/// ```
/// use sdf_dom::Root;
///
/// let mut root = Root::new();
/// let errors = root.load_sdf_string(
///     r#"<sdf version="1.9">
///          <world name="default">
///            <frame name="frame1"><pose>0 1 0 0 0 0</pose></frame>
///          </world>
///        </sdf>"#,
/// );
/// assert!(errors.is_empty());
///
/// let world = root.world_by_index(0).unwrap();
/// let frame = world.frame_by_name("frame1").unwrap();
/// let pose = frame.semantic_pose(world.frame_graph()).resolve().unwrap();
/// assert_eq!(pose.position.y, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SemanticPose<'a> {
    graph: &'a FrameGraph,
    vertex: Option<&'a str>,
    raw_pose: Pose3d,
    relative_to: &'a str,
    default_resolve_to: &'a str,
}

impl<'a> SemanticPose<'a> {
    /// Semantic pose of an object that is itself a vertex of `graph`.
    pub(crate) fn for_vertex(
        graph: &'a FrameGraph,
        name: &'a str,
        raw_pose: Pose3d,
        relative_to: &'a str,
        default_resolve_to: &'a str,
    ) -> Self {
        Self {
            graph,
            vertex: Some(name),
            raw_pose,
            relative_to,
            default_resolve_to,
        }
    }

    /// Semantic pose of an object that is not a vertex, such as a collision.
    ///
    /// An empty `relative_to` means the object's parent, `parent`, which is
    /// also the default resolution target.
    pub(crate) fn for_child(
        graph: &'a FrameGraph,
        raw_pose: Pose3d,
        relative_to: &'a str,
        parent: &'a str,
    ) -> Self {
        Self {
            graph,
            vertex: None,
            raw_pose,
            relative_to,
            default_resolve_to: parent,
        }
    }

    /// The pose as written.
    #[must_use]
    pub const fn raw_pose(&self) -> &Pose3d {
        &self.raw_pose
    }

    /// The frame the raw pose is expressed in; empty means the default.
    #[must_use]
    pub fn relative_to(&self) -> &str {
        self.relative_to
    }

    /// The frame [`resolve`](Self::resolve) expresses its result in.
    #[must_use]
    pub fn default_resolve_to(&self) -> &str {
        self.default_resolve_to
    }

    /// Resolve the pose in the default frame.
    ///
    /// # Errors
    ///
    /// `FrameNameNotFound` or `PoseCycleDetected` from walking the graph. No
    /// pose is produced on failure.
    pub fn resolve(&self) -> Result<Pose3d, Errors> {
        self.resolve_relative_to(self.default_resolve_to)
    }

    /// Resolve the pose in frame `frame`; empty means the scope frame.
    ///
    /// # Errors
    ///
    /// As for [`resolve`](Self::resolve).
    pub fn resolve_relative_to(&self, frame: &str) -> Result<Pose3d, Errors> {
        let target = if frame.is_empty() {
            self.graph.scope_name()
        } else {
            frame
        };
        let x_scope_target = self.graph.pose_in_scope(target);
        let x_scope_self = self.pose_in_scope();

        match (x_scope_self, x_scope_target) {
            (Ok(x_self), Ok(x_target)) => Ok(x_target.inverse().compose(&x_self)),
            (x_self, x_target) => Err(x_self
                .err()
                .into_iter()
                .chain(x_target.err())
                .flatten()
                .collect()),
        }
    }

    fn pose_in_scope(&self) -> Result<Pose3d, Errors> {
        if let Some(name) = self.vertex {
            return self.graph.pose_in_scope(name);
        }
        let base = if self.relative_to.is_empty() {
            self.default_resolve_to
        } else {
            self.relative_to
        };
        let base = if base.is_empty() {
            self.graph.scope_name()
        } else {
            base
        };
        Ok(self.graph.pose_in_scope(base)?.compose(&self.raw_pose))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::frame_graph::{FrameKind, FrameVertex};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn graph() -> FrameGraph {
        let mut graph = FrameGraph::model("link");
        graph
            .add_vertex(FrameVertex::new(
                "link",
                FrameKind::Link,
                Pose3d::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0),
            ))
            .unwrap();
        graph
            .add_vertex(
                FrameVertex::new(
                    "marker",
                    FrameKind::Frame,
                    Pose3d::new(2.0, 0.0, 0.0, 0.0, 0.0, 0.0),
                )
                .with_relative_to("link")
                .with_attached_to("link"),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_vertex_resolves_in_scope() {
        let graph = graph();
        let pose = SemanticPose::for_vertex(&graph, "marker", Pose3d::identity(), "link", "");
        let resolved = pose.resolve().unwrap();
        assert_relative_eq!(
            resolved.position.coords,
            Vector3::new(2.0, 0.0, 1.0),
            epsilon = 1e-12
        );

        let in_link = pose.resolve_relative_to("link").unwrap();
        assert_relative_eq!(
            in_link.position.coords,
            Vector3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_child_defaults_to_parent() {
        let graph = graph();
        let raw = Pose3d::new(0.0, 0.5, 0.0, 0.0, 0.0, 0.0);
        let pose = SemanticPose::for_child(&graph, raw, "", "link");

        // Relative to the parent link the pose is the raw pose.
        let resolved = pose.resolve().unwrap();
        assert_relative_eq!(resolved.position.coords, raw.position.coords, epsilon = 1e-12);

        let in_model = pose.resolve_relative_to("").unwrap();
        assert_relative_eq!(
            in_model.position.coords,
            Vector3::new(0.0, 0.5, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_child_relative_to_other_frame() {
        let graph = graph();
        let raw = Pose3d::new(0.0, 0.0, 0.5, 0.0, 0.0, 0.0);
        let pose = SemanticPose::for_child(&graph, raw, "marker", "link");
        let resolved = pose.resolve().unwrap();
        assert_relative_eq!(
            resolved.position.coords,
            Vector3::new(2.0, 0.0, 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_unknown_target() {
        let graph = graph();
        let pose = SemanticPose::for_vertex(&graph, "link", Pose3d::identity(), "", "");
        let errors = pose.resolve_relative_to("nowhere").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::FrameNameNotFound);
    }
}
