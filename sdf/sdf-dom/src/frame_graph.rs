//! Per-scope graph of named frames.
//!
//! Each world and each model owns a [`FrameGraph`]. Its vertices are the
//! scope's own frame (`world` or `__model__`) plus every link, joint, nested
//! model and explicit `<frame>` in that scope. Every vertex carries two
//! outgoing references:
//!
//! - `relative_to`: the frame its raw pose is expressed in (empty means the
//!   scope frame),
//! - `attached_to`: the frame it moves with (empty for bodies and the world).
//!
//! Vertices live in an arena (`Vec`) with a name index, so the graph clones
//! as plain data and never aliases another scope.

use std::collections::{HashMap, HashSet};

use sdf_types::Pose3d;

use crate::error::{Error, ErrorCode, Errors};

/// Name of the world scope's frame.
pub const WORLD_FRAME: &str = "world";

/// Name of a model scope's frame.
pub const MODEL_FRAME: &str = "__model__";

/// What a frame graph vertex stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// The scope's own frame.
    Scope,
    /// A link.
    Link,
    /// A joint.
    Joint,
    /// An explicit `<frame>`.
    Frame,
    /// A model (in a world) or a nested model (in a model).
    Model,
}

/// A named frame and its outgoing references.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVertex {
    name: String,
    kind: FrameKind,
    pose: Pose3d,
    relative_to: String,
    attached_to: String,
}

impl FrameVertex {
    /// Create a vertex whose pose is expressed in the scope frame.
    pub fn new(name: impl Into<String>, kind: FrameKind, pose: Pose3d) -> Self {
        Self {
            name: name.into(),
            kind,
            pose,
            relative_to: String::new(),
            attached_to: String::new(),
        }
    }

    /// Set the frame the pose is expressed in.
    #[must_use]
    pub fn with_relative_to(mut self, relative_to: impl Into<String>) -> Self {
        self.relative_to = relative_to.into();
        self
    }

    /// Set the frame this vertex is attached to.
    #[must_use]
    pub fn with_attached_to(mut self, attached_to: impl Into<String>) -> Self {
        self.attached_to = attached_to.into();
        self
    }

    /// Frame name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex kind.
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Raw pose in the `relative_to` frame.
    #[must_use]
    pub const fn pose(&self) -> &Pose3d {
        &self.pose
    }

    /// Frame the pose is expressed in; empty means the scope frame.
    #[must_use]
    pub fn relative_to(&self) -> &str {
        &self.relative_to
    }

    /// Frame this vertex is attached to.
    #[must_use]
    pub fn attached_to(&self) -> &str {
        &self.attached_to
    }
}

/// Graph of the frames visible in one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGraph {
    vertices: Vec<FrameVertex>,
    index: HashMap<String, usize>,
}

impl FrameGraph {
    /// Create a graph holding only the scope frame.
    pub fn new(scope: impl Into<String>) -> Self {
        Self::with_scope(FrameVertex::new(scope, FrameKind::Scope, Pose3d::identity()))
    }

    /// Create a world-scope graph.
    #[must_use]
    pub fn world() -> Self {
        Self::new(WORLD_FRAME)
    }

    /// Create a model-scope graph whose scope frame is attached to
    /// `canonical` (empty when the model has no canonical body).
    pub fn model(canonical: impl Into<String>) -> Self {
        Self::with_scope(
            FrameVertex::new(MODEL_FRAME, FrameKind::Scope, Pose3d::identity())
                .with_attached_to(canonical),
        )
    }

    fn with_scope(scope: FrameVertex) -> Self {
        let mut index = HashMap::new();
        index.insert(scope.name.clone(), 0);
        Self {
            vertices: vec![scope],
            index,
        }
    }

    /// Name of the scope frame.
    #[must_use]
    pub fn scope_name(&self) -> &str {
        // The scope vertex is always at index 0.
        self.vertices.first().map_or("", |v| v.name.as_str())
    }

    /// Add a vertex.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if a frame of the same name exists.
    pub fn add_vertex(&mut self, vertex: FrameVertex) -> Result<(), Error> {
        if self.index.contains_key(&vertex.name) {
            return Err(Error::new(
                ErrorCode::DuplicateName,
                format!(
                    "frame name [{}] is used by more than one element in scope [{}]",
                    vertex.name,
                    self.scope_name()
                ),
            ));
        }
        self.index.insert(vertex.name.clone(), self.vertices.len());
        self.vertices.push(vertex);
        Ok(())
    }

    /// Whether a frame of this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a vertex by name.
    #[must_use]
    pub fn vertex(&self, name: &str) -> Option<&FrameVertex> {
        self.index.get(name).map(|&i| &self.vertices[i])
    }

    /// All vertices, scope frame first.
    pub fn vertices(&self) -> impl Iterator<Item = &FrameVertex> {
        self.vertices.iter()
    }

    /// Number of vertices, including the scope frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a graph holds at least its scope frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Pose of frame `name` in the scope frame.
    ///
    /// Walks `relative_to` references to the scope frame and composes the raw
    /// poses along the way.
    ///
    /// # Errors
    ///
    /// `FrameNameNotFound` if a name on the chain does not exist,
    /// `PoseCycleDetected` if the chain revisits a frame.
    pub fn pose_in_scope(&self, name: &str) -> Result<Pose3d, Errors> {
        let mut path: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut chain: Vec<&Pose3d> = Vec::new();
        let mut current = name;
        let mut referrer: Option<&str> = None;

        loop {
            let Some(vertex) = self.vertex(current) else {
                let context = referrer.map_or_else(
                    || "pose query".to_string(),
                    |r| format!("relative_to of [{r}]"),
                );
                return Err(vec![Error::frame_not_found(current, context)]);
            };
            path.push(&vertex.name);
            if !visited.insert(&vertex.name) {
                return Err(vec![Error::pose_cycle(&path)]);
            }
            let Some(next) = self.relative_step(vertex) else {
                break;
            };
            chain.push(&vertex.pose);
            referrer = Some(&vertex.name);
            current = next;
        }

        Ok(chain
            .iter()
            .rev()
            .fold(Pose3d::identity(), |acc, pose| acc.compose(pose)))
    }

    /// Pose of frame `name` expressed in frame `relative_to`.
    ///
    /// An empty `relative_to` means the scope frame.
    ///
    /// # Errors
    ///
    /// Errors from resolving either frame, in that order.
    pub fn resolve_pose(&self, name: &str, relative_to: &str) -> Result<Pose3d, Errors> {
        let target = if relative_to.is_empty() {
            self.scope_name()
        } else {
            relative_to
        };
        let from = self.pose_in_scope(name);
        let to = self.pose_in_scope(target);
        match (from, to) {
            (Ok(from), Ok(to)) => Ok(to.inverse().compose(&from)),
            (from, to) => Err(from
                .err()
                .into_iter()
                .chain(to.err())
                .flatten()
                .collect()),
        }
    }

    /// Name of the body frame `name` is ultimately attached to.
    ///
    /// Follows `attached_to` references until reaching a link, a model, or a
    /// scope frame with no attachment of its own.
    ///
    /// # Errors
    ///
    /// `FrameAttachedToInvalid` if a name on the chain does not exist,
    /// `FrameAttachedToCycle` if the chain revisits a frame.
    pub fn resolve_attached_body(&self, name: &str) -> Result<String, Errors> {
        let mut path: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = name;

        loop {
            let Some(vertex) = self.vertex(current) else {
                return Err(vec![self.attached_not_found(current)]);
            };
            path.push(&vertex.name);
            if !visited.insert(&vertex.name) {
                return Err(vec![attached_cycle(&path)]);
            }
            match self.attached_step(vertex) {
                Some(next) => current = next,
                None => return Ok(vertex.name.clone()),
            }
        }
    }

    /// Check every vertex's references.
    ///
    /// Reports each dangling or cyclic `relative_to` chain once, then the
    /// same for the `attached_to` chains of explicit frames and the scope.
    /// Every vertex is visited once per kind of reference.
    #[must_use]
    pub fn validate(&self) -> Errors {
        let mut errors = Errors::new();
        let all = 0..self.vertices.len();
        self.check_chains(
            all.clone(),
            |v| self.relative_step(v),
            |name, from| Error::frame_not_found(name, format!("relative_to of [{}]", from.name)),
            Error::pose_cycle,
            &mut errors,
        );
        let attachable = all.filter(|&i| {
            matches!(self.vertices[i].kind, FrameKind::Frame | FrameKind::Scope)
        });
        self.check_chains(
            attachable,
            |v| self.attached_step(v),
            |name, _| self.attached_not_found(name),
            attached_cycle,
            &mut errors,
        );
        errors
    }

    /// Next frame on the `relative_to` chain, or `None` at the scope frame.
    fn relative_step<'g>(&'g self, vertex: &'g FrameVertex) -> Option<&'g str> {
        if vertex.kind == FrameKind::Scope {
            None
        } else if vertex.relative_to.is_empty() {
            Some(self.scope_name())
        } else {
            Some(&vertex.relative_to)
        }
    }

    /// Next frame on the `attached_to` chain, or `None` at a body.
    fn attached_step<'g>(&'g self, vertex: &'g FrameVertex) -> Option<&'g str> {
        match vertex.kind {
            FrameKind::Link | FrameKind::Model => None,
            FrameKind::Scope if vertex.attached_to.is_empty() => None,
            FrameKind::Scope | FrameKind::Joint => Some(&vertex.attached_to),
            FrameKind::Frame if vertex.attached_to.is_empty() => Some(self.scope_name()),
            FrameKind::Frame => Some(&vertex.attached_to),
        }
    }

    fn attached_not_found(&self, name: &str) -> Error {
        Error::new(
            ErrorCode::FrameAttachedToInvalid,
            format!(
                "attached_to name [{name}] does not exist in scope [{}]",
                self.scope_name()
            ),
        )
    }

    /// Walk the chain from every start vertex, remembering the outcome of each
    /// vertex so that no chain segment is walked twice.
    fn check_chains<'g>(
        &'g self,
        starts: impl Iterator<Item = usize>,
        step: impl Fn(&'g FrameVertex) -> Option<&'g str>,
        not_found: impl Fn(&str, &FrameVertex) -> Error,
        cycle: impl Fn(&[&str]) -> Error,
        errors: &mut Errors,
    ) {
        let mut marks = vec![Mark::Unvisited; self.vertices.len()];

        for start in starts {
            let mut path: Vec<usize> = Vec::new();
            let mut current = start;
            let resolved = loop {
                match marks[current] {
                    Mark::Resolved => break true,
                    Mark::Failed => break false,
                    Mark::OnPath => {
                        let from = path.iter().position(|&i| i == current).unwrap_or(0);
                        let mut names: Vec<&str> =
                            path[from..].iter().map(|&i| self.vertices[i].name.as_str()).collect();
                        names.push(&self.vertices[current].name);
                        errors.push(cycle(&names));
                        break false;
                    }
                    Mark::Unvisited => {}
                }
                marks[current] = Mark::OnPath;
                path.push(current);

                let vertex = &self.vertices[current];
                let Some(next) = step(vertex) else {
                    break true;
                };
                match self.index.get(next) {
                    Some(&i) => current = i,
                    None => {
                        errors.push(not_found(next, vertex));
                        break false;
                    }
                }
            };

            let mark = if resolved { Mark::Resolved } else { Mark::Failed };
            for i in path {
                marks[i] = mark;
            }
        }
    }
}

/// Walk state of a vertex during [`FrameGraph::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Resolved,
    Failed,
}

fn attached_cycle(path: &[&str]) -> Error {
    Error::new(
        ErrorCode::FrameAttachedToCycle,
        format!("attached_to cycle detected: {}", path.join(" -> ")),
    )
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::world()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    fn frame(name: &str, pose: Pose3d) -> FrameVertex {
        FrameVertex::new(name, FrameKind::Frame, pose)
    }

    #[test]
    fn test_single_frame_resolves_exactly() {
        let mut graph = FrameGraph::world();
        let pose = Pose3d::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        graph.add_vertex(frame("frame1", pose)).unwrap();

        assert_eq!(graph.pose_in_scope("frame1").unwrap(), pose);
        assert_eq!(graph.resolve_pose("frame1", "world").unwrap(), pose);
        assert_eq!(graph.resolve_pose("frame1", "").unwrap(), pose);
    }

    #[test]
    fn test_chain_composes_in_reference_order() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("a", Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, FRAC_PI_2)))
            .unwrap();
        graph
            .add_vertex(
                frame("b", Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)).with_relative_to("a"),
            )
            .unwrap();

        // b sits one unit along a's rotated x axis.
        let b = graph.pose_in_scope("b").unwrap();
        assert_relative_eq!(b.position.coords, Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);

        let a_in_b = graph.resolve_pose("a", "b").unwrap();
        assert_relative_eq!(
            a_in_b.position.coords,
            Vector3::new(-1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("A", Pose3d::identity()).with_relative_to("B"))
            .unwrap();
        graph
            .add_vertex(frame("B", Pose3d::identity()).with_relative_to("A"))
            .unwrap();

        let errors = graph.pose_in_scope("A").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::PoseCycleDetected);
        assert!(errors[0].message().contains("A -> B -> A"));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("A", Pose3d::identity()).with_relative_to("A"))
            .unwrap();
        let errors = graph.pose_in_scope("A").unwrap_err();
        assert_eq!(errors[0].code(), ErrorCode::PoseCycleDetected);
    }

    #[test]
    fn test_missing_frame() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("A", Pose3d::identity()).with_relative_to("ghost"))
            .unwrap();

        let errors = graph.pose_in_scope("A").unwrap_err();
        assert_eq!(errors[0].code(), ErrorCode::FrameNameNotFound);
        assert!(errors[0].message().contains("ghost"));

        let errors = graph.resolve_pose("nope", "also_nope").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_duplicate_vertex() {
        let mut graph = FrameGraph::world();
        graph.add_vertex(frame("A", Pose3d::identity())).unwrap();
        let err = graph.add_vertex(frame("A", Pose3d::identity())).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateName);
        assert_eq!(graph.len(), 2);

        let err = graph
            .add_vertex(frame(WORLD_FRAME, Pose3d::identity()))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateName);
    }

    #[test]
    fn test_attached_body() {
        let mut graph = FrameGraph::model("base");
        graph
            .add_vertex(FrameVertex::new("base", FrameKind::Link, Pose3d::identity()))
            .unwrap();
        graph
            .add_vertex(frame("f1", Pose3d::identity()).with_attached_to("base"))
            .unwrap();
        graph
            .add_vertex(frame("f2", Pose3d::identity()).with_attached_to("f1"))
            .unwrap();
        graph.add_vertex(frame("f3", Pose3d::identity())).unwrap();

        assert_eq!(graph.resolve_attached_body("f2").unwrap(), "base");
        // Unattached frames follow the scope frame to the canonical link.
        assert_eq!(graph.resolve_attached_body("f3").unwrap(), "base");
        assert!(graph.validate().is_empty());
    }

    #[test]
    fn test_attached_errors() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("x", Pose3d::identity()).with_attached_to("y"))
            .unwrap();
        graph
            .add_vertex(frame("y", Pose3d::identity()).with_attached_to("x"))
            .unwrap();
        graph
            .add_vertex(frame("z", Pose3d::identity()).with_attached_to("missing"))
            .unwrap();

        let err = graph.resolve_attached_body("x").unwrap_err();
        assert_eq!(err[0].code(), ErrorCode::FrameAttachedToCycle);
        let err = graph.resolve_attached_body("z").unwrap_err();
        assert_eq!(err[0].code(), ErrorCode::FrameAttachedToInvalid);

        let codes: Vec<_> = graph.validate().iter().map(Error::code).collect();
        assert!(codes.contains(&ErrorCode::FrameAttachedToCycle));
        assert!(codes.contains(&ErrorCode::FrameAttachedToInvalid));
    }

    #[test]
    fn test_world_frame_attaches_to_world() {
        let mut graph = FrameGraph::world();
        graph.add_vertex(frame("f", Pose3d::identity())).unwrap();
        assert_eq!(graph.resolve_attached_body("f").unwrap(), WORLD_FRAME);
    }

    #[test]
    fn test_long_chain_validates_in_one_pass() {
        const N: usize = 20_000;
        let mut graph = FrameGraph::world();
        for i in 0..N {
            let mut vertex = frame(&format!("f{i}"), Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0));
            if i > 0 {
                vertex = vertex.with_relative_to(format!("f{}", i - 1));
            }
            graph.add_vertex(vertex).unwrap();
        }

        assert!(graph.validate().is_empty());
        let last = graph.pose_in_scope(&format!("f{}", N - 1)).unwrap();
        assert_relative_eq!(last.position.x, N as f64, epsilon = 1e-9);
    }

    #[test]
    fn test_cycle_reported_once_per_cycle() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("A", Pose3d::identity()).with_relative_to("B"))
            .unwrap();
        graph
            .add_vertex(frame("B", Pose3d::identity()).with_relative_to("A"))
            .unwrap();
        graph
            .add_vertex(frame("C", Pose3d::identity()).with_relative_to("A"))
            .unwrap();
        graph
            .add_vertex(frame("D", Pose3d::identity()).with_relative_to("ghost"))
            .unwrap();
        graph
            .add_vertex(frame("E", Pose3d::identity()).with_relative_to("D"))
            .unwrap();

        let errors = graph.validate();
        let codes: Vec<_> = errors.iter().map(Error::code).collect();
        assert_eq!(
            codes,
            vec![ErrorCode::PoseCycleDetected, ErrorCode::FrameNameNotFound]
        );
        assert!(errors[0].message().contains("A -> B -> A"));
    }

    #[test]
    fn test_resolution_is_read_only() {
        let mut graph = FrameGraph::world();
        graph
            .add_vertex(frame("a", Pose3d::new(0.5, 0.0, 0.0, 0.1, 0.2, 0.3)))
            .unwrap();
        let before = graph.clone();
        let first = graph.pose_in_scope("a").unwrap();
        let second = graph.pose_in_scope("a").unwrap();
        assert_eq!(first, second);
        assert_eq!(graph, before);
    }
}
