//! `<model>` elements and the model-scope frame graph.

use sdf_types::Pose3d;

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, ErrorCode, Errors};
use crate::frame::Frame;
use crate::frame_graph::{FrameGraph, FrameKind, FrameVertex, MODEL_FRAME, WORLD_FRAME};
use crate::joint::Joint;
use crate::link::Link;
use crate::parse::{
    Load, child_bool, describe, load_frame_name, load_pose, load_unique_repeated, push_pose,
    push_value, unknown_children,
};
use crate::semantic_pose::SemanticPose;

/// A collection of links, joints and frames, possibly nesting other models.
///
/// The model owns a frame graph rooted at `__model__`. It is rebuilt when the
/// model is loaded and by every `add_*`/`clear_*` call, which return the
/// rebuilt graph's errors. After editing children through `*_mut` accessors,
/// call [`build_frame_graph`](Self::build_frame_graph).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    pose: Pose3d,
    pose_relative_to: String,
    is_static: bool,
    self_collide: bool,
    canonical_link: String,
    links: Vec<Link>,
    joints: Vec<Joint>,
    frames: Vec<Frame>,
    models: Vec<Model>,
    frame_graph: FrameGraph,
    unknown_elements: Vec<Element>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: String::new(),
            pose: Pose3d::identity(),
            pose_relative_to: String::new(),
            is_static: false,
            self_collide: false,
            canonical_link: String::new(),
            links: Vec::new(),
            joints: Vec::new(),
            frames: Vec::new(),
            models: Vec::new(),
            frame_graph: FrameGraph::model(""),
            unknown_elements: Vec::new(),
        }
    }
}

impl Model {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
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

    /// Frame the pose is expressed in; empty means the parent scope.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Whether the model is immovable.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Set whether the model is immovable.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// Whether the model's links collide with each other.
    #[must_use]
    pub const fn self_collide(&self) -> bool {
        self.self_collide
    }

    /// Set self collision.
    pub fn set_self_collide(&mut self, self_collide: bool) {
        self.self_collide = self_collide;
    }

    /// The `canonical_link` attribute; empty means the first link.
    #[must_use]
    pub fn canonical_link_name(&self) -> &str {
        &self.canonical_link
    }

    /// Set the `canonical_link` attribute.
    pub fn set_canonical_link_name(&mut self, name: impl Into<String>) {
        self.canonical_link = name.into();
    }

    /// The link the model frame is attached to.
    ///
    /// This is the link named by `canonical_link`, or the first link when the
    /// attribute is empty.
    #[must_use]
    pub fn resolve_canonical_link(&self) -> Option<&Link> {
        if self.canonical_link.is_empty() {
            self.links.first()
        } else {
            self.link_by_name(&self.canonical_link)
        }
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Link at `index`.
    #[must_use]
    pub fn link_by_index(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    /// Mutable link at `index`.
    pub fn link_by_index_mut(&mut self, index: usize) -> Option<&mut Link> {
        self.links.get_mut(index)
    }

    /// Link named `name`.
    #[must_use]
    pub fn link_by_name(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name() == name)
    }

    /// Mutable link named `name`.
    pub fn link_by_name_mut(&mut self, name: &str) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.name() == name)
    }

    /// Whether a link named `name` exists.
    #[must_use]
    pub fn link_name_exists(&self, name: &str) -> bool {
        self.link_by_name(name).is_some()
    }

    /// Add a link and rebuild the frame graph.
    ///
    /// A name already used by a link, joint, frame or nested model fails with
    /// `DuplicateName` and leaves the model unchanged; otherwise the errors
    /// are those of the rebuilt graph. The other `add_*` methods behave the
    /// same way.
    pub fn add_link(&mut self, link: Link) -> Errors {
        if self.name_in_use(link.name()) {
            return vec![Error::duplicate_name("link", link.name())];
        }
        self.links.push(link);
        self.build_scope_graph()
    }

    /// Remove all links and rebuild the frame graph.
    pub fn clear_links(&mut self) -> Errors {
        self.links.clear();
        self.build_scope_graph()
    }

    // ------------------------------------------------------------------------
    // Joints
    // ------------------------------------------------------------------------

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Joint at `index`.
    #[must_use]
    pub fn joint_by_index(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Mutable joint at `index`.
    pub fn joint_by_index_mut(&mut self, index: usize) -> Option<&mut Joint> {
        self.joints.get_mut(index)
    }

    /// Joint named `name`.
    #[must_use]
    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name() == name)
    }

    /// Whether a joint named `name` exists.
    #[must_use]
    pub fn joint_name_exists(&self, name: &str) -> bool {
        self.joint_by_name(name).is_some()
    }

    /// Add a joint and rebuild the frame graph.
    pub fn add_joint(&mut self, joint: Joint) -> Errors {
        if self.name_in_use(joint.name()) {
            return vec![Error::duplicate_name("joint", joint.name())];
        }
        self.joints.push(joint);
        self.build_scope_graph()
    }

    /// Remove all joints and rebuild the frame graph.
    pub fn clear_joints(&mut self) -> Errors {
        self.joints.clear();
        self.build_scope_graph()
    }

    // ------------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------------

    /// Number of explicit frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame at `index`.
    #[must_use]
    pub fn frame_by_index(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Mutable frame at `index`.
    pub fn frame_by_index_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }

    /// Frame named `name`.
    #[must_use]
    pub fn frame_by_name(&self, name: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.name() == name)
    }

    /// Whether a frame named `name` exists.
    #[must_use]
    pub fn frame_name_exists(&self, name: &str) -> bool {
        self.frame_by_name(name).is_some()
    }

    /// Add a frame and rebuild the frame graph.
    pub fn add_frame(&mut self, frame: Frame) -> Errors {
        if self.name_in_use(frame.name()) {
            return vec![Error::duplicate_name("frame", frame.name())];
        }
        self.frames.push(frame);
        self.build_scope_graph()
    }

    /// Remove all frames and rebuild the frame graph.
    pub fn clear_frames(&mut self) -> Errors {
        self.frames.clear();
        self.build_scope_graph()
    }

    // ------------------------------------------------------------------------
    // Nested models
    // ------------------------------------------------------------------------

    /// Number of nested models.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Nested model at `index`.
    #[must_use]
    pub fn model_by_index(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    /// Mutable nested model at `index`.
    pub fn model_by_index_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.models.get_mut(index)
    }

    /// Nested model named `name`.
    #[must_use]
    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Whether a nested model named `name` exists.
    #[must_use]
    pub fn model_name_exists(&self, name: &str) -> bool {
        self.model_by_name(name).is_some()
    }

    /// Add a nested model and rebuild the frame graph.
    pub fn add_model(&mut self, model: Model) -> Errors {
        if self.name_in_use(model.name()) {
            return vec![Error::duplicate_name("model", model.name())];
        }
        self.models.push(model);
        self.build_scope_graph()
    }

    /// Remove all nested models and rebuild the frame graph.
    pub fn clear_models(&mut self) -> Errors {
        self.models.clear();
        self.build_scope_graph()
    }

    // ------------------------------------------------------------------------
    // Frame semantics
    // ------------------------------------------------------------------------

    /// The model-scope frame graph.
    #[must_use]
    pub const fn frame_graph(&self) -> &FrameGraph {
        &self.frame_graph
    }

    /// Rebuild the frame graphs of this model and every nested model.
    ///
    /// Returns name clashes between links, joints, frames and nested models,
    /// invalid joint references, and dangling or cyclic frame references.
    pub fn build_frame_graph(&mut self) -> Errors {
        let mut errors = Errors::new();
        for model in &mut self.models {
            errors.extend(model.build_frame_graph());
        }
        errors.extend(self.build_scope_graph());
        errors
    }

    /// Whether `name` is taken in this model's frame namespace.
    fn name_in_use(&self, name: &str) -> bool {
        name == MODEL_FRAME
            || self.link_name_exists(name)
            || self.joint_name_exists(name)
            || self.frame_name_exists(name)
            || self.model_name_exists(name)
    }

    fn build_scope_graph(&mut self) -> Errors {
        let mut errors = Errors::new();

        let canonical = match self.resolve_canonical_link() {
            Some(link) => link.name().to_string(),
            None if !self.canonical_link.is_empty() => {
                errors.push(Error::new(
                    ErrorCode::ModelCanonicalLinkInvalid,
                    format!(
                        "canonical_link [{}] of model [{}] is not a link of the model",
                        self.canonical_link, self.name
                    ),
                ));
                String::new()
            }
            None => self
                .models
                .first()
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
        };

        let mut graph = FrameGraph::model(canonical);
        for link in &self.links {
            add_vertex(&mut graph, link.vertex(), &mut errors);
        }
        for model in &self.models {
            let vertex = FrameVertex::new(model.name(), FrameKind::Model, model.pose)
                .with_relative_to(model.pose_relative_to.as_str());
            add_vertex(&mut graph, vertex, &mut errors);
        }
        for joint in &self.joints {
            if self.check_joint(joint, &mut errors) {
                add_vertex(&mut graph, joint.vertex(), &mut errors);
            }
        }
        for frame in &self.frames {
            add_vertex(&mut graph, frame.vertex(), &mut errors);
        }

        for joint in &self.joints {
            let parent = joint.parent_name();
            if parent != WORLD_FRAME && parent != joint.child_name() && !graph.contains(parent) {
                errors.push(Error::frame_not_found(
                    parent,
                    format!("parent of joint [{}]", joint.name()),
                ));
            }
            let expressed_in = joint.axis().map_or("", |axis| axis.xyz_expressed_in());
            if !expressed_in.is_empty() && !graph.contains(expressed_in) {
                errors.push(Error::frame_not_found(
                    expressed_in,
                    format!("axis of joint [{}]", joint.name()),
                ));
            }
        }

        errors.extend(graph.validate());
        self.frame_graph = graph;
        errors
    }

    fn check_joint(&self, joint: &Joint, errors: &mut Errors) -> bool {
        let child = joint.child_name();
        if child == WORLD_FRAME || !(self.link_name_exists(child) || self.model_name_exists(child))
        {
            errors.push(Error::new(
                ErrorCode::JointChildLinkInvalid,
                format!(
                    "child [{child}] of joint [{}] is not a link of model [{}]",
                    joint.name(),
                    self.name
                ),
            ));
            return false;
        }
        if joint.parent_name() == child {
            errors.push(Error::new(
                ErrorCode::JointParentSameAsChild,
                format!(
                    "joint [{}] has the same parent and child [{child}]",
                    joint.name()
                ),
            ));
        }
        true
    }

    /// Pose query against the enclosing scope's frame graph (the world's, or
    /// the parent model's for nested models).
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_vertex(graph, &self.name, self.pose, &self.pose_relative_to, "")
    }

    /// Write as a `<model>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("model").with_attribute("name", &self.name);
        if !self.canonical_link.is_empty() {
            element.set_attribute("canonical_link", &self.canonical_link);
        }
        if self.is_static {
            push_value(&mut element, "static", true);
        }
        if self.self_collide {
            push_value(&mut element, "self_collide", true);
        }
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        for link in &self.links {
            element.push_child(link.to_element());
        }
        for joint in &self.joints {
            element.push_child(joint.to_element());
        }
        for frame in &self.frames {
            element.push_child(frame.to_element());
        }
        for model in &self.models {
            element.push_child(model.to_element());
        }
        for unknown in &self.unknown_elements {
            element.push_child(unknown.clone());
        }
        element
    }

    /// Unrecognized child elements, kept verbatim and written back by `to_element`.
    #[must_use]
    pub fn unknown_elements(&self) -> &[Element] {
        &self.unknown_elements
    }
}

fn add_vertex(graph: &mut FrameGraph, vertex: FrameVertex, errors: &mut Errors) {
    if let Err(e) = graph.add_vertex(vertex) {
        errors.push(e);
    }
}

impl Load for Model {
    const TAG: &'static str = "model";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;
        let (pose, pose_relative_to) = load_pose(element, errors);
        let unknown_elements = unknown_children(
            element,
            &[
                "pose",
                "static",
                "self_collide",
                "allow_auto_disable",
                "enable_wind",
                "link",
                "joint",
                "frame",
                "model",
                "plugin",
                "gripper",
            ],
            config,
            errors,
        );

        let mut model = Self {
            name,
            pose,
            pose_relative_to,
            is_static: child_bool(element, "static", errors).unwrap_or(false),
            self_collide: child_bool(element, "self_collide", errors).unwrap_or(false),
            canonical_link: element
                .attribute("canonical_link")
                .unwrap_or_default()
                .to_string(),
            links: load_unique_repeated(element, config, errors),
            joints: load_unique_repeated(element, config, errors),
            frames: load_unique_repeated(element, config, errors),
            models: load_unique_repeated(element, config, errors),
            frame_graph: FrameGraph::model(""),
            unknown_elements,
        };

        if !model.is_static && model.links.is_empty() && model.models.is_empty() {
            errors.push(Error::new(
                ErrorCode::ModelWithoutLink,
                format!(
                    "{} must have at least one link or nested model",
                    describe(element)
                ),
            ));
        }

        // Nested models built their own graphs while loading.
        errors.extend(model.build_scope_graph());
        Some(model)
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
    use crate::joint::JointType;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn load(xml: &str) -> (Option<Model>, Errors) {
        let element = parse_element_str(xml).unwrap();
        let mut errors = Errors::new();
        let model = Model::load(&element, &ParserConfig::default(), &mut errors);
        (model, errors)
    }

    fn codes(errors: &Errors) -> Vec<ErrorCode> {
        errors.iter().map(Error::code).collect()
    }

    const ARM: &str = r#"
        <model name="arm">
          <pose>1 0 0 0 0 0</pose>
          <link name="base"/>
          <link name="upper"><pose>0 0 1 0 0 0</pose></link>
          <joint name="shoulder" type="revolute">
            <parent>base</parent>
            <child>upper</child>
            <pose>0 0 0.5 0 0 0</pose>
          </joint>
          <frame name="tool" attached_to="upper"><pose>0 0 2 0 0 0</pose></frame>
        </model>"#;

    #[test]
    fn test_load_arm() {
        let (model, errors) = load(ARM);
        assert!(errors.is_empty(), "{errors:?}");
        let model = model.unwrap();
        assert_eq!(model.link_count(), 2);
        assert_eq!(model.joint_count(), 1);
        assert_eq!(model.frame_count(), 1);
        assert_eq!(model.resolve_canonical_link().unwrap().name(), "base");
        assert_eq!(model.frame_graph().len(), 5);
    }

    #[test]
    fn test_resolve_poses_in_model() {
        let (model, _) = load(ARM);
        let model = model.unwrap();
        let graph = model.frame_graph();

        let joint = model.joint_by_name("shoulder").unwrap();
        let in_model = joint.semantic_pose(graph).resolve_relative_to("").unwrap();
        assert_relative_eq!(in_model.position.coords, Vector3::new(0.0, 0.0, 1.5), epsilon = 1e-12);

        let tool = model.frame_by_name("tool").unwrap();
        // Resolves relative to attached_to by default.
        let in_upper = tool.semantic_pose(graph).resolve().unwrap();
        assert_relative_eq!(in_upper.position.coords, Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert_eq!(tool.resolve_attached_to_body(graph).unwrap(), "upper");
    }

    #[test]
    fn test_model_without_link() {
        let (model, errors) = load("<model name='m'/>");
        assert!(model.is_some());
        assert_eq!(codes(&errors), vec![ErrorCode::ModelWithoutLink]);

        let (_, errors) = load("<model name='m'><static>true</static></model>");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_cross_kind_duplicate() {
        let (model, errors) = load(
            "<model name='m'><link name='a'/><frame name='a'/></model>",
        );
        assert_eq!(model.unwrap().frame_count(), 1);
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
    }

    #[test]
    fn test_joint_validation() {
        let (_, errors) = load(
            "<model name='m'><link name='a'/>\
             <joint name='j' type='fixed'><parent>a</parent><child>world</child></joint></model>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::JointChildLinkInvalid]);

        let (_, errors) = load(
            "<model name='m'><link name='a'/>\
             <joint name='j' type='fixed'><parent>a</parent><child>a</child></joint></model>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::JointParentSameAsChild]);

        let (_, errors) = load(
            "<model name='m'><link name='a'/>\
             <joint name='j' type='fixed'><parent>ghost</parent><child>a</child></joint></model>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::FrameNameNotFound]);

        let (_, errors) = load(
            "<model name='m'><link name='a'/>\
             <joint name='j' type='fixed'><parent>world</parent><child>a</child></joint></model>",
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_axis_expressed_in_unknown_frame() {
        let (model, errors) = load(
            "<model name='m'><link name='a'/><link name='b'/>\
             <joint name='j' type='revolute'><parent>a</parent><child>b</child>\
             <axis><xyz expressed_in='ghost'>1 0 0</xyz></axis></joint></model>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::FrameNameNotFound]);
        assert!(errors[0].message().contains("axis of joint [j]"));
        assert!(model.unwrap().joint_by_name("j").is_some());

        let (_, errors) = load(
            "<model name='m'><link name='a'/><link name='b'/>\
             <joint name='j' type='revolute'><parent>a</parent><child>b</child>\
             <axis><xyz expressed_in='a'>1 0 0</xyz></axis></joint></model>",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_invalid_canonical_link() {
        let (_, errors) = load("<model name='m' canonical_link='nope'><link name='a'/></model>");
        assert_eq!(codes(&errors), vec![ErrorCode::ModelCanonicalLinkInvalid]);

        let (model, errors) =
            load("<model name='m' canonical_link='b'><link name='a'/><link name='b'/></model>");
        assert!(errors.is_empty());
        assert_eq!(model.unwrap().resolve_canonical_link().unwrap().name(), "b");
    }

    #[test]
    fn test_nested_model() {
        let (model, errors) = load(
            "<model name='outer'>\
               <model name='inner'><pose>0 2 0 0 0 0</pose><link name='l'/></model>\
             </model>",
        );
        assert!(errors.is_empty(), "{errors:?}");
        let model = model.unwrap();
        let inner = model.model_by_name("inner").unwrap();
        assert_eq!(inner.link_count(), 1);

        let pose = inner.semantic_pose(model.frame_graph()).resolve().unwrap();
        assert_eq!(pose, Pose3d::new(0.0, 2.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(
            model.frame_graph().resolve_attached_body("__model__").unwrap(),
            "inner"
        );
    }

    #[test]
    fn test_add_rebuilds_graph() {
        let mut model = Model::new("m");
        assert!(model.add_link(Link::new("a")).is_empty());
        assert!(model.add_link(Link::new("b")).is_empty());
        assert!(model.frame_graph().contains("b"));

        let errors = model.add_link(Link::new("a"));
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
        assert_eq!(model.link_count(), 2);

        assert!(model
            .add_joint(Joint::new("j", JointType::Fixed, "a", "b"))
            .is_empty());
        assert!(model.frame_graph().contains("j"));

        let errors = model.add_frame(Frame::new("a"));
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
        assert_eq!(model.frame_count(), 0);
        assert!(model.frame_by_name("a").is_none());

        model.clear_frames();
        model.clear_joints();
        assert!(!model.frame_graph().contains("j"));
    }

    #[test]
    fn test_add_rejects_names_of_other_kinds() {
        let mut model = Model::new("m");
        let mut link = Link::new("a");
        link.set_raw_pose(Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(model.add_link(link).is_empty());
        assert!(model.add_frame(Frame::new("f")).is_empty());
        let before = model.clone();

        for errors in [
            model.add_frame(Frame::new("a")),
            model.add_joint(Joint::new("a", JointType::Fixed, "world", "a")),
            model.add_model(Model::new("f")),
            model.add_link(Link::new("f")),
            model.add_frame(Frame::new(MODEL_FRAME)),
        ] {
            assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
        }
        assert_eq!(model, before);
        assert!(model.frame_by_name("a").is_none());
        assert_eq!(
            model.frame_graph().pose_in_scope("a").unwrap(),
            Pose3d::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_edit_then_rebuild() {
        let (model, _) = load(ARM);
        let mut model = model.unwrap();
        model
            .link_by_name_mut("upper")
            .unwrap()
            .set_raw_pose(Pose3d::new(0.0, 0.0, 3.0, 0.0, 0.0, 0.0));
        assert!(model.build_frame_graph().is_empty());

        let tool = model.frame_by_name("tool").unwrap();
        let in_model = tool
            .semantic_pose(model.frame_graph())
            .resolve_relative_to("__model__")
            .unwrap();
        assert_relative_eq!(in_model.position.coords, Vector3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_clone_is_independent() {
        let (model, _) = load(ARM);
        let model = model.unwrap();
        let mut copy = model.clone();
        copy.link_by_index_mut(0).unwrap().set_name("renamed");
        copy.build_frame_graph();

        assert_eq!(model.link_by_index(0).unwrap().name(), "base");
        assert!(model.frame_graph().contains("base"));
        assert!(!copy.frame_graph().contains("base"));
    }

    #[test]
    fn test_to_element_reloads() {
        let (model, _) = load(ARM);
        let model = model.unwrap();
        let (back, errors) = load(&model.to_element().to_xml_string().unwrap());
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(back.unwrap(), model);
    }
}
