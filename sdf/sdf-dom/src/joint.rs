//! `<joint>` elements.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use sdf_types::{Pose3d, format_vector3};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, ErrorCode, Errors};
use crate::frame_graph::{FrameGraph, FrameKind, FrameVertex};
use crate::parse::{
    Load, check_children, child_value, child_vector3, describe, load_frame_name, load_pose,
    push_pose, push_value, push_vector3,
};
use crate::semantic_pose::SemanticPose;

/// Kinematic type of a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    /// No relative motion.
    Fixed,
    /// Rotation about one axis, within limits.
    Revolute,
    /// Translation along one axis.
    Prismatic,
    /// Unlimited rotation about one axis.
    Continuous,
    /// Rotation about all axes through one point.
    Ball,
    /// Coupled rotation and translation.
    Screw,
    /// Two perpendicular rotation axes.
    Universal,
    /// Two chained revolute axes.
    Revolute2,
    /// Geared coupling between two revolute joints.
    Gearbox,
}

impl JointType {
    /// The `type` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Revolute => "revolute",
            Self::Prismatic => "prismatic",
            Self::Continuous => "continuous",
            Self::Ball => "ball",
            Self::Screw => "screw",
            Self::Universal => "universal",
            Self::Revolute2 => "revolute2",
            Self::Gearbox => "gearbox",
        }
    }

    /// Whether the joint uses an `<axis>`.
    #[must_use]
    pub const fn has_axis(self) -> bool {
        !matches!(self, Self::Fixed | Self::Ball)
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "revolute" => Ok(Self::Revolute),
            "prismatic" => Ok(Self::Prismatic),
            "continuous" => Ok(Self::Continuous),
            "ball" => Ok(Self::Ball),
            "screw" => Ok(Self::Screw),
            "universal" => Ok(Self::Universal),
            "revolute2" => Ok(Self::Revolute2),
            "gearbox" => Ok(Self::Gearbox),
            other => Err(format!("unknown joint type '{other}'")),
        }
    }
}

/// Motion axis of a joint, with its limits and dynamics.
///
/// The axis direction is expressed in the joint frame unless
/// [`xyz_expressed_in`](Self::xyz_expressed_in) names another frame of the
/// model. Effort and velocity limits are infinite when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct JointAxis {
    xyz: Vector3<f64>,
    xyz_expressed_in: String,
    damping: f64,
    friction: f64,
    spring_reference: f64,
    spring_stiffness: f64,
    lower: f64,
    upper: f64,
    effort: f64,
    max_velocity: f64,
    stiffness: f64,
    dissipation: f64,
    xml_parent_name: String,
}

impl Default for JointAxis {
    fn default() -> Self {
        Self {
            xyz: Vector3::z(),
            xyz_expressed_in: String::new(),
            damping: 0.0,
            friction: 0.0,
            spring_reference: 0.0,
            spring_stiffness: 0.0,
            lower: -1e16,
            upper: 1e16,
            effort: f64::INFINITY,
            max_velocity: f64::INFINITY,
            stiffness: 1e8,
            dissipation: 1.0,
            xml_parent_name: String::new(),
        }
    }
}

impl JointAxis {
    /// Create a unit-z axis with unbounded limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis direction.
    #[must_use]
    pub const fn xyz(&self) -> Vector3<f64> {
        self.xyz
    }

    /// Set the axis direction.
    ///
    /// A zero vector is rejected with `ElementInvalid` and the axis keeps its
    /// previous direction.
    pub fn set_xyz(&mut self, xyz: Vector3<f64>) -> Errors {
        if xyz.norm() <= f64::EPSILON {
            return vec![Error::new(
                ErrorCode::ElementInvalid,
                "The norm of the xyz vector cannot be zero",
            )];
        }
        self.xyz = xyz;
        Errors::new()
    }

    /// Frame the direction is expressed in; empty means the joint frame.
    #[must_use]
    pub fn xyz_expressed_in(&self) -> &str {
        &self.xyz_expressed_in
    }

    /// Set the frame the direction is expressed in.
    pub fn set_xyz_expressed_in(&mut self, frame: impl Into<String>) {
        self.xyz_expressed_in = frame.into();
    }

    /// Viscous damping coefficient.
    #[must_use]
    pub const fn damping(&self) -> f64 {
        self.damping
    }

    /// Set the damping coefficient.
    pub fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }

    /// Static friction.
    #[must_use]
    pub const fn friction(&self) -> f64 {
        self.friction
    }

    /// Set the static friction.
    pub fn set_friction(&mut self, friction: f64) {
        self.friction = friction;
    }

    /// Position at which the spring exerts no force.
    #[must_use]
    pub const fn spring_reference(&self) -> f64 {
        self.spring_reference
    }

    /// Set the spring reference position.
    pub fn set_spring_reference(&mut self, reference: f64) {
        self.spring_reference = reference;
    }

    /// Spring stiffness.
    #[must_use]
    pub const fn spring_stiffness(&self) -> f64 {
        self.spring_stiffness
    }

    /// Set the spring stiffness.
    pub fn set_spring_stiffness(&mut self, stiffness: f64) {
        self.spring_stiffness = stiffness;
    }

    /// Lower position limit (radians or meters).
    #[must_use]
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Set the lower position limit.
    pub fn set_lower(&mut self, lower: f64) {
        self.lower = lower;
    }

    /// Upper position limit.
    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Set the upper position limit.
    pub fn set_upper(&mut self, upper: f64) {
        self.upper = upper;
    }

    /// Maximum effort.
    #[must_use]
    pub const fn effort(&self) -> f64 {
        self.effort
    }

    /// Set the maximum effort.
    pub fn set_effort(&mut self, effort: f64) {
        self.effort = effort;
    }

    /// Maximum velocity.
    #[must_use]
    pub const fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Set the maximum velocity.
    pub fn set_max_velocity(&mut self, velocity: f64) {
        self.max_velocity = velocity;
    }

    /// Stiffness of the joint stop.
    #[must_use]
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Set the joint stop stiffness.
    pub fn set_stiffness(&mut self, stiffness: f64) {
        self.stiffness = stiffness;
    }

    /// Dissipation of the joint stop.
    #[must_use]
    pub const fn dissipation(&self) -> f64 {
        self.dissipation
    }

    /// Set the joint stop dissipation.
    pub fn set_dissipation(&mut self, dissipation: f64) {
        self.dissipation = dissipation;
    }

    /// Name of the joint owning this axis.
    #[must_use]
    pub fn xml_parent_name(&self) -> &str {
        &self.xml_parent_name
    }

    pub(crate) fn set_xml_parent_name(&mut self, name: &str) {
        name.clone_into(&mut self.xml_parent_name);
    }

    /// Axis direction expressed in frame `resolve_to` of the model graph;
    /// empty means the joint frame.
    ///
    /// # Errors
    ///
    /// `FrameNameNotFound` or `PoseCycleDetected` from the graph, including
    /// when the axis belongs to no joint.
    pub fn resolve_xyz(
        &self,
        graph: &FrameGraph,
        resolve_to: &str,
    ) -> Result<Vector3<f64>, Errors> {
        let expressed_in = if self.xyz_expressed_in.is_empty() {
            self.xml_parent_name.as_str()
        } else {
            self.xyz_expressed_in.as_str()
        };
        let resolve_to = if resolve_to.is_empty() {
            self.xml_parent_name.as_str()
        } else {
            resolve_to
        };
        if expressed_in.is_empty() || resolve_to.is_empty() {
            return Err(vec![Error::frame_not_found("", "joint axis with no joint")]);
        }
        let pose = graph.resolve_pose(expressed_in, resolve_to)?;
        Ok(pose.rotation * self.xyz)
    }

    fn load(element: &Element, errors: &mut Errors) -> Self {
        let mut axis = Self::default();
        if let Some(xyz) = child_vector3(element, "xyz", errors) {
            let found = axis.set_xyz(xyz);
            errors.extend(found.into_iter().map(|e| {
                Error::invalid_element("xyz", describe(element), e.message())
            }));
        }
        if let Some(frame) = element.child("xyz").and_then(|x| x.attribute("expressed_in")) {
            axis.xyz_expressed_in = frame.to_string();
        }

        if let Some(dynamics) = element.child("dynamics") {
            let fields: [(&str, &mut f64); 4] = [
                ("damping", &mut axis.damping),
                ("friction", &mut axis.friction),
                ("spring_reference", &mut axis.spring_reference),
                ("spring_stiffness", &mut axis.spring_stiffness),
            ];
            for (tag, field) in fields {
                if let Some(value) = child_value(dynamics, tag, errors) {
                    *field = value;
                }
            }
        }

        if let Some(limit) = element.child("limit") {
            let fields: [(&str, &mut f64); 6] = [
                ("lower", &mut axis.lower),
                ("upper", &mut axis.upper),
                ("effort", &mut axis.effort),
                ("velocity", &mut axis.max_velocity),
                ("stiffness", &mut axis.stiffness),
                ("dissipation", &mut axis.dissipation),
            ];
            for (tag, field) in fields {
                if let Some(value) = child_value(limit, tag, errors) {
                    *field = value;
                }
            }
            // A negative effort or velocity limit means unlimited.
            if axis.effort < 0.0 {
                axis.effort = f64::INFINITY;
            }
            if axis.max_velocity < 0.0 {
                axis.max_velocity = f64::INFINITY;
            }
        }
        axis
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("axis");
        let mut xyz = Element::new("xyz").with_text(format_vector3(&self.xyz));
        if !self.xyz_expressed_in.is_empty() {
            xyz.set_attribute("expressed_in", &self.xyz_expressed_in);
        }
        element.push_child(xyz);

        let mut dynamics = Element::new("dynamics");
        push_value(&mut dynamics, "damping", self.damping);
        push_value(&mut dynamics, "friction", self.friction);
        push_value(&mut dynamics, "spring_reference", self.spring_reference);
        push_value(&mut dynamics, "spring_stiffness", self.spring_stiffness);
        element.push_child(dynamics);

        let unlimited = |value: f64| if value.is_finite() { value } else { -1.0 };
        let mut limit = Element::new("limit");
        push_value(&mut limit, "lower", self.lower);
        push_value(&mut limit, "upper", self.upper);
        push_value(&mut limit, "effort", unlimited(self.effort));
        push_value(&mut limit, "velocity", unlimited(self.max_velocity));
        push_value(&mut limit, "stiffness", self.stiffness);
        push_value(&mut limit, "dissipation", self.dissipation);
        element.push_child(limit);
        element
    }
}

/// A kinematic connection between a parent frame and a child link.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    name: String,
    joint_type: JointType,
    parent: String,
    child: String,
    pose: Pose3d,
    pose_relative_to: String,
    axis: Option<JointAxis>,
}

impl Joint {
    /// Create a joint between `parent` and `child`.
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
            pose: Pose3d::identity(),
            pose_relative_to: String::new(),
            axis: None,
        }
    }

    /// Joint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if let Some(axis) = &mut self.axis {
            axis.set_xml_parent_name(&self.name);
        }
    }

    /// Joint type.
    #[must_use]
    pub const fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// Set the joint type.
    pub fn set_joint_type(&mut self, joint_type: JointType) {
        self.joint_type = joint_type;
    }

    /// Parent frame name; `world` is allowed.
    #[must_use]
    pub fn parent_name(&self) -> &str {
        &self.parent
    }

    /// Set the parent frame name.
    pub fn set_parent_name(&mut self, parent: impl Into<String>) {
        self.parent = parent.into();
    }

    /// Child link name.
    #[must_use]
    pub fn child_name(&self) -> &str {
        &self.child
    }

    /// Set the child link name.
    pub fn set_child_name(&mut self, child: impl Into<String>) {
        self.child = child.into();
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

    /// Frame the pose is expressed in; empty means the child link.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Motion axis, if any.
    #[must_use]
    pub const fn axis(&self) -> Option<&JointAxis> {
        self.axis.as_ref()
    }

    /// Set the motion axis.
    pub fn set_axis(&mut self, mut axis: Option<JointAxis>) {
        if let Some(axis) = &mut axis {
            axis.set_xml_parent_name(&self.name);
        }
        self.axis = axis;
    }

    /// Pose query against the enclosing model's frame graph.
    ///
    /// Resolves relative to the child link by default.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_vertex(
            graph,
            &self.name,
            self.pose,
            &self.pose_relative_to,
            &self.child,
        )
    }

    pub(crate) fn vertex(&self) -> FrameVertex {
        let relative_to = if self.pose_relative_to.is_empty() {
            &self.child
        } else {
            &self.pose_relative_to
        };
        FrameVertex::new(self.name.as_str(), FrameKind::Joint, self.pose)
            .with_relative_to(relative_to.as_str())
            .with_attached_to(self.child.as_str())
    }

    /// Write as a `<joint>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("joint")
            .with_attribute("name", &self.name)
            .with_attribute("type", self.joint_type.as_str());
        push_value(&mut element, "parent", &self.parent);
        push_value(&mut element, "child", &self.child);
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        if let Some(axis) = &self.axis {
            element.push_child(axis.to_element());
        }
        element
    }
}

impl Load for Joint {
    const TAG: &'static str = "joint";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;

        let joint_type = match element.attribute("type") {
            Some(t) => match t.parse::<JointType>() {
                Ok(joint_type) => joint_type,
                Err(message) => {
                    errors.push(Error::invalid_attribute("type", describe(element), message));
                    return None;
                }
            },
            None => {
                errors.push(Error::missing_attribute("type", describe(element)));
                return None;
            }
        };

        let parent = required_name(element, "parent", errors);
        let child = required_name(element, "child", errors);
        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(
            element,
            &[
                "parent",
                "child",
                "pose",
                "axis",
                "axis2",
                "gearbox_ratio",
                "gearbox_reference_body",
                "thread_pitch",
                "screw_thread_pitch",
                "physics",
                "sensor",
            ],
            config,
            errors,
        );

        if element.has_child("axis") && !joint_type.has_axis() {
            config.warn(
                &format!("{} has an <axis>, which a {joint_type} joint ignores", describe(element)),
                errors,
            );
        }

        Some(Self {
            joint_type,
            parent: parent?,
            child: child?,
            pose,
            pose_relative_to,
            axis: element.child("axis").map(|axis| {
                let mut axis = JointAxis::load(axis, errors);
                axis.set_xml_parent_name(&name);
                axis
            }),
            name,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn required_name(element: &Element, tag: &str, errors: &mut Errors) -> Option<String> {
    match element.child_text(tag) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.push(Error::missing_element(tag, describe(element)));
            None
        }
    }
}
