//! `<link>` elements and their mass properties.

use sdf_types::Pose3d;

use crate::collision::Collision;
use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, ErrorCode, Errors};
use crate::frame_graph::{FrameGraph, FrameKind, FrameVertex};
use crate::light::Light;
use crate::parse::{
    Load, add_unique, child_value, load_frame_name, load_pose, load_unique_repeated, push_pose,
    push_value, unknown_children,
};
use crate::semantic_pose::SemanticPose;
use crate::visual::Visual;

/// Rotational inertia tensor about the center of mass, in kg·m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia {
    /// Ixx.
    pub ixx: f64,
    /// Ixy.
    pub ixy: f64,
    /// Ixz.
    pub ixz: f64,
    /// Iyy.
    pub iyy: f64,
    /// Iyz.
    pub iyz: f64,
    /// Izz.
    pub izz: f64,
}

impl Default for Inertia {
    fn default() -> Self {
        Self {
            ixx: 1.0,
            ixy: 0.0,
            ixz: 0.0,
            iyy: 1.0,
            iyz: 0.0,
            izz: 1.0,
        }
    }
}

impl Inertia {
    fn values(&self) -> [f64; 6] {
        [self.ixx, self.ixy, self.ixz, self.iyy, self.iyz, self.izz]
    }
}

/// Mass properties of a link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertial {
    /// Mass in kilograms.
    pub mass: f64,
    /// Center-of-mass frame relative to the link frame.
    pub pose: Pose3d,
    /// Inertia tensor in the center-of-mass frame.
    pub inertia: Inertia,
}

impl Default for Inertial {
    fn default() -> Self {
        Self {
            mass: 1.0,
            pose: Pose3d::identity(),
            inertia: Inertia::default(),
        }
    }
}

impl Inertial {
    fn load(link: &str, element: &Element, config: &ParserConfig, errors: &mut Errors) -> Self {
        let mut inertial = Self::default();
        if let Some(mass) = child_value(element, "mass", errors) {
            inertial.mass = mass;
        }
        inertial.pose = load_pose(element, errors).0;

        if let Some(tensor) = element.child("inertia") {
            let i = &mut inertial.inertia;
            for (tag, slot) in [
                ("ixx", &mut i.ixx),
                ("ixy", &mut i.ixy),
                ("ixz", &mut i.ixz),
                ("iyy", &mut i.iyy),
                ("iyz", &mut i.iyz),
                ("izz", &mut i.izz),
            ] {
                if let Some(value) = child_value(tensor, tag, errors) {
                    *slot = value;
                }
            }
        }

        inertial.validate(link, config, errors);
        inertial
    }

    fn validate(&self, link: &str, config: &ParserConfig, errors: &mut Errors) {
        if self.mass <= 0.0 || !self.mass.is_finite() {
            errors.push(Error::new(
                ErrorCode::LinkInertiaInvalid,
                format!("link '{link}' has invalid mass {}", self.mass),
            ));
        }

        let i = &self.inertia;
        if i.values().iter().any(|v| !v.is_finite()) {
            errors.push(Error::new(
                ErrorCode::LinkInertiaInvalid,
                format!("link '{link}' has non-finite inertia values"),
            ));
            return;
        }
        if i.ixx < 0.0 || i.iyy < 0.0 || i.izz < 0.0 {
            errors.push(Error::new(
                ErrorCode::LinkInertiaInvalid,
                format!("link '{link}' inertia diagonal elements must be non-negative"),
            ));
            return;
        }
        if i.ixx + i.iyy < i.izz || i.iyy + i.izz < i.ixx || i.izz + i.ixx < i.iyy {
            config.warn(
                &format!("link '{link}' inertia violates the triangle inequality"),
                errors,
            );
        }
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("inertial");
        push_value(&mut element, "mass", self.mass);
        push_pose(&mut element, &self.pose, "");
        let mut inertia = Element::new("inertia");
        for (tag, value) in ["ixx", "ixy", "ixz", "iyy", "iyz", "izz"]
            .into_iter()
            .zip(self.inertia.values())
        {
            push_value(&mut inertia, tag, value);
        }
        element.push_child(inertia);
        element
    }
}

/// A rigid body of a model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    name: String,
    pose: Pose3d,
    pose_relative_to: String,
    inertial: Option<Inertial>,
    collisions: Vec<Collision>,
    visuals: Vec<Visual>,
    lights: Vec<Light>,
    unknown_elements: Vec<Element>,
}

impl Link {
    /// Create an empty link.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Link name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name. Children are re-parented to the new name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        for collision in &mut self.collisions {
            collision.set_xml_parent_name(&self.name);
        }
        for visual in &mut self.visuals {
            visual.set_xml_parent_name(&self.name);
        }
        for light in &mut self.lights {
            light.set_xml_parent_name(&self.name);
        }
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

    /// Frame the pose is expressed in; empty means the model frame.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Mass properties, if given.
    #[must_use]
    pub const fn inertial(&self) -> Option<&Inertial> {
        self.inertial.as_ref()
    }

    /// Set the mass properties.
    pub fn set_inertial(&mut self, inertial: Option<Inertial>) {
        self.inertial = inertial;
    }

    // ------------------------------------------------------------------------
    // Collisions
    // ------------------------------------------------------------------------

    /// Number of collisions.
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    /// Collision at `index`.
    #[must_use]
    pub fn collision_by_index(&self, index: usize) -> Option<&Collision> {
        self.collisions.get(index)
    }

    /// Mutable collision at `index`.
    pub fn collision_by_index_mut(&mut self, index: usize) -> Option<&mut Collision> {
        self.collisions.get_mut(index)
    }

    /// Collision named `name`.
    #[must_use]
    pub fn collision_by_name(&self, name: &str) -> Option<&Collision> {
        self.collisions.iter().find(|c| c.name() == name)
    }

    /// Whether a collision named `name` exists.
    #[must_use]
    pub fn collision_name_exists(&self, name: &str) -> bool {
        self.collision_by_name(name).is_some()
    }

    /// Add a collision; fails with `DuplicateName` without modifying the link.
    pub fn add_collision(&mut self, mut collision: Collision) -> Errors {
        collision.set_xml_parent_name(&self.name);
        add_unique(&mut self.collisions, collision)
    }

    /// Remove all collisions.
    pub fn clear_collisions(&mut self) {
        self.collisions.clear();
    }

    // ------------------------------------------------------------------------
    // Visuals
    // ------------------------------------------------------------------------

    /// Number of visuals.
    #[must_use]
    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    /// Visual at `index`.
    #[must_use]
    pub fn visual_by_index(&self, index: usize) -> Option<&Visual> {
        self.visuals.get(index)
    }

    /// Mutable visual at `index`.
    pub fn visual_by_index_mut(&mut self, index: usize) -> Option<&mut Visual> {
        self.visuals.get_mut(index)
    }

    /// Visual named `name`.
    #[must_use]
    pub fn visual_by_name(&self, name: &str) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.name() == name)
    }

    /// Whether a visual named `name` exists.
    #[must_use]
    pub fn visual_name_exists(&self, name: &str) -> bool {
        self.visual_by_name(name).is_some()
    }

    /// Add a visual; fails with `DuplicateName` without modifying the link.
    pub fn add_visual(&mut self, mut visual: Visual) -> Errors {
        visual.set_xml_parent_name(&self.name);
        add_unique(&mut self.visuals, visual)
    }

    /// Remove all visuals.
    pub fn clear_visuals(&mut self) {
        self.visuals.clear();
    }

    // ------------------------------------------------------------------------
    // Lights
    // ------------------------------------------------------------------------

    /// Number of lights.
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Light at `index`.
    #[must_use]
    pub fn light_by_index(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    /// Mutable light at `index`.
    pub fn light_by_index_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    /// Light named `name`.
    #[must_use]
    pub fn light_by_name(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name() == name)
    }

    /// Whether a light named `name` exists.
    #[must_use]
    pub fn light_name_exists(&self, name: &str) -> bool {
        self.light_by_name(name).is_some()
    }

    /// Add a light; fails with `DuplicateName` without modifying the link.
    pub fn add_light(&mut self, mut light: Light) -> Errors {
        light.set_xml_parent_name(&self.name);
        add_unique(&mut self.lights, light)
    }

    /// Remove all lights.
    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    /// Pose query against the enclosing model's frame graph.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_vertex(graph, &self.name, self.pose, &self.pose_relative_to, "")
    }

    pub(crate) fn vertex(&self) -> FrameVertex {
        FrameVertex::new(self.name.as_str(), FrameKind::Link, self.pose)
            .with_relative_to(self.pose_relative_to.as_str())
    }

    /// Write as a `<link>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("link").with_attribute("name", &self.name);
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        if let Some(inertial) = &self.inertial {
            element.push_child(inertial.to_element());
        }
        for collision in &self.collisions {
            element.push_child(collision.to_element());
        }
        for visual in &self.visuals {
            element.push_child(visual.to_element());
        }
        for light in &self.lights {
            element.push_child(light.to_element());
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

impl Load for Link {
    const TAG: &'static str = "link";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;
        let (pose, pose_relative_to) = load_pose(element, errors);
        let unknown_elements = unknown_children(
            element,
            &[
                "pose",
                "inertial",
                "collision",
                "visual",
                "light",
                "gravity",
                "enable_wind",
                "self_collide",
                "kinematic",
                "must_be_base_link",
                "velocity_decay",
                "sensor",
                "projector",
                "audio_sink",
                "audio_source",
                "battery",
                "particle_emitter",
            ],
            config,
            errors,
        );

        let inertial = element
            .child("inertial")
            .map(|e| Inertial::load(&name, e, config, errors));

        let mut collisions: Vec<Collision> = load_unique_repeated(element, config, errors);
        for collision in &mut collisions {
            collision.set_xml_parent_name(&name);
        }
        let mut visuals: Vec<Visual> = load_unique_repeated(element, config, errors);
        for visual in &mut visuals {
            visual.set_xml_parent_name(&name);
        }
        let mut lights: Vec<Light> = load_unique_repeated(element, config, errors);
        for light in &mut lights {
            light.set_xml_parent_name(&name);
        }

        Some(Self {
            name,
            pose,
            pose_relative_to,
            inertial,
            collisions,
            visuals,
            lights,
            unknown_elements,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
