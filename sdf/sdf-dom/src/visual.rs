//! `<visual>` elements.

use sdf_types::{Color, Geometry, Pose3d};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::frame_graph::FrameGraph;
use crate::geometry::{geometry_element, load_geometry};
use crate::parse::{
    Load, check_children, child_bool, child_unit_interval, child_value, describe,
    load_frame_name, load_pose, push_pose, push_value,
};
use crate::semantic_pose::SemanticPose;

/// Surface colors of a visual.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    /// Ambient color.
    pub ambient: Color,
    /// Diffuse color.
    pub diffuse: Color,
    /// Specular color.
    pub specular: Color,
    /// Emissive color.
    pub emissive: Color,
}

impl Material {
    fn load(element: &Element, errors: &mut Errors) -> Self {
        let mut material = Self::default();
        if let Some(c) = child_value(element, "ambient", errors) {
            material.ambient = c;
        }
        if let Some(c) = child_value(element, "diffuse", errors) {
            material.diffuse = c;
        }
        if let Some(c) = child_value(element, "specular", errors) {
            material.specular = c;
        }
        if let Some(c) = child_value(element, "emissive", errors) {
            material.emissive = c;
        }
        material
    }

    fn to_element(self) -> Element {
        let mut element = Element::new("material");
        push_value(&mut element, "ambient", self.ambient);
        push_value(&mut element, "diffuse", self.diffuse);
        push_value(&mut element, "specular", self.specular);
        push_value(&mut element, "emissive", self.emissive);
        element
    }
}

/// Visual shape of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    name: String,
    pose: Pose3d,
    pose_relative_to: String,
    geometry: Geometry,
    cast_shadows: bool,
    transparency: f64,
    material: Option<Material>,
    xml_parent_name: String,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            name: String::new(),
            pose: Pose3d::identity(),
            pose_relative_to: String::new(),
            geometry: Geometry::Empty,
            cast_shadows: true,
            transparency: 0.0,
            material: None,
            xml_parent_name: String::new(),
        }
    }
}

impl Visual {
    /// Create a visual with an empty geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Visual name.
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

    /// Frame the pose is expressed in; empty means the parent link.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Visual geometry.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable visual geometry.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Set the geometry.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    /// Whether the visual casts shadows. Defaults to true.
    #[must_use]
    pub const fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Set shadow casting.
    pub fn set_cast_shadows(&mut self, cast_shadows: bool) {
        self.cast_shadows = cast_shadows;
    }

    /// Transparency in `[0, 1]`; 0 is opaque.
    #[must_use]
    pub const fn transparency(&self) -> f64 {
        self.transparency
    }

    /// Set the transparency.
    pub fn set_transparency(&mut self, transparency: f64) {
        self.transparency = transparency;
    }

    /// Surface colors, if given.
    #[must_use]
    pub const fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Set the surface colors.
    pub fn set_material(&mut self, material: Option<Material>) {
        self.material = material;
    }

    /// Name of the link this visual belongs to.
    #[must_use]
    pub fn xml_parent_name(&self) -> &str {
        &self.xml_parent_name
    }

    pub(crate) fn set_xml_parent_name(&mut self, name: &str) {
        self.xml_parent_name = name.to_string();
    }

    /// Pose query against the enclosing model's frame graph.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_child(
            graph,
            self.pose,
            &self.pose_relative_to,
            &self.xml_parent_name,
        )
    }

    /// Write as a `<visual>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("visual").with_attribute("name", &self.name);
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        if !self.cast_shadows {
            push_value(&mut element, "cast_shadows", false);
        }
        if self.transparency != 0.0 {
            push_value(&mut element, "transparency", self.transparency);
        }
        element.push_child(geometry_element(&self.geometry));
        if let Some(material) = self.material {
            element.push_child(material.to_element());
        }
        element
    }
}

impl Load for Visual {
    const TAG: &'static str = "visual";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_frame_name(element, errors)?;
        let Some(geometry) = element.child("geometry") else {
            errors.push(Error::missing_element("geometry", describe(element)));
            return None;
        };

        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(
            element,
            &[
                "pose",
                "geometry",
                "cast_shadows",
                "transparency",
                "material",
                "laser_retro",
                "meta",
                "visibility_flags",
                "plugin",
            ],
            config,
            errors,
        );

        let mut visual = Self {
            name,
            pose,
            pose_relative_to,
            geometry: load_geometry(geometry, config, errors),
            material: element.child("material").map(|m| Material::load(m, errors)),
            ..Default::default()
        };
        if let Some(cast_shadows) = child_bool(element, "cast_shadows", errors) {
            visual.cast_shadows = cast_shadows;
        }
        if let Some(transparency) = child_unit_interval(element, "transparency", config, errors)
        {
            visual.transparency = transparency;
        }
        Some(visual)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
