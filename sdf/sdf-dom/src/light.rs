//! `<light>` elements.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use sdf_types::{Color, Pose3d};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::frame_graph::FrameGraph;
use crate::parse::{
    Load, check_children, child_bool, child_value, child_vector3, describe, load_name,
    load_pose, push_pose, push_value, push_vector3,
};
use crate::semantic_pose::SemanticPose;

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    /// Omnidirectional point source.
    #[default]
    Point,
    /// Parallel rays along the light's direction.
    Directional,
    /// Cone of light along the light's direction.
    Spot,
}

impl LightType {
    /// The `type` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Directional => "directional",
            Self::Spot => "spot",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Self::Point),
            "directional" => Ok(Self::Directional),
            "spot" => Ok(Self::Spot),
            other => Err(format!("unknown light type '{other}'")),
        }
    }
}

/// Distance falloff of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Range of the light in meters.
    pub range: f64,
    /// Constant factor; 1.0 means never attenuate.
    pub constant: f64,
    /// Linear factor.
    pub linear: f64,
    /// Quadratic factor.
    pub quadratic: f64,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            range: 10.0,
            constant: 1.0,
            linear: 1.0,
            quadratic: 0.0,
        }
    }
}

/// Cone parameters of a spot light, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spot {
    /// Angle of the fully lit inner cone.
    pub inner_angle: f64,
    /// Angle of the outer cone.
    pub outer_angle: f64,
    /// Falloff between the cones.
    pub falloff: f64,
}

/// A light source in a world or attached to a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    name: String,
    light_type: LightType,
    pose: Pose3d,
    pose_relative_to: String,
    cast_shadows: bool,
    intensity: f64,
    diffuse: Color,
    specular: Color,
    direction: Vector3<f64>,
    attenuation: Attenuation,
    spot: Spot,
    xml_parent_name: String,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            name: String::new(),
            light_type: LightType::Point,
            pose: Pose3d::identity(),
            pose_relative_to: String::new(),
            cast_shadows: false,
            intensity: 1.0,
            diffuse: Color::WHITE,
            specular: Color::new(0.1, 0.1, 0.1, 1.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
            attenuation: Attenuation::default(),
            spot: Spot::default(),
            xml_parent_name: String::new(),
        }
    }
}

impl Light {
    /// Create a light of the given type.
    pub fn new(name: impl Into<String>, light_type: LightType) -> Self {
        Self {
            name: name.into(),
            light_type,
            ..Default::default()
        }
    }

    /// Light name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Light type.
    #[must_use]
    pub const fn light_type(&self) -> LightType {
        self.light_type
    }

    /// Set the light type.
    pub fn set_light_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
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

    /// Frame the pose is expressed in; empty means the parent.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Set the frame the pose is expressed in.
    pub fn set_pose_relative_to(&mut self, frame: impl Into<String>) {
        self.pose_relative_to = frame.into();
    }

    /// Whether the light casts shadows.
    #[must_use]
    pub const fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Set shadow casting.
    pub fn set_cast_shadows(&mut self, cast_shadows: bool) {
        self.cast_shadows = cast_shadows;
    }

    /// Intensity scale.
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Set the intensity.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity;
    }

    /// Diffuse color.
    #[must_use]
    pub const fn diffuse(&self) -> Color {
        self.diffuse
    }

    /// Set the diffuse color.
    pub fn set_diffuse(&mut self, color: Color) {
        self.diffuse = color;
    }

    /// Specular color.
    #[must_use]
    pub const fn specular(&self) -> Color {
        self.specular
    }

    /// Set the specular color.
    pub fn set_specular(&mut self, color: Color) {
        self.specular = color;
    }

    /// Direction of directional and spot lights, in the light's frame.
    #[must_use]
    pub const fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Set the direction.
    pub fn set_direction(&mut self, direction: Vector3<f64>) {
        self.direction = direction;
    }

    /// Distance falloff.
    #[must_use]
    pub const fn attenuation(&self) -> &Attenuation {
        &self.attenuation
    }

    /// Mutable distance falloff.
    pub fn attenuation_mut(&mut self) -> &mut Attenuation {
        &mut self.attenuation
    }

    /// Spot cone; meaningful for [`LightType::Spot`] only.
    #[must_use]
    pub const fn spot(&self) -> &Spot {
        &self.spot
    }

    /// Mutable spot cone.
    pub fn spot_mut(&mut self) -> &mut Spot {
        &mut self.spot
    }

    /// Name of the world or link holding this light.
    #[must_use]
    pub fn xml_parent_name(&self) -> &str {
        &self.xml_parent_name
    }

    pub(crate) fn set_xml_parent_name(&mut self, name: &str) {
        self.xml_parent_name = name.to_string();
    }

    /// Pose query against the enclosing scope's frame graph.
    ///
    /// Resolves relative to the parent link, or the world for world lights.
    #[must_use]
    pub fn semantic_pose<'a>(&'a self, graph: &'a FrameGraph) -> SemanticPose<'a> {
        SemanticPose::for_child(
            graph,
            self.pose,
            &self.pose_relative_to,
            &self.xml_parent_name,
        )
    }

    /// Write as a `<light>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("light")
            .with_attribute("name", &self.name)
            .with_attribute("type", self.light_type.as_str());
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        push_value(&mut element, "cast_shadows", self.cast_shadows);
        push_value(&mut element, "intensity", self.intensity);
        push_value(&mut element, "diffuse", self.diffuse);
        push_value(&mut element, "specular", self.specular);
        push_vector3(&mut element, "direction", &self.direction);

        let mut attenuation = Element::new("attenuation");
        push_value(&mut attenuation, "range", self.attenuation.range);
        push_value(&mut attenuation, "constant", self.attenuation.constant);
        push_value(&mut attenuation, "linear", self.attenuation.linear);
        push_value(&mut attenuation, "quadratic", self.attenuation.quadratic);
        element.push_child(attenuation);

        if self.light_type == LightType::Spot {
            let mut spot = Element::new("spot");
            push_value(&mut spot, "inner_angle", self.spot.inner_angle);
            push_value(&mut spot, "outer_angle", self.spot.outer_angle);
            push_value(&mut spot, "falloff", self.spot.falloff);
            element.push_child(spot);
        }
        element
    }
}

impl Load for Light {
    const TAG: &'static str = "light";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_name(element, errors)?;

        let light_type = match element.attribute("type") {
            Some(t) => t.parse().unwrap_or_else(|message| {
                errors.push(Error::invalid_attribute("type", describe(element), message));
                LightType::Point
            }),
            None => {
                errors.push(Error::missing_attribute("type", describe(element)));
                LightType::Point
            }
        };

        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(
            element,
            &[
                "pose",
                "cast_shadows",
                "intensity",
                "diffuse",
                "specular",
                "direction",
                "attenuation",
                "spot",
                "visualize",
                "light_on",
            ],
            config,
            errors,
        );

        let mut light = Self {
            name,
            light_type,
            pose,
            pose_relative_to,
            ..Default::default()
        };
        if let Some(v) = child_bool(element, "cast_shadows", errors) {
            light.cast_shadows = v;
        }
        if let Some(v) = child_value(element, "intensity", errors) {
            light.intensity = v;
        }
        if let Some(v) = child_value(element, "diffuse", errors) {
            light.diffuse = v;
        }
        if let Some(v) = child_value(element, "specular", errors) {
            light.specular = v;
        }
        if let Some(v) = child_vector3(element, "direction", errors) {
            light.direction = v;
        }

        if let Some(att) = element.child("attenuation") {
            let a = &mut light.attenuation;
            if let Some(v) = child_value(att, "range", errors) {
                a.range = v;
            }
            if let Some(v) = child_value(att, "constant", errors) {
                a.constant = v;
            }
            if let Some(v) = child_value(att, "linear", errors) {
                a.linear = v;
            }
            if let Some(v) = child_value(att, "quadratic", errors) {
                a.quadratic = v;
            }
            if a.range < 0.0 {
                config.warn(
                    &format!("attenuation range of {} is negative", describe(element)),
                    errors,
                );
            }
        }

        if let Some(spot) = element.child("spot") {
            let s = &mut light.spot;
            if let Some(v) = child_value(spot, "inner_angle", errors) {
                s.inner_angle = v;
            }
            if let Some(v) = child_value(spot, "outer_angle", errors) {
                s.outer_angle = v;
            }
            if let Some(v) = child_value(spot, "falloff", errors) {
                s.falloff = v;
            }
        }

        Some(light)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::element::parse_element_str;
    use crate::error::ErrorCode;

    fn load(xml: &str) -> (Option<Light>, Errors) {
        let element = parse_element_str(xml).unwrap();
        let mut errors = Errors::new();
        let light = Light::load(&element, &ParserConfig::default(), &mut errors);
        (light, errors)
    }

    #[test]
    fn test_load_directional() {
        let (light, errors) = load(
            r#"<light type="directional" name="sun">
                 <cast_shadows>true</cast_shadows>
                 <pose>0 0 10 0 0 0</pose>
                 <diffuse>0.8 0.8 0.8 1</diffuse>
                 <specular>0.2 0.2 0.2 1</specular>
                 <attenuation>
                   <range>1000</range>
                   <constant>0.9</constant>
                   <linear>0.01</linear>
                   <quadratic>0.001</quadratic>
                 </attenuation>
                 <direction>-0.5 0.1 -0.9</direction>
               </light>"#,
        );
        assert!(errors.is_empty(), "{errors:?}");
        let light = light.unwrap();
        assert_eq!(light.name(), "sun");
        assert_eq!(light.light_type(), LightType::Directional);
        assert!(light.cast_shadows());
        assert_eq!(light.diffuse(), Color::new(0.8, 0.8, 0.8, 1.0));
        assert_eq!(light.attenuation().range, 1000.0);
        assert_eq!(light.attenuation().quadratic, 0.001);
        assert_eq!(light.direction(), Vector3::new(-0.5, 0.1, -0.9));
        assert_eq!(light.raw_pose().position.z, 10.0);
    }

    #[test]
    fn test_load_spot() {
        let (light, errors) = load(
            "<light type='spot' name='s'><spot><inner_angle>0.1</inner_angle>\
             <outer_angle>0.5</outer_angle><falloff>0.8</falloff></spot></light>",
        );
        assert!(errors.is_empty());
        let light = light.unwrap();
        assert_eq!(light.spot().outer_angle, 0.5);
        assert_eq!(light.spot().falloff, 0.8);
    }

    #[test]
    fn test_type_errors() {
        let (light, errors) = load("<light name='l'/>");
        assert_eq!(light.unwrap().light_type(), LightType::Point);
        assert_eq!(errors[0].code(), ErrorCode::AttributeMissing);

        let (_, errors) = load("<light name='l' type='laser'/>");
        assert_eq!(errors[0].code(), ErrorCode::AttributeInvalid);
    }

    #[test]
    fn test_defaults() {
        let light = Light::default();
        assert_eq!(light.light_type(), LightType::Point);
        assert_eq!(light.intensity(), 1.0);
        assert_eq!(light.direction(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(light.attenuation().range, 10.0);
    }

    #[test]
    fn test_to_element_reloads() {
        let mut light = Light::new("lamp", LightType::Spot);
        light.set_intensity(2.0);
        light.set_diffuse(Color::new(1.0, 0.5, 0.0, 1.0));
        light.spot_mut().outer_angle = 0.75;
        light.attenuation_mut().linear = 0.2;

        let mut errors = Errors::new();
        let back =
            Light::load(&light.to_element(), &ParserConfig::pedantic(), &mut errors).unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(back, light);
    }
}
