//! `<actor>` elements: animated skinned characters.

use sdf_types::Pose3d;

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::joint::Joint;
use crate::link::Link;
use crate::parse::{
    Load, add_unique, check_children, child_bool, child_value, describe, load_name, load_pose,
    load_unique_repeated, push_pose, push_value,
};

/// Skin mesh of an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    /// Mesh file.
    pub filename: String,
    /// Uniform scale.
    pub scale: f64,
}

/// A named animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    name: String,
    /// Animation file.
    pub filename: String,
    /// Uniform scale.
    pub scale: f64,
    /// Interpolate the clip's root motion along x.
    pub interpolate_x: bool,
}

impl Animation {
    /// Create an animation clip at unit scale.
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            scale: 1.0,
            interpolate_x: false,
        }
    }

    /// Clip name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Load for Animation {
    const TAG: &'static str = "animation";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_name(element, errors)?;
        check_children(element, &["filename", "scale", "interpolate_x"], config, errors);
        let Some(filename) = element.child_text("filename") else {
            errors.push(Error::missing_element("filename", describe(element)));
            return None;
        };
        let mut animation = Self::new(name, filename);
        if let Some(scale) = child_value(element, "scale", errors) {
            animation.scale = scale;
        }
        if let Some(interpolate_x) = child_bool(element, "interpolate_x", errors) {
            animation.interpolate_x = interpolate_x;
        }
        Some(animation)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A timed pose along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Seconds since the trajectory started.
    pub time: f64,
    /// Pose at that time.
    pub pose: Pose3d,
}

/// A sequence of waypoints played with one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Unique id within the script.
    pub id: u64,
    /// Name of the animation played along the trajectory.
    pub animation: String,
    /// Spline tension in `[0, 1]`.
    pub tension: f64,
    /// Waypoints in time order.
    pub waypoints: Vec<Waypoint>,
}

/// Playback settings of an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Restart after the last trajectory ends.
    pub looping: bool,
    /// Seconds to wait before starting.
    pub delay_start: f64,
    /// Start as soon as the world starts.
    pub auto_start: bool,
    /// Trajectories in playback order.
    pub trajectories: Vec<Trajectory>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            looping: true,
            delay_start: 0.0,
            auto_start: true,
            trajectories: Vec::new(),
        }
    }
}

impl Script {
    fn load(element: &Element, errors: &mut Errors) -> Self {
        let mut script = Self::default();
        if let Some(v) = child_bool(element, "loop", errors) {
            script.looping = v;
        }
        if let Some(v) = child_value(element, "delay_start", errors) {
            script.delay_start = v;
        }
        if let Some(v) = child_bool(element, "auto_start", errors) {
            script.auto_start = v;
        }

        for trajectory in element.children_named("trajectory") {
            let id = match trajectory.attribute("id").map(str::parse::<u64>) {
                Some(Ok(id)) => id,
                Some(Err(e)) => {
                    errors.push(Error::invalid_attribute("id", describe(trajectory), e));
                    continue;
                }
                None => {
                    errors.push(Error::missing_attribute("id", "trajectory"));
                    continue;
                }
            };
            if script.trajectories.iter().any(|t| t.id == id) {
                errors.push(Error::duplicate_name("trajectory", &id.to_string()));
                continue;
            }

            let mut waypoints = Vec::new();
            for waypoint in trajectory.children_named("waypoint") {
                let time = child_value(waypoint, "time", errors).unwrap_or(0.0);
                let pose = child_value(waypoint, "pose", errors).unwrap_or_default();
                waypoints.push(Waypoint { time, pose });
            }
            waypoints.sort_by(|a, b| a.time.total_cmp(&b.time));

            script.trajectories.push(Trajectory {
                id,
                animation: trajectory.attribute("type").unwrap_or_default().to_string(),
                tension: trajectory
                    .attribute("tension")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(0.0),
                waypoints,
            });
        }
        script
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("script");
        push_value(&mut element, "loop", self.looping);
        push_value(&mut element, "delay_start", self.delay_start);
        push_value(&mut element, "auto_start", self.auto_start);
        for trajectory in &self.trajectories {
            let mut t = Element::new("trajectory")
                .with_attribute("id", trajectory.id.to_string())
                .with_attribute("type", &trajectory.animation)
                .with_attribute("tension", trajectory.tension.to_string());
            for waypoint in &trajectory.waypoints {
                let mut w = Element::new("waypoint");
                push_value(&mut w, "time", waypoint.time);
                push_value(&mut w, "pose", waypoint.pose);
                t.push_child(w);
            }
            element.push_child(t);
        }
        element
    }
}

/// An animated character.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Actor {
    name: String,
    pose: Pose3d,
    pose_relative_to: String,
    skin: Option<Skin>,
    animations: Vec<Animation>,
    script: Script,
    links: Vec<Link>,
    joints: Vec<Joint>,
}

impl Actor {
    /// Create an actor with no skin or animations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Actor name.
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

    /// Frame the pose is expressed in.
    #[must_use]
    pub fn pose_relative_to(&self) -> &str {
        &self.pose_relative_to
    }

    /// Skin mesh, if any.
    #[must_use]
    pub const fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }

    /// Set the skin mesh.
    pub fn set_skin(&mut self, skin: Option<Skin>) {
        self.skin = skin;
    }

    /// Number of animations.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Animation at `index`.
    #[must_use]
    pub fn animation_by_index(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    /// Whether an animation named `name` exists.
    #[must_use]
    pub fn animation_name_exists(&self, name: &str) -> bool {
        self.animations.iter().any(|a| a.name() == name)
    }

    /// Add an animation; fails with `DuplicateName` without modifying the
    /// actor.
    pub fn add_animation(&mut self, animation: Animation) -> Errors {
        add_unique(&mut self.animations, animation)
    }

    /// Playback script.
    #[must_use]
    pub const fn script(&self) -> &Script {
        &self.script
    }

    /// Mutable playback script.
    pub fn script_mut(&mut self) -> &mut Script {
        &mut self.script
    }

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

    /// Whether a link named `name` exists.
    #[must_use]
    pub fn link_name_exists(&self, name: &str) -> bool {
        self.link_by_name(name).is_some()
    }

    /// Add a link; fails with `DuplicateName` without modifying the actor.
    pub fn add_link(&mut self, link: Link) -> Errors {
        add_unique(&mut self.links, link)
    }

    /// Remove all links.
    pub fn clear_links(&mut self) {
        self.links.clear();
    }

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

    /// Add a joint; fails with `DuplicateName` without modifying the actor.
    pub fn add_joint(&mut self, joint: Joint) -> Errors {
        add_unique(&mut self.joints, joint)
    }

    /// Remove all joints.
    pub fn clear_joints(&mut self) {
        self.joints.clear();
    }

    /// Write as an `<actor>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("actor").with_attribute("name", &self.name);
        push_pose(&mut element, &self.pose, &self.pose_relative_to);
        if let Some(skin) = &self.skin {
            let mut s = Element::new("skin");
            push_value(&mut s, "filename", &skin.filename);
            push_value(&mut s, "scale", skin.scale);
            element.push_child(s);
        }
        for animation in &self.animations {
            let mut a = Element::new("animation").with_attribute("name", &animation.name);
            push_value(&mut a, "filename", &animation.filename);
            push_value(&mut a, "scale", animation.scale);
            push_value(&mut a, "interpolate_x", animation.interpolate_x);
            element.push_child(a);
        }
        element.push_child(self.script.to_element());
        for link in &self.links {
            element.push_child(link.to_element());
        }
        for joint in &self.joints {
            element.push_child(joint.to_element());
        }
        element
    }
}

impl Load for Actor {
    const TAG: &'static str = "actor";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_name(element, errors)?;
        let (pose, pose_relative_to) = load_pose(element, errors);
        check_children(
            element,
            &["pose", "skin", "animation", "script", "link", "joint", "plugin"],
            config,
            errors,
        );

        let skin = element.child("skin").and_then(|skin| {
            let Some(filename) = skin.child_text("filename") else {
                errors.push(Error::missing_element("filename", describe(skin)));
                return None;
            };
            Some(Skin {
                filename: filename.to_string(),
                scale: child_value(skin, "scale", errors).unwrap_or(1.0),
            })
        });

        Some(Self {
            name,
            pose,
            pose_relative_to,
            skin,
            animations: load_unique_repeated(element, config, errors),
            script: element
                .child("script")
                .map(|s| Script::load(s, errors))
                .unwrap_or_default(),
            links: load_unique_repeated(element, config, errors),
            joints: load_unique_repeated(element, config, errors),
        })
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

    const WALKER: &str = r#"
        <actor name="walker">
          <skin><filename>walk.dae</filename><scale>1.0</scale></skin>
          <animation name="walking">
            <filename>walk.dae</filename>
            <interpolate_x>true</interpolate_x>
          </animation>
          <script>
            <loop>false</loop>
            <delay_start>2</delay_start>
            <trajectory id="0" type="walking" tension="0.5">
              <waypoint><time>2</time><pose>1 0 0 0 0 0</pose></waypoint>
              <waypoint><time>0</time><pose>0 0 0 0 0 0</pose></waypoint>
            </trajectory>
          </script>
        </actor>"#;

    fn load(xml: &str) -> (Option<Actor>, Errors) {
        let element = parse_element_str(xml).unwrap();
        let mut errors = Errors::new();
        let actor = Actor::load(&element, &ParserConfig::default(), &mut errors);
        (actor, errors)
    }

    #[test]
    fn test_load_walker() {
        let (actor, errors) = load(WALKER);
        assert!(errors.is_empty(), "{errors:?}");
        let actor = actor.unwrap();
        assert_eq!(actor.skin().unwrap().filename, "walk.dae");
        assert_eq!(actor.animation_count(), 1);
        assert!(actor.animation_by_index(0).unwrap().interpolate_x);

        let script = actor.script();
        assert!(!script.looping);
        assert!(script.auto_start);
        assert_eq!(script.delay_start, 2.0);

        let trajectory = &script.trajectories[0];
        assert_eq!(trajectory.animation, "walking");
        assert_eq!(trajectory.tension, 0.5);
        // Waypoints are sorted by time.
        assert_eq!(trajectory.waypoints[0].time, 0.0);
        assert_eq!(trajectory.waypoints[1].pose.position.x, 1.0);
    }

    #[test]
    fn test_trajectory_errors() {
        let (actor, errors) = load(
            "<actor name='a'><script>\
               <trajectory type='x'/>\
               <trajectory id='1' type='x'/><trajectory id='1' type='y'/>\
             </script></actor>",
        );
        assert_eq!(actor.unwrap().script().trajectories.len(), 1);
        let codes: Vec<_> = errors.iter().map(Error::code).collect();
        assert_eq!(codes, vec![ErrorCode::AttributeMissing, ErrorCode::DuplicateName]);
    }

    #[test]
    fn test_duplicate_animation() {
        let mut actor = Actor::new("a");
        assert!(actor.add_animation(Animation::new("walk", "walk.dae")).is_empty());
        let errors = actor.add_animation(Animation::new("walk", "run.dae"));
        assert_eq!(errors[0].code(), ErrorCode::DuplicateName);
        assert_eq!(actor.animation_by_index(0).unwrap().filename, "walk.dae");
        assert!(actor.animation_name_exists("walk"));
    }

    #[test]
    fn test_links_and_joints() {
        let (actor, errors) = load(
            r#"<actor name="a">
                 <link name="pelvis"/>
                 <link name="thigh"><pose relative_to="pelvis">0 0 -0.3 0 0 0</pose></link>
                 <link name="pelvis"/>
                 <joint name="hip" type="ball"><parent>pelvis</parent><child>thigh</child></joint>
               </actor>"#,
        );
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].code(), ErrorCode::DuplicateName);

        let mut actor = actor.unwrap();
        assert_eq!(actor.link_count(), 2);
        assert!(actor.link_name_exists("thigh"));
        assert_eq!(actor.link_by_index(1).unwrap().pose_relative_to(), "pelvis");
        assert_eq!(actor.joint_count(), 1);
        assert_eq!(actor.joint_by_name("hip").unwrap().child_name(), "thigh");

        let errors = actor.add_link(Link::new("thigh"));
        assert_eq!(errors[0].code(), ErrorCode::DuplicateName);
        assert_eq!(actor.link_count(), 2);

        let (back, errors) = load(&actor.to_element().to_xml_string().unwrap());
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(back.unwrap(), actor);

        actor.clear_links();
        actor.clear_joints();
        assert_eq!(actor.link_count() + actor.joint_count(), 0);
    }

    #[test]
    fn test_to_element_reloads() {
        let (actor, _) = load(WALKER);
        let actor = actor.unwrap();
        let (back, errors) = load(&actor.to_element().to_xml_string().unwrap());
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(back.unwrap(), actor);
    }
}
