//! `<world>` elements and the world-scope frame graph.

use nalgebra::Vector3;
use sdf_types::Pose3d;

use crate::actor::Actor;
use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::frame::Frame;
use crate::frame_graph::{FrameGraph, FrameKind, FrameVertex, WORLD_FRAME};
use crate::light::Light;
use crate::model::Model;
use crate::parse::{
    Load, add_unique, child_vector3, load_name, load_unique_repeated, push_vector3,
    unknown_children,
};

/// A simulated environment: models, lights, actors and frames.
///
/// The world owns a frame graph rooted at `world` whose vertices are the
/// world's models and explicit frames. It is rebuilt when the world is loaded
/// and by every `add_*`/`clear_*` call. After editing children through
/// `*_mut` accessors, call [`build_frame_graph`](Self::build_frame_graph).
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    name: String,
    gravity: Vector3<f64>,
    magnetic_field: Vector3<f64>,
    models: Vec<Model>,
    frames: Vec<Frame>,
    lights: Vec<Light>,
    actors: Vec<Actor>,
    frame_graph: FrameGraph,
    unknown_elements: Vec<Element>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            name: String::new(),
            gravity: Vector3::new(0.0, 0.0, -9.8),
            magnetic_field: Vector3::new(5.5645e-6, 22.8758e-6, -42.3884e-6),
            models: Vec::new(),
            frames: Vec::new(),
            lights: Vec::new(),
            actors: Vec::new(),
            frame_graph: FrameGraph::world(),
            unknown_elements: Vec::new(),
        }
    }
}

impl World {
    /// Create an empty world.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// World name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Gravity in m/s².
    #[must_use]
    pub const fn gravity(&self) -> Vector3<f64> {
        self.gravity
    }

    /// Set gravity.
    pub fn set_gravity(&mut self, gravity: Vector3<f64>) {
        self.gravity = gravity;
    }

    /// Magnetic field in tesla.
    #[must_use]
    pub const fn magnetic_field(&self) -> Vector3<f64> {
        self.magnetic_field
    }

    /// Set the magnetic field.
    pub fn set_magnetic_field(&mut self, field: Vector3<f64>) {
        self.magnetic_field = field;
    }

    // ------------------------------------------------------------------------
    // Models
    // ------------------------------------------------------------------------

    /// Number of models.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Model at `index`.
    #[must_use]
    pub fn model_by_index(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    /// Mutable model at `index`.
    pub fn model_by_index_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.models.get_mut(index)
    }

    /// Model named `name`.
    #[must_use]
    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Whether a model named `name` exists.
    #[must_use]
    pub fn model_name_exists(&self, name: &str) -> bool {
        self.model_by_name(name).is_some()
    }

    /// Add a model and rebuild the frame graph.
    ///
    /// A name already used by a model or frame fails with `DuplicateName` and
    /// leaves the world unchanged.
    pub fn add_model(&mut self, model: Model) -> Errors {
        if self.name_in_use(model.name()) {
            return vec![Error::duplicate_name("model", model.name())];
        }
        self.models.push(model);
        self.build_scope_graph()
    }

    /// Remove all models and rebuild the frame graph.
    pub fn clear_models(&mut self) -> Errors {
        self.models.clear();
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

    /// Add a frame and rebuild the frame graph; rejected like
    /// [`add_model`](Self::add_model) when the name is taken.
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

    /// Add a light; fails with `DuplicateName` without modifying the world.
    pub fn add_light(&mut self, mut light: Light) -> Errors {
        light.set_xml_parent_name(WORLD_FRAME);
        add_unique(&mut self.lights, light)
    }

    /// Remove all lights.
    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    // ------------------------------------------------------------------------
    // Actors
    // ------------------------------------------------------------------------

    /// Number of actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Actor at `index`.
    #[must_use]
    pub fn actor_by_index(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    /// Mutable actor at `index`.
    pub fn actor_by_index_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    /// Whether an actor named `name` exists.
    #[must_use]
    pub fn actor_name_exists(&self, name: &str) -> bool {
        self.actors.iter().any(|a| a.name() == name)
    }

    /// Add an actor; fails with `DuplicateName` without modifying the world.
    pub fn add_actor(&mut self, actor: Actor) -> Errors {
        add_unique(&mut self.actors, actor)
    }

    /// Remove all actors.
    pub fn clear_actors(&mut self) {
        self.actors.clear();
    }

    // ------------------------------------------------------------------------
    // Frame semantics
    // ------------------------------------------------------------------------

    /// The world-scope frame graph.
    #[must_use]
    pub const fn frame_graph(&self) -> &FrameGraph {
        &self.frame_graph
    }

    /// Pose of frame `name` expressed in frame `relative_to` (empty means
    /// the world frame).
    ///
    /// # Errors
    ///
    /// `FrameNameNotFound` or `PoseCycleDetected`.
    pub fn resolve_pose(&self, name: &str, relative_to: &str) -> Result<Pose3d, Errors> {
        self.frame_graph.resolve_pose(name, relative_to)
    }

    /// Rebuild the frame graphs of the world and every model in it.
    pub fn build_frame_graph(&mut self) -> Errors {
        let mut errors = Errors::new();
        for model in &mut self.models {
            errors.extend(model.build_frame_graph());
        }
        errors.extend(self.build_scope_graph());
        errors
    }

    fn name_in_use(&self, name: &str) -> bool {
        name == WORLD_FRAME || self.model_name_exists(name) || self.frame_name_exists(name)
    }

    fn build_scope_graph(&mut self) -> Errors {
        let mut errors = Errors::new();
        let mut graph = FrameGraph::world();

        for model in &self.models {
            let vertex = FrameVertex::new(model.name(), FrameKind::Model, *model.raw_pose())
                .with_relative_to(model.pose_relative_to());
            if let Err(e) = graph.add_vertex(vertex) {
                errors.push(e);
            }
        }
        for frame in &self.frames {
            if let Err(e) = graph.add_vertex(frame.vertex()) {
                errors.push(e);
            }
        }

        errors.extend(graph.validate());
        self.frame_graph = graph;
        errors
    }

    /// Unrecognized child elements, kept verbatim and written back by `to_element`.
    #[must_use]
    pub fn unknown_elements(&self) -> &[Element] {
        &self.unknown_elements
    }

    /// Write as a `<world>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("world").with_attribute("name", &self.name);
        push_vector3(&mut element, "gravity", &self.gravity);
        push_vector3(&mut element, "magnetic_field", &self.magnetic_field);
        for model in &self.models {
            element.push_child(model.to_element());
        }
        for frame in &self.frames {
            element.push_child(frame.to_element());
        }
        for light in &self.lights {
            element.push_child(light.to_element());
        }
        for actor in &self.actors {
            element.push_child(actor.to_element());
        }
        for unknown in &self.unknown_elements {
            element.push_child(unknown.clone());
        }
        element
    }
}

impl Load for World {
    const TAG: &'static str = "world";

    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self> {
        let name = load_name(element, errors)?;
        let unknown_elements = unknown_children(
            element,
            &[
                "gravity",
                "magnetic_field",
                "model",
                "frame",
                "light",
                "actor",
                "physics",
                "scene",
                "atmosphere",
                "spherical_coordinates",
                "wind",
                "audio",
                "gui",
                "plugin",
                "state",
            ],
            config,
            errors,
        );

        let mut world = Self::new(name);
        world.unknown_elements = unknown_elements;
        if let Some(gravity) = child_vector3(element, "gravity", errors) {
            world.gravity = gravity;
        }
        if let Some(field) = child_vector3(element, "magnetic_field", errors) {
            world.magnetic_field = field;
        }
        world.models = load_unique_repeated(element, config, errors);
        world.frames = load_unique_repeated(element, config, errors);
        world.lights = load_unique_repeated(element, config, errors);
        for light in &mut world.lights {
            light.set_xml_parent_name(WORLD_FRAME);
        }
        world.actors = load_unique_repeated(element, config, errors);

        // Models built their own graphs while loading.
        errors.extend(world.build_scope_graph());
        Some(world)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
