//! The document root: `<sdf>` and its content.

use tracing::debug;

use crate::actor::Actor;
use crate::config::ParserConfig;
use crate::element::{Element, parse_element_str};
use crate::error::{Error, ErrorCode, Errors};
use crate::light::Light;
use crate::model::Model;
use crate::parse::{add_unique, load_unique_repeated, unknown_children};
use crate::world::World;
use crate::{SDF_PROTOCOL_VERSION, SDF_VERSION};

/// A standalone object a document may carry instead of worlds.
#[derive(Debug, Clone, PartialEq)]
pub enum RootContent {
    /// A `<model>` directly under `<sdf>`.
    Model(Model),
    /// A `<light>` directly under `<sdf>`.
    Light(Light),
    /// An `<actor>` directly under `<sdf>`.
    Actor(Actor),
}

/// A loaded scene description.
///
/// A root holds either a sequence of uniquely named worlds or at most one
/// standalone [`RootContent`] object, never both.
///
/// Accessors hand out borrows into the root's own storage, so edits through
/// [`world_by_index_mut`](Self::world_by_index_mut) are seen by later queries.
/// A root is not synchronized; share it across threads behind a lock.
///
/// # Example
///
/// ```
/// use sdf_dom::Root;
///
/// let mut root = Root::new();
/// let errors = root.load_sdf_string(
///     r#"<sdf version="1.9"><world name="default"/></sdf>"#,
/// );
/// assert!(errors.is_empty());
/// assert_eq!(root.world_count(), 1);
/// assert!(root.world_name_exists("default"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    version: String,
    worlds: Vec<World>,
    content: Option<RootContent>,
    unknown_elements: Vec<Element>,
}

impl Default for Root {
    fn default() -> Self {
        Self {
            version: SDF_VERSION.to_string(),
            worlds: Vec::new(),
            content: None,
            unknown_elements: Vec::new(),
        }
    }
}

impl Root {
    /// Create an empty root at the current version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Set the document version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Load a document from text with the default [`ParserConfig`].
    ///
    /// See [`load_sdf_string_with_config`](Self::load_sdf_string_with_config).
    pub fn load_sdf_string(&mut self, text: &str) -> Errors {
        self.load_sdf_string_with_config(text, &ParserConfig::default())
    }

    /// Load a document from text, replacing the current content.
    ///
    /// Malformed markup yields a single `ParseError` and leaves the root
    /// untouched. Otherwise loading continues past invalid elements, so the
    /// root may be populated and the returned errors non-empty at once.
    pub fn load_sdf_string_with_config(&mut self, text: &str, config: &ParserConfig) -> Errors {
        let element = match parse_element_str(text) {
            Ok(element) => element,
            Err(e) => return vec![e],
        };

        *self = Self::default();
        let mut errors = Errors::new();
        self.load(&element, config, &mut errors);

        debug!(
            version = %self.version,
            worlds = self.worlds.len(),
            standalone = self.content.is_some(),
            errors = errors.len(),
            "loaded scene description"
        );
        errors
    }

    fn load(&mut self, element: &Element, config: &ParserConfig, errors: &mut Errors) {
        if element.tag() != "sdf" {
            errors.push(Error::new(
                ErrorCode::ElementIncorrectType,
                format!("root element is <{}>, expected <sdf>", element.tag()),
            ));
            return;
        }

        match element.attribute("version") {
            Some(version) => {
                if version != SDF_PROTOCOL_VERSION {
                    debug!(
                        version,
                        supported = SDF_PROTOCOL_VERSION,
                        "document version differs from the supported version"
                    );
                }
                self.version = version.to_string();
            }
            None => errors.push(Error::missing_attribute("version", "sdf")),
        }

        self.unknown_elements =
            unknown_children(element, &["world", "model", "light", "actor"], config, errors);

        self.worlds = load_unique_repeated(element, config, errors);

        let mut standalone: Vec<RootContent> = Vec::new();
        let models: Vec<Model> = load_unique_repeated(element, config, errors);
        let lights: Vec<Light> = load_unique_repeated(element, config, errors);
        let actors: Vec<Actor> = load_unique_repeated(element, config, errors);
        standalone.extend(models.into_iter().map(RootContent::Model));
        standalone.extend(lights.into_iter().map(RootContent::Light));
        standalone.extend(actors.into_iter().map(RootContent::Actor));

        if !self.worlds.is_empty() && !standalone.is_empty() {
            errors.push(Error::invalid_element(
                "sdf",
                "document",
                "a document with worlds cannot also hold a standalone model, light or actor",
            ));
            return;
        }
        if standalone.len() > 1 {
            errors.push(Error::invalid_element(
                "sdf",
                "document",
                format!(
                    "a document holds at most one model, light or actor, found {}",
                    standalone.len()
                ),
            ));
        }
        self.content = standalone.into_iter().next();
    }

    // ------------------------------------------------------------------------
    // Worlds
    // ------------------------------------------------------------------------

    /// Number of worlds.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// World at `index`, or `None` when out of range.
    #[must_use]
    pub fn world_by_index(&self, index: usize) -> Option<&World> {
        self.worlds.get(index)
    }

    /// Mutable world at `index`.
    pub fn world_by_index_mut(&mut self, index: usize) -> Option<&mut World> {
        self.worlds.get_mut(index)
    }

    /// World named `name`.
    #[must_use]
    pub fn world_by_name(&self, name: &str) -> Option<&World> {
        self.worlds.iter().find(|w| w.name() == name)
    }

    /// Whether a world named `name` exists.
    #[must_use]
    pub fn world_name_exists(&self, name: &str) -> bool {
        self.world_by_name(name).is_some()
    }

    /// Append a world.
    ///
    /// Fails with `DuplicateName`, leaving the root unchanged, when a world
    /// of the same name already exists.
    pub fn add_world(&mut self, world: World) -> Errors {
        add_unique(&mut self.worlds, world)
    }

    /// Remove all worlds.
    pub fn clear_worlds(&mut self) {
        self.worlds.clear();
    }

    // ------------------------------------------------------------------------
    // Standalone content
    // ------------------------------------------------------------------------

    /// The standalone object, if any.
    #[must_use]
    pub const fn content(&self) -> Option<&RootContent> {
        self.content.as_ref()
    }

    /// The standalone model, if the document holds one.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        match &self.content {
            Some(RootContent::Model(model)) => Some(model),
            _ => None,
        }
    }

    /// The standalone light, if the document holds one.
    #[must_use]
    pub fn light(&self) -> Option<&Light> {
        match &self.content {
            Some(RootContent::Light(light)) => Some(light),
            _ => None,
        }
    }

    /// The standalone actor, if the document holds one.
    #[must_use]
    pub fn actor(&self) -> Option<&Actor> {
        match &self.content {
            Some(RootContent::Actor(actor)) => Some(actor),
            _ => None,
        }
    }

    /// Replace the standalone object with `model`.
    pub fn set_model(&mut self, model: Model) {
        self.content = Some(RootContent::Model(model));
    }

    /// Replace the standalone object with `light`.
    pub fn set_light(&mut self, light: Light) {
        self.content = Some(RootContent::Light(light));
    }

    /// Replace the standalone object with `actor`.
    pub fn set_actor(&mut self, actor: Actor) {
        self.content = Some(RootContent::Actor(actor));
    }

    /// Unrecognized children of `<sdf>`, kept verbatim and written back by `to_element`.
    #[must_use]
    pub fn unknown_elements(&self) -> &[Element] {
        &self.unknown_elements
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Write as an `<sdf>` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("sdf").with_attribute("version", &self.version);
        for world in &self.worlds {
            element.push_child(world.to_element());
        }
        match &self.content {
            Some(RootContent::Model(model)) => element.push_child(model.to_element()),
            Some(RootContent::Light(light)) => element.push_child(light.to_element()),
            Some(RootContent::Actor(actor)) => element.push_child(actor.to_element()),
            None => {}
        }
        for unknown in &self.unknown_elements {
            element.push_child(unknown.clone());
        }
        element
    }

    /// Render the document as XML text.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        self.to_element().to_xml_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn codes(errors: &Errors) -> Vec<ErrorCode> {
        errors.iter().map(Error::code).collect()
    }

    #[test]
    fn test_default() {
        let root = Root::new();
        assert_eq!(root.version(), SDF_VERSION);
        assert_eq!(root.world_count(), 0);
        assert!(root.world_by_index(0).is_none());
        assert!(root.model().is_none());
        assert!(root.light().is_none());
        assert!(root.actor().is_none());
    }

    #[test]
    fn test_parse_error_leaves_root_untouched() {
        let mut root = Root::new();
        assert!(root.load_sdf_string("<sdf version='1.9'><world name='a'/></sdf>").is_empty());

        let errors = root.load_sdf_string("<sdf version='1.9'><world name='b'>");
        assert_eq!(codes(&errors), vec![ErrorCode::ParseError]);
        assert!(root.world_name_exists("a"));
    }

    #[test]
    fn test_reload_replaces_content() {
        let mut root = Root::new();
        root.load_sdf_string("<sdf version='1.9'><world name='a'/></sdf>");
        root.load_sdf_string("<sdf version='1.9'><model name='m'><link name='l'/></model></sdf>");
        assert_eq!(root.world_count(), 0);
        assert_eq!(root.model().unwrap().name(), "m");
    }

    #[test]
    fn test_wrong_root_tag() {
        let mut root = Root::new();
        let errors = root.load_sdf_string("<urdf/>");
        assert_eq!(codes(&errors), vec![ErrorCode::ElementIncorrectType]);
    }

    #[test]
    fn test_missing_version() {
        let mut root = Root::new();
        let errors = root.load_sdf_string("<sdf><world name='w'/></sdf>");
        assert_eq!(codes(&errors), vec![ErrorCode::AttributeMissing]);
        assert_eq!(root.world_count(), 1);
    }

    #[test]
    fn test_older_version_accepted() {
        let mut root = Root::new();
        let errors = root.load_sdf_string("<sdf version='1.6'><world name='w'/></sdf>");
        assert!(errors.is_empty());
        assert_eq!(root.version(), "1.6");
    }

    #[test]
    fn test_duplicate_world_names() {
        let mut root = Root::new();
        let errors =
            root.load_sdf_string("<sdf version='1.9'><world name='w'/><world name='w'/></sdf>");
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
        assert_eq!(root.world_count(), 1);
    }

    #[test]
    fn test_worlds_exclude_standalone_objects() {
        let mut root = Root::new();
        let errors = root.load_sdf_string(
            "<sdf version='1.9'><world name='w'/><light name='l' type='point'/></sdf>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::ElementInvalid]);
        assert_eq!(root.world_count(), 1);
        assert!(root.light().is_none());
    }

    #[test]
    fn test_single_standalone_object() {
        let mut root = Root::new();
        let errors = root.load_sdf_string(
            "<sdf version='1.9'><light name='l' type='spot'/>\
             <model name='m'><link name='k'/></model></sdf>",
        );
        assert_eq!(codes(&errors), vec![ErrorCode::ElementInvalid]);
        assert_eq!(root.model().unwrap().name(), "m");
        assert!(root.light().is_none());
    }

    #[test]
    fn test_standalone_light() {
        let mut root = Root::new();
        let errors = root.load_sdf_string(
            "<sdf version='1.9'><light name='sun' type='directional'>\
             <direction>0 0 -1</direction></light></sdf>",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(root.light().unwrap().name(), "sun");
        assert!(matches!(root.content(), Some(RootContent::Light(_))));
    }

    #[test]
    fn test_add_world() {
        let mut root = Root::new();
        assert!(root.add_world(World::new("a")).is_empty());
        let errors = root.add_world(World::new("a"));
        assert_eq!(codes(&errors), vec![ErrorCode::DuplicateName]);
        assert_eq!(root.world_count(), 1);

        root.clear_worlds();
        assert_eq!(root.world_count(), 0);
    }

    #[test]
    fn test_set_content() {
        let mut root = Root::new();
        root.set_actor(Actor::new("walker"));
        assert_eq!(root.actor().unwrap().name(), "walker");
        root.set_model(Model::new("m"));
        assert!(root.actor().is_none());
        assert_eq!(root.model().unwrap().name(), "m");
    }

    #[test]
    fn test_xml_round_trip() {
        let mut root = Root::new();
        root.load_sdf_string(
            "<sdf version='1.9'><world name='w'><gravity>0 0 -3</gravity>\
             <model name='m'><link name='l'><collision name='c'><geometry>\
             <sphere><radius>0.5</radius></sphere></geometry></collision></link></model>\
             </world></sdf>",
        );
        let xml = root.to_xml_string().unwrap();

        let mut back = Root::new();
        let errors = back.load_sdf_string(&xml);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(back, root);
    }
}
