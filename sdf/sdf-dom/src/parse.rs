//! Helpers shared by the DOM loaders.
//!
//! Every loader follows the same pattern: read what it can from an
//! [`Element`], append one [`Error`] per problem, and return `None` only when
//! the object itself cannot be built (e.g. it has no name).

use std::fmt::Display;
use std::str::FromStr;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use sdf_types::{Pose3d, format_vector3, parse_vector3};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};

/// A DOM object loaded from a repeated, named child element.
pub(crate) trait Load: Sized {
    /// Tag of the element this type is loaded from.
    const TAG: &'static str;

    /// Build the object, appending any problems to `errors`.
    fn load(element: &Element, config: &ParserConfig, errors: &mut Errors) -> Option<Self>;

    /// Name that must be unique among siblings.
    fn name(&self) -> &str;
}

/// Load every child of `parent` tagged `T::TAG`, dropping later duplicates.
pub(crate) fn load_unique_repeated<T: Load>(
    parent: &Element,
    config: &ParserConfig,
    errors: &mut Errors,
) -> Vec<T> {
    let mut items: Vec<T> = Vec::new();
    for child in parent.children_named(T::TAG) {
        let Some(item) = T::load(child, config, errors) else {
            continue;
        };
        if items.iter().any(|existing| existing.name() == item.name()) {
            errors.push(Error::duplicate_name(T::TAG, item.name()));
            continue;
        }
        items.push(item);
    }
    items
}

/// Append `item` unless a sibling already uses its name.
pub(crate) fn add_unique<T: Load>(items: &mut Vec<T>, item: T) -> Errors {
    if items.iter().any(|existing| existing.name() == item.name()) {
        return vec![Error::duplicate_name(T::TAG, item.name())];
    }
    items.push(item);
    Errors::new()
}

/// Whether a name is reserved for frames the library defines itself.
pub(crate) fn is_reserved_name(name: &str) -> bool {
    name == "world" || (name.len() > 4 && name.starts_with("__") && name.ends_with("__"))
}

/// Read the required `name` attribute.
pub(crate) fn load_name(element: &Element, errors: &mut Errors) -> Option<String> {
    match element.attribute("name") {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => {
            errors.push(Error::missing_attribute("name", element.tag()));
            None
        }
    }
}

/// Read the required `name` attribute and reject reserved names.
pub(crate) fn load_frame_name(element: &Element, errors: &mut Errors) -> Option<String> {
    let name = load_name(element, errors)?;
    if is_reserved_name(&name) {
        errors.push(Error::reserved_name(element.tag(), &name));
        return None;
    }
    Some(name)
}

/// Describe an element for error messages, e.g. `link 'base'`.
pub(crate) fn describe(element: &Element) -> String {
    match element.attribute("name") {
        Some(name) => format!("{} '{name}'", element.tag()),
        None => element.tag().to_string(),
    }
}

// ============================================================================
// Poses
// ============================================================================

/// Read the optional `<pose>` child: the raw pose and its `relative_to`.
///
/// The pose text is `x y z roll pitch yaw`, in radians unless
/// `degrees="true"`, or `x y z qx qy qz qw` with
/// `rotation_format="quat_xyzw"`. Invalid text yields an error and the
/// identity pose.
pub(crate) fn load_pose(element: &Element, errors: &mut Errors) -> (Pose3d, String) {
    let Some(pose) = element.child("pose") else {
        return (Pose3d::identity(), String::new());
    };
    let relative_to = pose.attribute("relative_to").unwrap_or_default().to_string();

    let text = pose.text().unwrap_or_default();
    if text.trim().is_empty() {
        return (Pose3d::identity(), relative_to);
    }

    match parse_pose_text(pose, text) {
        Ok(value) => (value, relative_to),
        Err(message) => {
            errors.push(Error::invalid_element("pose", describe(element), message));
            (Pose3d::identity(), relative_to)
        }
    }
}

fn parse_pose_text(pose: &Element, text: &str) -> Result<Pose3d, String> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("invalid number '{token}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match pose.attribute("rotation_format").unwrap_or("euler_rpy") {
        "euler_rpy" => {
            let &[x, y, z, roll, pitch, yaw] = values.as_slice() else {
                return Err(format!("expected 6 values, got {}", values.len()));
            };
            let degrees = pose.attribute("degrees").and_then(parse_bool) == Some(true);
            if degrees {
                Ok(Pose3d::new(
                    x,
                    y,
                    z,
                    roll.to_radians(),
                    pitch.to_radians(),
                    yaw.to_radians(),
                ))
            } else {
                Ok(Pose3d::new(x, y, z, roll, pitch, yaw))
            }
        }
        "quat_xyzw" => {
            let &[x, y, z, qx, qy, qz, qw] = values.as_slice() else {
                return Err(format!("expected 7 values, got {}", values.len()));
            };
            let q = Quaternion::new(qw, qx, qy, qz);
            if q.norm() <= f64::EPSILON {
                return Err("quaternion has zero length".to_string());
            }
            Ok(Pose3d::from_position_rotation(
                nalgebra::Point3::new(x, y, z),
                UnitQuaternion::from_quaternion(q),
            ))
        }
        other => Err(format!("unknown rotation_format '{other}'")),
    }
}

// ============================================================================
// Values
// ============================================================================

/// Parse an SDFormat boolean (`true`, `false`, `1`, `0`).
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse the text of an optional child with `parse`.
///
/// Returns `None` if the child is absent or its text is invalid; the latter
/// also appends an `ElementInvalid` error.
pub(crate) fn child_parsed<T, E: Display>(
    element: &Element,
    tag: &str,
    errors: &mut Errors,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    let child = element.child(tag)?;
    match parse(child.text().unwrap_or_default()) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(Error::invalid_element(tag, describe(element), e));
            None
        }
    }
}

/// Parse an optional child with [`FromStr`].
pub(crate) fn child_value<T>(element: &Element, tag: &str, errors: &mut Errors) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    child_parsed(element, tag, errors, str::parse)
}

/// Parse an optional boolean child.
pub(crate) fn child_bool(element: &Element, tag: &str, errors: &mut Errors) -> Option<bool> {
    child_parsed(element, tag, errors, |text| {
        parse_bool(text).ok_or_else(|| format!("'{text}' is not a boolean"))
    })
}

/// Parse an optional vector child.
pub(crate) fn child_vector3(
    element: &Element,
    tag: &str,
    errors: &mut Errors,
) -> Option<Vector3<f64>> {
    child_parsed(element, tag, errors, parse_vector3)
}

/// Parse an optional number expected in `[0, 1]`; values outside go
/// through the warnings policy.
pub(crate) fn child_unit_interval(
    element: &Element,
    tag: &str,
    config: &ParserConfig,
    errors: &mut Errors,
) -> Option<f64> {
    let value = child_value::<f64>(element, tag, errors)?;
    if !(0.0..=1.0).contains(&value) {
        config.warn(
            &format!("{tag} in {} should lie in [0, 1], got {value}", describe(element)),
            errors,
        );
    }
    Some(value)
}

/// Parse a child that must be present; a missing child appends
/// `ElementMissing`.
pub(crate) fn required_child_value<T>(
    element: &Element,
    tag: &str,
    errors: &mut Errors,
) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    if !element.has_child(tag) {
        errors.push(Error::missing_element(tag, describe(element)));
        return None;
    }
    child_value(element, tag, errors)
}

/// Route every child whose tag is not in `known` through the
/// unrecognized-elements policy. Namespaced tags (`ns:tag`) are skipped.
pub(crate) fn check_children(
    element: &Element,
    known: &[&str],
    config: &ParserConfig,
    errors: &mut Errors,
) {
    for child in element.children() {
        let tag = child.tag();
        if tag.contains(':') || known.contains(&tag) {
            continue;
        }
        config.unrecognized(
            &format!("unrecognized element <{tag}> in {}", describe(element)),
            errors,
        );
    }
}

/// Like [`check_children`], and also return copies of the children that were
/// not in `known`, namespaced ones included, so they can be written back out.
pub(crate) fn unknown_children(
    element: &Element,
    known: &[&str],
    config: &ParserConfig,
    errors: &mut Errors,
) -> Vec<Element> {
    check_children(element, known, config, errors);
    element
        .children()
        .iter()
        .filter(|child| !known.contains(&child.tag()))
        .cloned()
        .collect()
}

// ============================================================================
// Writing
// ============================================================================

/// Append `<pose>` unless the pose is the identity with no `relative_to`.
pub(crate) fn push_pose(element: &mut Element, pose: &Pose3d, relative_to: &str) {
    if *pose == Pose3d::identity() && relative_to.is_empty() {
        return;
    }
    let mut child = Element::new("pose").with_text(pose);
    if !relative_to.is_empty() {
        child.set_attribute("relative_to", relative_to);
    }
    element.push_child(child);
}

/// Append `<tag>value</tag>`.
pub(crate) fn push_value(element: &mut Element, tag: &str, value: impl Display) {
    element.push_child(Element::new(tag).with_text(value));
}

/// Append `<tag>x y z</tag>`.
pub(crate) fn push_vector3(element: &mut Element, tag: &str, value: &Vector3<f64>) {
    element.push_child(Element::new(tag).with_text(format_vector3(value)));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::parse_element_str;
    use crate::error::ErrorCode;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved_name("world"));
        assert!(is_reserved_name("__model__"));
        assert!(!is_reserved_name("__"));
        assert!(!is_reserved_name("____"));
        assert!(!is_reserved_name("_link_"));
        assert!(!is_reserved_name("worlds"));
    }

    #[test]
    fn test_load_name_missing() {
        let element = parse_element_str("<collision/>").unwrap();
        let mut errors = Errors::new();
        assert!(load_name(&element, &mut errors).is_none());
        assert_eq!(errors[0].code(), ErrorCode::AttributeMissing);
        assert!(errors[0].message().contains("collision name is required"));
    }

    #[test]
    fn test_load_frame_name_reserved() {
        let element = parse_element_str("<frame name='__model__'/>").unwrap();
        let mut errors = Errors::new();
        assert!(load_frame_name(&element, &mut errors).is_none());
        assert_eq!(errors[0].code(), ErrorCode::ReservedName);
    }

    #[test]
    fn test_load_pose_relative_to() {
        let element =
            parse_element_str("<frame name='f'><pose relative_to='a'>0 1 0 0 0 0</pose></frame>")
                .unwrap();
        let mut errors = Errors::new();
        let (pose, relative_to) = load_pose(&element, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(pose, Pose3d::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(relative_to, "a");
    }

    #[test]
    fn test_load_pose_degrees() {
        let element =
            parse_element_str("<link name='l'><pose degrees='true'>0 0 0 0 0 90</pose></link>")
                .unwrap();
        let mut errors = Errors::new();
        let (pose, _) = load_pose(&element, &mut errors);
        assert!(errors.is_empty());
        assert_relative_eq!(pose.rpy().z, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_load_pose_quaternion() {
        let element = parse_element_str(
            "<link name='l'><pose rotation_format='quat_xyzw'>1 2 3 0 0 0 1</pose></link>",
        )
        .unwrap();
        let mut errors = Errors::new();
        let (pose, _) = load_pose(&element, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(pose, Pose3d::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_load_pose_invalid() {
        let element = parse_element_str("<link name='l'><pose>0 1 nope</pose></link>").unwrap();
        let mut errors = Errors::new();
        let (pose, _) = load_pose(&element, &mut errors);
        assert_eq!(pose, Pose3d::identity());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::ElementInvalid);
    }

    #[test]
    fn test_child_values() {
        let element = parse_element_str(
            "<light name='l'><cast_shadows>1</cast_shadows><intensity>oops</intensity>\
             <direction>0 0 -1</direction></light>",
        )
        .unwrap();
        let mut errors = Errors::new();
        assert_eq!(child_bool(&element, "cast_shadows", &mut errors), Some(true));
        assert_eq!(child_value::<f64>(&element, "intensity", &mut errors), None);
        assert_eq!(
            child_vector3(&element, "direction", &mut errors),
            Some(Vector3::new(0.0, 0.0, -1.0))
        );
        assert_eq!(child_value::<f64>(&element, "missing", &mut errors), None);
        assert_eq!(errors.len(), 1);

        assert_eq!(
            required_child_value::<f64>(&element, "radius", &mut errors),
            None
        );
        assert_eq!(errors[1].code(), ErrorCode::ElementMissing);
    }

    #[test]
    fn test_check_children() {
        let element =
            parse_element_str("<link name='l'><pose/><bogus/><ext:thing/></link>").unwrap();
        let mut errors = Errors::new();
        check_children(&element, &["pose"], &ParserConfig::pedantic(), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::ElementIncorrectType);

        let mut errors = Errors::new();
        check_children(&element, &["pose"], &ParserConfig::default(), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unknown_children_are_copied() {
        let element =
            parse_element_str("<link name='l'><pose/><bogus a='1'>x</bogus><ext:thing/></link>")
                .unwrap();
        let mut errors = Errors::new();
        let unknown =
            unknown_children(&element, &["pose"], &ParserConfig::default(), &mut errors);
        assert!(errors.is_empty());
        let tags: Vec<_> = unknown.iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["bogus", "ext:thing"]);
        assert_eq!(unknown[0].attribute("a"), Some("1"));
        assert_eq!(unknown[0].text(), Some("x"));
    }

    #[test]
    fn test_push_pose_skips_identity() {
        let mut element = Element::new("link");
        push_pose(&mut element, &Pose3d::identity(), "");
        assert!(element.children().is_empty());

        push_pose(&mut element, &Pose3d::identity(), "frame");
        assert_eq!(
            element.child("pose").unwrap().attribute("relative_to"),
            Some("frame")
        );
    }
}
