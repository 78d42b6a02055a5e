//! Loading and writing `<geometry>` elements.

use nalgebra::Vector3;
use sdf_types::{
    BoxShape, Capsule, Cylinder, Ellipsoid, Geometry, Mesh, Plane, Sphere, format_vector2,
    parse_vector2, parse_vector3,
};

use crate::config::ParserConfig;
use crate::element::Element;
use crate::error::{Error, Errors};
use crate::parse::{
    check_children, child_parsed, describe, push_value, push_vector3, required_child_value,
};

const SHAPE_TAGS: &[&str] = &[
    "empty",
    "box",
    "cylinder",
    "sphere",
    "capsule",
    "ellipsoid",
    "plane",
    "mesh",
];

/// Load the shape inside a `<geometry>` element.
///
/// A geometry with no shape child is [`Geometry::Empty`]. Missing or invalid
/// dimensions are reported and fall back to the shape's defaults.
/// Non-positive dimensions are kept as written and reported through the
/// warnings policy.
pub(crate) fn load_geometry(
    element: &Element,
    config: &ParserConfig,
    errors: &mut Errors,
) -> Geometry {
    check_children(element, SHAPE_TAGS, config, errors);

    let mut shapes = element
        .children()
        .iter()
        .filter(|c| SHAPE_TAGS.contains(&c.tag()));
    let Some(shape) = shapes.next() else {
        return Geometry::Empty;
    };
    if let Some(extra) = shapes.next() {
        config.warn(
            &format!(
                "geometry holds more than one shape; ignoring <{}> after <{}>",
                extra.tag(),
                shape.tag()
            ),
            errors,
        );
    }

    match shape.tag() {
        "box" => {
            let mut b = BoxShape::default();
            if let Some(size) = required_vector3(shape, "size", errors) {
                check_positive(shape, "size", size.min(), config, errors);
                b.set_size(size);
            }
            Geometry::Box(b)
        }
        "cylinder" => {
            let mut c = Cylinder::default();
            if let Some(radius) = required_child_value::<f64>(shape, "radius", errors) {
                check_positive(shape, "radius", radius, config, errors);
                c.set_radius(radius);
            }
            if let Some(length) = required_child_value::<f64>(shape, "length", errors) {
                check_positive(shape, "length", length, config, errors);
                c.set_length(length);
            }
            Geometry::Cylinder(c)
        }
        "sphere" => {
            let mut s = Sphere::default();
            if let Some(radius) = required_child_value::<f64>(shape, "radius", errors) {
                check_positive(shape, "radius", radius, config, errors);
                s.set_radius(radius);
            }
            Geometry::Sphere(s)
        }
        "capsule" => {
            let mut c = Capsule::default();
            if let Some(radius) = required_child_value::<f64>(shape, "radius", errors) {
                check_positive(shape, "radius", radius, config, errors);
                c.set_radius(radius);
            }
            if let Some(length) = required_child_value::<f64>(shape, "length", errors) {
                check_positive(shape, "length", length, config, errors);
                c.set_length(length);
            }
            Geometry::Capsule(c)
        }
        "ellipsoid" => {
            let mut e = Ellipsoid::default();
            if let Some(radii) = required_vector3(shape, "radii", errors) {
                check_positive(shape, "radii", radii.min(), config, errors);
                e.set_radii(radii);
            }
            Geometry::Ellipsoid(e)
        }
        "plane" => {
            let mut p = Plane::default();
            if let Some(normal) = required_vector3(shape, "normal", errors) {
                if normal.norm() <= f64::EPSILON {
                    config.warn(
                        &format!("plane normal in {} has zero length", describe(element)),
                        errors,
                    );
                }
                p.set_normal(normal);
            }
            if let Some(size) = child_parsed(shape, "size", errors, parse_vector2) {
                p.set_size(size);
            }
            Geometry::Plane(p)
        }
        "mesh" => {
            let mut m = Mesh::default();
            match shape.child_text("uri") {
                Some(uri) if !uri.is_empty() => m.uri = uri.to_string(),
                _ => errors.push(Error::missing_element("uri", describe(shape))),
            }
            if let Some(scale) = child_parsed(shape, "scale", errors, parse_vector3) {
                m.scale = scale;
            }
            m.submesh = shape
                .child("submesh")
                .and_then(|s| s.child_text("name"))
                .map(str::to_string);
            Geometry::Mesh(m)
        }
        _ => Geometry::Empty,
    }
}

fn required_vector3(element: &Element, tag: &str, errors: &mut Errors) -> Option<Vector3<f64>> {
    if !element.has_child(tag) {
        errors.push(Error::missing_element(tag, describe(element)));
        return None;
    }
    child_parsed(element, tag, errors, parse_vector3)
}

fn check_positive(
    shape: &Element,
    field: &str,
    value: f64,
    config: &ParserConfig,
    errors: &mut Errors,
) {
    if value <= 0.0 {
        config.warn(
            &format!("{} {field} must be positive, got {value}", shape.tag()),
            errors,
        );
    }
}

/// Write a geometry as a `<geometry>` element.
pub(crate) fn geometry_element(geometry: &Geometry) -> Element {
    let mut shape = Element::new(geometry.type_name());
    match geometry {
        Geometry::Empty => {}
        Geometry::Box(b) => push_vector3(&mut shape, "size", &b.size()),
        Geometry::Cylinder(c) => {
            push_value(&mut shape, "radius", c.radius());
            push_value(&mut shape, "length", c.length());
        }
        Geometry::Sphere(s) => push_value(&mut shape, "radius", s.radius()),
        Geometry::Capsule(c) => {
            push_value(&mut shape, "radius", c.radius());
            push_value(&mut shape, "length", c.length());
        }
        Geometry::Ellipsoid(e) => push_vector3(&mut shape, "radii", &e.radii()),
        Geometry::Plane(p) => {
            push_vector3(&mut shape, "normal", &p.normal());
            push_value(&mut shape, "size", format_vector2(&p.size()));
        }
        Geometry::Mesh(m) => {
            push_value(&mut shape, "uri", &m.uri);
            if m.scale != Vector3::new(1.0, 1.0, 1.0) {
                push_vector3(&mut shape, "scale", &m.scale);
            }
            if let Some(submesh) = &m.submesh {
                shape.push_child(Element::new("submesh").with_child(
                    Element::new("name").with_text(submesh),
                ));
            }
        }
    }
    Element::new("geometry").with_child(shape)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::element::parse_element_str;
    use crate::error::ErrorCode;

    fn load(xml: &str, config: &ParserConfig) -> (Geometry, Errors) {
        let element = parse_element_str(xml).unwrap();
        let mut errors = Errors::new();
        let geometry = load_geometry(&element, config, &mut errors);
        (geometry, errors)
    }

    #[test]
    fn test_load_cylinder() {
        let (geometry, errors) = load(
            "<geometry><cylinder><radius>0.2</radius><length>3</length></cylinder></geometry>",
            &ParserConfig::default(),
        );
        assert!(errors.is_empty());
        let cylinder = geometry.as_cylinder().unwrap();
        assert_eq!(cylinder.radius(), 0.2);
        assert_eq!(cylinder.length(), 3.0);
    }

    #[test]
    fn test_load_box_and_sphere() {
        let (geometry, errors) = load(
            "<geometry><box><size>1 2 3</size></box></geometry>",
            &ParserConfig::default(),
        );
        assert!(errors.is_empty());
        assert_eq!(geometry.as_box().unwrap().size(), Vector3::new(1.0, 2.0, 3.0));

        let (geometry, _) = load(
            "<geometry><sphere><radius>2</radius></sphere></geometry>",
            &ParserConfig::default(),
        );
        assert_eq!(geometry.as_sphere().unwrap().radius(), 2.0);
    }

    #[test]
    fn test_empty_geometry() {
        let (geometry, errors) = load("<geometry/>", &ParserConfig::default());
        assert_eq!(geometry, Geometry::Empty);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_dimension_uses_default() {
        let (geometry, errors) = load(
            "<geometry><cylinder><radius>0.3</radius></cylinder></geometry>",
            &ParserConfig::default(),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::ElementMissing);
        assert_eq!(geometry.as_cylinder().unwrap().length(), 1.0);
    }

    #[test]
    fn test_invalid_number() {
        let (geometry, errors) = load(
            "<geometry><sphere><radius>big</radius></sphere></geometry>",
            &ParserConfig::default(),
        );
        assert_eq!(errors[0].code(), ErrorCode::ElementInvalid);
        assert_eq!(geometry.as_sphere().unwrap().radius(), 1.0);
    }

    #[test]
    fn test_negative_dimension_policy() {
        let xml = "<geometry><sphere><radius>-1</radius></sphere></geometry>";

        let (geometry, errors) = load(xml, &ParserConfig::default());
        assert!(errors.is_empty());
        assert_eq!(geometry.as_sphere().unwrap().radius(), -1.0);

        let (geometry, errors) = load(xml, &ParserConfig::pedantic());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), ErrorCode::ElementInvalid);
        assert_eq!(geometry.as_sphere().unwrap().radius(), -1.0);
    }

    #[test]
    fn test_mesh() {
        let (geometry, errors) = load(
            "<geometry><mesh><uri>model://robot/arm.dae</uri><scale>2 2 2</scale>\
             <submesh><name>forearm</name></submesh></mesh></geometry>",
            &ParserConfig::default(),
        );
        assert!(errors.is_empty());
        let mesh = geometry.as_mesh().unwrap();
        assert_eq!(mesh.uri, "model://robot/arm.dae");
        assert_eq!(mesh.scale, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(mesh.submesh.as_deref(), Some("forearm"));

        let (_, errors) = load("<geometry><mesh/></geometry>", &ParserConfig::default());
        assert_eq!(errors[0].code(), ErrorCode::ElementMissing);
    }

    #[test]
    fn test_write_and_reload() {
        let shapes = [
            Geometry::Empty,
            Geometry::Box(BoxShape::new(Vector3::new(1.0, 2.0, 3.0))),
            Geometry::Cylinder(Cylinder::new(0.25, 4.0)),
            Geometry::Capsule(Capsule::new(0.1, 0.5)),
            Geometry::Plane(Plane::default()),
            Geometry::Mesh(Mesh::new("file://a.stl")),
        ];
        for geometry in shapes {
            let element = geometry_element(&geometry);
            let mut errors = Errors::new();
            let back = load_geometry(&element, &ParserConfig::pedantic(), &mut errors);
            assert!(errors.is_empty(), "{errors:?}");
            assert_eq!(back, geometry);
        }
    }
}
