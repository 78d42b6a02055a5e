//! Text forms of the vector types used by shape and DOM elements.

use nalgebra::{Vector2, Vector3};

use crate::error::{ValueParseError, parse_floats};

/// Parse `"x y z"` into a vector.
///
/// # Errors
///
/// Returns an error unless the text holds exactly three numbers.
pub fn parse_vector3(s: &str) -> Result<Vector3<f64>, ValueParseError> {
    let [x, y, z] = parse_floats::<3>(s, "vector3")?;
    Ok(Vector3::new(x, y, z))
}

/// Parse `"x y"` into a vector.
///
/// # Errors
///
/// Returns an error unless the text holds exactly two numbers.
pub fn parse_vector2(s: &str) -> Result<Vector2<f64>, ValueParseError> {
    let [x, y] = parse_floats::<2>(s, "vector2")?;
    Ok(Vector2::new(x, y))
}

/// Format a vector as space-separated components.
#[must_use]
pub fn format_vector3(v: &Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

/// Format a vector as space-separated components.
#[must_use]
pub fn format_vector2(v: &Vector2<f64>) -> String {
    format!("{} {}", v.x, v.y)
}
