//! RGBA color values.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValueParseError;

/// An RGBA color with components nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a color from its four components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ValueParseError;

    /// Parses `r g b` or `r g b a`; alpha defaults to 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(|token| {
                token.parse::<f32>().map_err(|_| ValueParseError::InvalidNumber {
                    token: token.to_string(),
                    kind: "color",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b, 1.0)),
            [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
            _ => Err(ValueParseError::WrongArity {
                kind: "color",
                expected: 4,
                actual: parts.len(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_and_rgba() {
        let c: Color = "0.1 0.2 0.3".parse().unwrap();
        assert_eq!(c, Color::new(0.1, 0.2, 0.3, 1.0));

        let c: Color = "1 0 0 0.5".parse().unwrap();
        assert_eq!(c.a, 0.5);

        assert!("1 0".parse::<Color>().is_err());
        assert!("1 0 x".parse::<Color>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::WHITE.to_string(), "1 1 1 1");
    }
}
