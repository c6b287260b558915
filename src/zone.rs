//! Tolerance zones: the circle around each authored endpoint.

#[cfg(test)]
#[path = "zone_test.rs"]
mod zone_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimensions::Dimensions;
use crate::error::FormatError;
use crate::point::{Point, round_px};

/// A tolerance circle, serialized as `"x,y;r"`.
///
/// The radius may be negative while the editor is dragging a radius handle
/// past the centre. Call [`Zone::normalized`] before treating it as final.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zone {
    pub centre: Point,
    pub radius: f64,
}

impl Zone {
    #[must_use]
    pub fn new(centre: Point, radius: f64) -> Self {
        Self { centre, radius }
    }

    /// Parse an unscaled `"x,y;r"` string.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the string does not split into exactly two
    /// `;` parts, or if either part is not numeric.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        Self::parse_scaled(s, 1.0)
    }

    /// Parse `"x,y;r"` and scale the result by `ratio`.
    ///
    /// Centre coordinates and radius are each rounded to integers before the
    /// ratio is applied; the scaled values are not rounded again.
    ///
    /// # Errors
    ///
    /// Same as [`Zone::parse`].
    pub fn parse_scaled(s: &str, ratio: f64) -> Result<Self, FormatError> {
        let parts: Vec<&str> = s.split(';').collect();
        if parts.len() != 2 {
            return Err(FormatError::part_count(s, ';', 2, parts.len()));
        }
        let centre = Point::parse(parts[0])?.scaled(ratio);
        let radius_str = parts[1].trim();
        let radius = match radius_str.parse::<f64>() {
            Ok(r) if r.is_finite() => r.round() * ratio,
            _ => return Err(FormatError::not_numeric(s, radius_str)),
        };
        Ok(Self { centre, radius })
    }

    /// Same zone with a non-negative radius.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self { centre: self.centre, radius: self.radius.abs() }
    }

    /// Undo a display scale and return the authoritative `"x,y;r"` string.
    #[must_use]
    pub fn unscaled_string(self, ratio: f64) -> String {
        let r = if ratio.abs() < f64::EPSILON { 1.0 } else { ratio };
        let unscaled = Self { centre: self.centre.scaled(1.0 / r), radius: self.radius.abs() / r };
        unscaled.to_string()
    }

    /// Whether the whole circle lies inside the image.
    #[must_use]
    pub fn fits_within(self, dims: Dimensions) -> bool {
        let r = self.radius.abs();
        self.centre.x - r >= 0.0
            && self.centre.y - r >= 0.0
            && self.centre.x + r <= dims.max_x()
            && self.centre.y + r <= dims.max_y()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.centre, round_px(self.radius))
    }
}

impl TryFrom<String> for Zone {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.to_string()
    }
}
