#[cfg(test)]
#[path = "point_test.rs"]
mod point_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// A point in image coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse an `"x,y"` string. Each field is rounded to the nearest integer.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] unless the string holds exactly two numeric
    /// comma-separated fields.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(FormatError::part_count(s, ',', 2, parts.len()));
        }
        let x = parse_rounded(s, parts[0])?;
        let y = parse_rounded(s, parts[1])?;
        Ok(Self { x, y })
    }

    /// A new point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// A new point shifted by the coordinates of `other`.
    #[must_use]
    pub fn offset_by(self, other: Point) -> Self {
        self.offset(other.x, other.y)
    }

    /// Translate this point in place.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Scale both coordinates by `ratio`.
    #[must_use]
    pub fn scaled(self, ratio: f64) -> Self {
        Self { x: self.x * ratio, y: self.y * ratio }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// This point with both coordinates rounded to whole pixels.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self { x: self.x.round(), y: self.y.round() }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", round_px(self.x), round_px(self.y))
    }
}

/// Round to the nearest whole pixel, half away from zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn round_px(v: f64) -> i64 {
    v.round() as i64
}

fn parse_rounded(input: &str, field: &str) -> Result<f64, FormatError> {
    let trimmed = field.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v.round()),
        _ => Err(FormatError::not_numeric(input, trimmed)),
    }
}
