//! Coordinate string validation and parsing.
//!
//! Zone strings look like `"x,y;r"`. Response strings are whitespace-separated
//! `"x,y"` pairs: two for ordinary lines, two or four for infinite lines. A
//! comma only ever appears inside a pair, so the boundary between points is
//! always explicit.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use crate::error::FormatError;
use crate::point::Point;
use crate::question::LineType;
use crate::zone::Zone;

const ZONE_PATTERN: &str = r"^[0-9]+,[0-9]+;[0-9]+$";
const TWO_POINT_PATTERN: &str = r"^[0-9]+,[0-9]+\s+[0-9]+,[0-9]+$";
const FOUR_POINT_PATTERN: &str = r"^[0-9]+,[0-9]+(?:\s+[0-9]+,[0-9]+){3}$";

static ZONE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(ZONE_PATTERN));
static TWO_POINT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(TWO_POINT_PATTERN));
static FOUR_POINT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(FOUR_POINT_PATTERN));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            error!(%pattern, error = %e, "coordinate pattern failed to compile");
            None
        }
    }
}

fn full_match(re: &LazyLock<Option<Regex>>, s: &str) -> bool {
    match &**re {
        Some(compiled) => compiled.is_match(s),
        None => false,
    }
}

/// Whether `s` is a zone string of three non-negative integers, `"x,y;r"`.
#[must_use]
pub fn is_zone_coordinates_valid(s: &str) -> bool {
    !s.trim().is_empty() && full_match(&ZONE_RE, s)
}

/// Whether `s` is a two-point response of non-negative integers, `"x1,y1 x2,y2"`.
#[must_use]
pub fn are_response_coordinates_valid(s: &str) -> bool {
    !s.trim().is_empty() && full_match(&TWO_POINT_RE, s)
}

/// Whether `s` is a valid infinite-line response: two or four points.
#[must_use]
pub fn are_infinite_response_coordinates_valid(s: &str) -> bool {
    are_response_coordinates_valid(s) || (!s.trim().is_empty() && full_match(&FOUR_POINT_RE, s))
}

/// Validate a response string against the shape its line type expects.
#[must_use]
pub fn is_response_valid_for(line_type: LineType, s: &str) -> bool {
    if line_type.is_infinite() {
        are_infinite_response_coordinates_valid(s)
    } else {
        are_response_coordinates_valid(s)
    }
}

/// Parse a `"x,y;r"` zone string.
///
/// # Errors
///
/// Returns [`FormatError`] when the string is not a zone.
pub fn parse_zone(s: &str) -> Result<Zone, FormatError> {
    Zone::parse(s)
}

/// Parse every whitespace-separated `"x,y"` pair in a response string.
///
/// # Errors
///
/// Returns [`FormatError`] on the first pair that fails to parse.
pub fn parse_response_points(s: &str) -> Result<Vec<Point>, FormatError> {
    s.split_whitespace().map(Point::parse).collect()
}

/// Pick the two points that are graded against the start and end zones.
///
/// A four-point infinite-line response carries the border projections as its
/// outer pair; only the inner pair is the student's placement.
///
/// # Errors
///
/// Returns [`FormatError::PointCount`] when fewer than two points are present.
pub fn grading_pair(line_type: LineType, points: &[Point]) -> Result<(Point, Point), FormatError> {
    match points {
        [_, start, end, _] if line_type.is_infinite() => Ok((*start, *end)),
        [start, end, ..] => Ok((*start, *end)),
        _ => Err(FormatError::PointCount {
            input: points.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
            found: points.len(),
        }),
    }
}

/// Parse a response string and return its graded start and end points.
///
/// # Errors
///
/// Returns [`FormatError`] if any pair is malformed or too few are present.
pub fn parse_line_response(line_type: LineType, s: &str) -> Result<(Point, Point), FormatError> {
    let points = parse_response_points(s)?;
    grading_pair(line_type, &points).map_err(|e| match e {
        FormatError::PointCount { found, .. } => FormatError::PointCount { input: s.to_string(), found },
        other => other,
    })
}
