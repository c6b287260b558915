//! Line geometry: two tolerance zones joined by a line of a given type.
//!
//! DESIGN
//! ======
//! A `Line` is a plain value tagged by [`LineType`]; the type only changes
//! decoration and, for infinite lines, how the response is serialized. The
//! zone centres double as the line's current rendered endpoints. In the
//! authoring editor they are the zones being edited; during an attempt they
//! are the student's placement.
//!
//! Authoring moves clamp against the image size so a circle never extends
//! past any image edge. Student placement clamps only the point.

#[cfg(test)]
#[path = "line_test.rs"]
mod line_test;

use serde::{Deserialize, Serialize};

use crate::dimensions::Dimensions;
use crate::error::FormatError;
use crate::point::Point;
use crate::question::{LineType, QuestionLine};
use crate::zone::Zone;

/// Which end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Start,
    End,
}

/// A line as shown in the editor or placed by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub number: usize,
    pub line_type: LineType,
    pub label_start: String,
    pub label_middle: String,
    pub label_end: String,
    pub start: Zone,
    pub end: Zone,
}

impl Line {
    #[must_use]
    pub fn new(number: usize, line_type: LineType, start: Zone, end: Zone) -> Self {
        Self {
            number,
            line_type,
            label_start: String::new(),
            label_middle: String::new(),
            label_end: String::new(),
            start,
            end,
        }
    }

    /// Attach the three display labels.
    #[must_use]
    pub fn with_labels(mut self, start: &str, middle: &str, end: &str) -> Self {
        self.label_start = start.to_string();
        self.label_middle = middle.to_string();
        self.label_end = end.to_string();
        self
    }

    /// Build a display line from an authored line at the given image scale.
    #[must_use]
    pub fn from_question_line(line: &QuestionLine, ratio: f64) -> Self {
        let scale = |z: Zone| Zone::new(z.centre.scaled(ratio), z.radius * ratio);
        Self {
            number: line.number,
            line_type: line.line_type,
            label_start: line.label_start.clone(),
            label_middle: line.label_middle.clone(),
            label_end: line.label_end.clone(),
            start: scale(line.zone_start),
            end: scale(line.zone_end),
        }
    }

    /// Replace both zones from `"x,y;r"` strings scaled by `ratio`.
    ///
    /// The line is left untouched if either string is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if either zone string fails to parse.
    pub fn parse(&mut self, start_zone: &str, end_zone: &str, ratio: f64) -> Result<(), FormatError> {
        let start = Zone::parse_scaled(start_zone, ratio)?;
        let end = Zone::parse_scaled(end_zone, ratio)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    #[must_use]
    pub fn zone(&self, handle: Handle) -> &Zone {
        match handle {
            Handle::Start => &self.start,
            Handle::End => &self.end,
        }
    }

    fn zone_mut(&mut self, handle: Handle) -> &mut Zone {
        match handle {
            Handle::Start => &mut self.start,
            Handle::End => &mut self.end,
        }
    }

    /// Translate one endpoint, keeping its circle inside `[0,max_x]×[0,max_y]`.
    pub fn move_handle(&mut self, handle: Handle, dx: f64, dy: f64, max_x: f64, max_y: f64) {
        let zone = self.zone_mut(handle);
        zone.centre.move_by(dx, dy);
        clamp_centre(zone, max_x, max_y);
    }

    /// Translate both endpoints by the same delta, clamping each independently.
    pub fn move_entire_line(&mut self, dx: f64, dy: f64, max_x: f64, max_y: f64) {
        self.move_handle(Handle::Start, dx, dy, max_x, max_y);
        self.move_handle(Handle::End, dx, dy, max_x, max_y);
    }

    /// Translate one endpoint, keeping only the point itself inside the image.
    ///
    /// Used for student placement, where the circle is a drag affordance and
    /// must not stop the point short of an edge.
    pub fn move_point(&mut self, handle: Handle, dx: f64, dy: f64, max_x: f64, max_y: f64) {
        let c = &mut self.zone_mut(handle).centre;
        c.move_by(dx, dy);
        c.x = c.x.min(max_x).max(0.0);
        c.y = c.y.min(max_y).max(0.0);
    }

    /// Translate both endpoints by the same delta, clamping each point.
    pub fn move_entire_line_points(&mut self, dx: f64, dy: f64, max_x: f64, max_y: f64) {
        self.move_point(Handle::Start, dx, dy, max_x, max_y);
        self.move_point(Handle::End, dx, dy, max_x, max_y);
    }

    /// Grow or shrink one zone radius by the horizontal drag `dx`.
    ///
    /// The radius is clamped so the circle never crosses an image edge. It may
    /// go negative while dragging; [`Line::normalize_shape`] fixes that.
    pub fn edit(&mut self, handle: Handle, dx: f64, _dy: f64, max_x: f64, max_y: f64) {
        let zone = self.zone_mut(handle);
        let c = zone.centre;
        let limit = c.x.min(c.y).min(max_x - c.x).min(max_y - c.y);
        let mut radius = zone.radius + dx;
        if radius < -limit {
            radius = -limit;
        }
        if radius > limit {
            radius = limit;
        }
        zone.radius = radius;
    }

    /// Make both radii non-negative.
    pub fn normalize_shape(&mut self) {
        self.start = self.start.normalized();
        self.end = self.end.normalized();
    }

    /// Extend the line through both endpoints to the image border.
    ///
    /// Returns the two border points, rounded to whole pixels.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn infinite_projection(&self, width: f64, height: f64) -> [Point; 2] {
        let (a, b) = (self.start.centre, self.end.centre);
        let dx = b.x - a.x;
        let dy = b.y - a.y;

        if dx == 0.0 {
            return [Point::new(a.x, 0.0).rounded(), Point::new(a.x, height).rounded()];
        }
        if dy == 0.0 {
            return [Point::new(0.0, a.y).rounded(), Point::new(width, a.y).rounded()];
        }

        let slope = dy / dx;
        let intercept = a.y - slope * a.x;
        let project = |x: f64| {
            let y = slope * x + intercept;
            if y < 0.0 {
                Point::new(-intercept / slope, 0.0)
            } else if y > height {
                Point::new((height - intercept) / slope, height)
            } else {
                Point::new(x, y)
            }
        };
        [project(-width).rounded(), project(2.0 * width).rounded()]
    }

    /// Authoritative `"x,y;r"` strings for both zones, undoing `ratio`.
    #[must_use]
    pub fn zone_strings(&self, ratio: f64) -> (String, String) {
        (self.start.unscaled_string(ratio), self.end.unscaled_string(ratio))
    }

    /// The response string submitted for the line's current placement.
    ///
    /// Infinite lines carry their border projections as the outer pair,
    /// pulled inside the image so the string stays non-negative.
    #[must_use]
    pub fn response_coordinates(&self, dims: Dimensions) -> String {
        let (start, end) = (self.start.centre, self.end.centre);
        if self.line_type.is_infinite() {
            let (w, h) = (dims.max_x(), dims.max_y());
            let [p0, p3] = self.infinite_projection(w, h).map(|p| Point::new(p.x.clamp(0.0, w), p.y.clamp(0.0, h)));
            format!("{p0} {start} {end} {p3}")
        } else {
            format!("{start} {end}")
        }
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        let (a, b) = (self.start.centre, self.end.centre);
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    /// Direction from start to end, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        let (a, b) = (self.start.centre, self.end.centre);
        (b.y - a.y).atan2(b.x - a.x)
    }
}

/// Clamp a zone centre so its circle stays inside the image.
///
/// Order matters when the image is smaller than the circle: x-low, x-high,
/// y-low, y-high.
fn clamp_centre(zone: &mut Zone, max_x: f64, max_y: f64) {
    let r = zone.radius;
    let c = &mut zone.centre;
    if c.x < r {
        c.x = r;
    }
    if c.x > max_x - r {
        c.x = max_x - r;
    }
    if c.y < r {
        c.y = r;
    }
    if c.y > max_y - r {
        c.y = max_y - r;
    }
}
