//! Display model: a declarative description of how a line looks.
//!
//! This module never draws. It turns a [`Line`] into a [`DisplayModel`] of
//! plain shapes (stroke, arrowheads, zone circles, handles, labels) that the
//! host applies to whatever surface it renders on. It does not mutate any
//! line state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{ARROW_ANGLE, ARROW_SIZE, LABEL_OFFSET};
use crate::dimensions::Dimensions;
use crate::line::{Handle, Line};
use crate::point::Point;
use crate::question::LineType;
use crate::zone::Zone;

/// Where a label sits relative to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Start,
    Middle,
    End,
}

/// A text label anchored at a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub position: LabelPosition,
    pub anchor: Point,
    pub text: String,
}

/// A draggable endpoint handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleShape {
    pub handle: Handle,
    pub centre: Point,
}

/// Everything needed to draw one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub number: usize,
    /// Stroke endpoints. For infinite lines these are the border projections.
    pub stroke: [Point; 2],
    /// Filled triangles, each `[tip, left, right]`.
    pub arrowheads: Vec<[Point; 3]>,
    /// Tolerance circles, normalized.
    pub zones: [Zone; 2],
    pub handles: [HandleShape; 2],
    /// Non-empty labels only.
    pub labels: Vec<Label>,
}

/// Build the display model for a line on an image of the given size.
#[must_use]
pub fn render(line: &Line, dims: Dimensions) -> DisplayModel {
    let (a, b) = (line.start.centre, line.end.centre);
    let angle = line.angle();

    let stroke = if line.line_type.is_infinite() {
        line.infinite_projection(dims.max_x(), dims.max_y())
    } else {
        [a, b]
    };

    let arrowheads = match line.line_type {
        LineType::LineSingleArrow => vec![arrowhead(b, angle)],
        LineType::LineDoubleArrows => vec![arrowhead(b, angle), arrowhead(a, angle + std::f64::consts::PI)],
        LineType::LineSegment | LineType::LineInfinite => Vec::new(),
    };

    DisplayModel {
        number: line.number,
        stroke,
        arrowheads,
        zones: [line.start.normalized(), line.end.normalized()],
        handles: [HandleShape { handle: Handle::Start, centre: a }, HandleShape { handle: Handle::End, centre: b }],
        labels: labels(line, angle),
    }
}

/// Render every line.
#[must_use]
pub fn render_all(lines: &[Line], dims: Dimensions) -> Vec<DisplayModel> {
    lines.iter().map(|line| render(line, dims)).collect()
}

fn arrowhead(tip: Point, angle: f64) -> [Point; 3] {
    let left = Point::new(tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos(), tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin());
    let right = Point::new(tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos(), tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin());
    [tip, left, right]
}

/// Start and end labels sit just beyond their endpoints along the line;
/// the middle label sits above the midpoint, perpendicular to the line.
fn labels(line: &Line, angle: f64) -> Vec<Label> {
    let (cos, sin) = (angle.cos(), angle.sin());
    let (a, b) = (line.start.centre, line.end.centre);
    let mid = line.midpoint();

    [
        (LabelPosition::Start, a.offset(-cos * LABEL_OFFSET, -sin * LABEL_OFFSET), &line.label_start),
        (LabelPosition::Middle, mid.offset(sin * LABEL_OFFSET, -cos * LABEL_OFFSET), &line.label_middle),
        (LabelPosition::End, b.offset(cos * LABEL_OFFSET, sin * LABEL_OFFSET), &line.label_end),
    ]
    .into_iter()
    .filter(|(_, _, text)| !text.trim().is_empty())
    .map(|(position, anchor, text)| Label { position, anchor, text: text.clone() })
    .collect()
}
