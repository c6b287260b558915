#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_SLOP_PX;
use crate::line::{Handle, Line};
use crate::point::Point;

/// Which part of a line was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside a zone: drags that endpoint.
    Endpoint(Handle),
    /// On a zone's circumference: resizes that zone.
    ZoneEdge(Handle),
    /// Near the segment between the endpoints: drags the whole line.
    Body,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index into the editor's line list.
    pub line_index: usize,
    pub part: HitPart,
}

/// Find what is under `pt`. Later lines are drawn on top and win.
#[must_use]
pub fn hit_test(pt: Point, lines: &[Line]) -> Option<Hit> {
    lines
        .iter()
        .enumerate()
        .rev()
        .find_map(|(line_index, line)| hit_line(pt, line).map(|part| Hit { line_index, part }))
}

fn hit_line(pt: Point, line: &Line) -> Option<HitPart> {
    for handle in [Handle::Start, Handle::End] {
        let zone = line.zone(handle);
        let r = zone.radius.abs();
        let d = pt.distance_to(zone.centre);
        if (d - r).abs() <= HANDLE_SLOP_PX && d > r / 2.0 {
            return Some(HitPart::ZoneEdge(handle));
        }
        if d <= r.max(HANDLE_SLOP_PX) {
            return Some(HitPart::Endpoint(handle));
        }
    }
    if distance_to_segment(pt, line.start.centre, line.end.centre) <= HANDLE_SLOP_PX {
        return Some(HitPart::Body);
    }
    None
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let (vx, vy) = (b.x - a.x, b.y - a.y);
    let len_sq = vx * vx + vy * vy;
    if len_sq < f64::EPSILON {
        return pt.distance_to(a);
    }
    let t = (((pt.x - a.x) * vx + (pt.y - a.y) * vy) / len_sq).clamp(0.0, 1.0);
    pt.distance_to(Point::new(a.x + t * vx, a.y + t * vy))
}
