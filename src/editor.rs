//! Interactive editor: turns pointer and keyboard events into line updates.
//!
//! `EditorCore` is an explicit controller. The host constructs it with the
//! image dimensions and the mode (authoring or attempt), forwards input
//! events, and applies the returned [`Action`]s: persisting zone strings in
//! authoring mode, storing response fields in attempt mode, and redrawing
//! from [`EditorCore::render`]. No state lives outside the controller.
//!
//! Each event updates at most one line, and updates are applied in the order
//! events arrive.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use tracing::{debug, warn};

use crate::consts::{DEFAULT_ZONE_RADIUS, KEY_NUDGE_FAST_FACTOR, KEY_NUDGE_PX};
use crate::coords::parse_line_response;
use crate::dimensions::{Dimensions, DimensionsProvider};
use crate::hit::{HitPart, hit_test};
use crate::input::{Focus, InputState, Key, Mode, Modifiers};
use crate::line::{Handle, Line};
use crate::point::Point;
use crate::question::{LineType, Question, Response, field_key};
use crate::render::{DisplayModel, render_all};
use crate::zone::Zone;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Authoring: the zones of a line changed. Strings are unscaled `"x,y;r"`.
    LineUpdated { number: usize, zone_start: String, zone_end: String },
    /// Attempt: the response value of a line changed.
    ResponseChanged { field: String, value: String },
    RenderNeeded,
}

/// Editor state for one question on one image.
pub struct EditorCore {
    pub lines: Vec<Line>,
    pub dims: Dimensions,
    pub mode: Mode,
    /// Displayed size divided by the image's natural size.
    pub ratio: f64,
    pub input: InputState,
    pub focus: Option<Focus>,
}

impl EditorCore {
    #[must_use]
    pub fn new(provider: &impl DimensionsProvider, mode: Mode, ratio: f64) -> Self {
        Self {
            lines: Vec::new(),
            dims: provider.dimensions(),
            mode,
            ratio: if ratio > 0.0 { ratio } else { 1.0 },
            input: InputState::Idle,
            focus: None,
        }
    }

    /// Editor for an existing question.
    ///
    /// Authoring shows the stored zones. An attempt starts every line at a
    /// neutral position so the zones are never revealed.
    #[must_use]
    pub fn for_question(question: &Question, provider: &impl DimensionsProvider, mode: Mode, ratio: f64) -> Self {
        let mut core = Self::new(provider, mode, ratio);
        let count = question.lines.len();
        core.lines = question
            .lines
            .iter()
            .enumerate()
            .map(|(i, ql)| match mode {
                Mode::Authoring => Line::from_question_line(ql, core.ratio),
                Mode::Attempt => {
                    let (start, end) = initial_placement(i, count, core.dims);
                    Line::new(ql.number, ql.line_type, start, end).with_labels(
                        &ql.label_start,
                        &ql.label_middle,
                        &ql.label_end,
                    )
                }
            })
            .collect();
        core
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Restore line positions from a saved response.
    ///
    /// Lines with a missing or malformed value keep their current position.
    pub fn load_response(&mut self, response: &Response) {
        let (mode, ratio, max_x, max_y) = (self.mode, self.ratio, self.dims.max_x(), self.dims.max_y());
        for line in &mut self.lines {
            let Some(value) = response.for_line(line.number) else {
                continue;
            };
            match parse_line_response(line.line_type, value) {
                Ok((start, end)) => {
                    line.start.centre = start.scaled(ratio);
                    line.end.centre = end.scaled(ratio);
                    translate(line, mode, None, (0.0, 0.0), max_x, max_y);
                }
                Err(e) => warn!(line = line.number, error = %e, "ignoring saved response"),
            }
        }
    }

    /// Adopt new image dimensions and pull every line back inside them.
    pub fn set_dimensions(&mut self, provider: &impl DimensionsProvider) {
        self.dims = provider.dimensions();
        let (mode, max_x, max_y) = (self.mode, self.dims.max_x(), self.dims.max_y());
        for line in &mut self.lines {
            translate(line, mode, None, (0.0, 0.0), max_x, max_y);
        }
    }

    /// Authoring: append a new line with default zones.
    pub fn add_line(&mut self, line_type: LineType) -> Vec<Action> {
        let number = self.lines.len() + 1;
        let (start, end) = initial_placement(self.lines.len(), number, self.dims);
        self.lines.push(Line::new(number, line_type, start, end));
        let mut actions = self.commit(number - 1);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Authoring: change how a line is drawn.
    pub fn set_line_type(&mut self, line_index: usize, line_type: LineType) -> Vec<Action> {
        match self.lines.get_mut(line_index) {
            Some(line) => {
                line.line_type = line_type;
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let Some(hit) = hit_test(pt, &self.lines) else {
            self.input = InputState::Idle;
            self.focus = None;
            return Vec::new();
        };
        let line_index = hit.line_index;
        self.input = match (hit.part, self.mode) {
            (HitPart::ZoneEdge(handle), Mode::Authoring) => InputState::ResizingZone { line_index, handle, last: pt },
            (HitPart::Endpoint(handle) | HitPart::ZoneEdge(handle), _) => {
                InputState::DraggingEndpoint { line_index, handle, last: pt }
            }
            (HitPart::Body, _) => InputState::DraggingLine { line_index, last: pt },
        };
        self.focus = Some(Focus {
            line_index,
            handle: match hit.part {
                HitPart::Endpoint(h) | HitPart::ZoneEdge(h) => Some(h),
                HitPart::Body => None,
            },
        });
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let (mode, max_x, max_y) = (self.mode, self.dims.max_x(), self.dims.max_y());
        let (line_index, last) = match self.input {
            InputState::Idle => return Vec::new(),
            InputState::DraggingEndpoint { line_index, last, .. }
            | InputState::ResizingZone { line_index, last, .. }
            | InputState::DraggingLine { line_index, last } => (line_index, last),
        };
        let Some(line) = self.lines.get_mut(line_index) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        let (dx, dy) = (pt.x - last.x, pt.y - last.y);

        match &mut self.input {
            InputState::DraggingEndpoint { handle, last, .. } => {
                translate(line, mode, Some(*handle), (dx, dy), max_x, max_y);
                *last = pt;
            }
            InputState::ResizingZone { handle, last, .. } => {
                line.edit(*handle, dx, dy, max_x, max_y);
                *last = pt;
            }
            InputState::DraggingLine { last, .. } => {
                translate(line, mode, None, (dx, dy), max_x, max_y);
                *last = pt;
            }
            InputState::Idle => {}
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = self.on_pointer_move(pt);
        let finished = std::mem::take(&mut self.input);
        if let Some(line_index) = finished.line_index() {
            actions.extend(self.commit(line_index));
        }
        actions
    }

    /// Arrow keys nudge the focused endpoint or line; Shift moves faster.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.0 == "Escape" {
            self.focus = None;
            return vec![Action::RenderNeeded];
        }
        let (Some(focus), Some((ux, uy))) = (self.focus, key.arrow_direction()) else {
            return Vec::new();
        };
        let step = if modifiers.shift { KEY_NUDGE_PX * KEY_NUDGE_FAST_FACTOR } else { KEY_NUDGE_PX };
        let (mode, max_x, max_y) = (self.mode, self.dims.max_x(), self.dims.max_y());
        let Some(line) = self.lines.get_mut(focus.line_index) else {
            self.focus = None;
            return Vec::new();
        };
        translate(line, mode, focus.handle, (ux * step, uy * step), max_x, max_y);
        let mut actions = self.commit(focus.line_index);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Outputs ---

    /// The response for the current placement of every line.
    #[must_use]
    pub fn response(&self) -> Response {
        self.lines.iter().map(|line| (field_key(line.number), self.response_value(line))).collect()
    }

    #[must_use]
    pub fn render(&self) -> Vec<DisplayModel> {
        render_all(&self.lines, self.dims)
    }

    fn commit(&mut self, line_index: usize) -> Vec<Action> {
        let mode = self.mode;
        let ratio = self.ratio;
        let Some(line) = self.lines.get_mut(line_index) else {
            return Vec::new();
        };
        match mode {
            Mode::Authoring => {
                line.normalize_shape();
                let (zone_start, zone_end) = line.zone_strings(ratio);
                debug!(line = line.number, %zone_start, %zone_end, "zones updated");
                vec![Action::LineUpdated { number: line.number, zone_start, zone_end }]
            }
            Mode::Attempt => {
                let line = line.clone();
                let value = self.response_value(&line);
                debug!(line = line.number, %value, "response updated");
                vec![Action::ResponseChanged { field: field_key(line.number), value }]
            }
        }
    }

    /// Response string in natural image coordinates.
    fn response_value(&self, line: &Line) -> String {
        let inv = 1.0 / self.ratio;
        let mut natural = line.clone();
        natural.start.centre = line.start.centre.scaled(inv);
        natural.end.centre = line.end.centre.scaled(inv);
        natural.response_coordinates(natural_dims(self.dims, inv))
    }
}

/// Move one endpoint (`Some`) or the whole line (`None`).
///
/// Authoring keeps each zone circle inside the image. During an attempt only
/// the placed point is kept inside, so zones touching an edge stay reachable.
fn translate(line: &mut Line, mode: Mode, handle: Option<Handle>, (dx, dy): (f64, f64), max_x: f64, max_y: f64) {
    match (mode, handle) {
        (Mode::Authoring, Some(handle)) => line.move_handle(handle, dx, dy, max_x, max_y),
        (Mode::Authoring, None) => line.move_entire_line(dx, dy, max_x, max_y),
        (Mode::Attempt, Some(handle)) => line.move_point(handle, dx, dy, max_x, max_y),
        (Mode::Attempt, None) => line.move_entire_line_points(dx, dy, max_x, max_y),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn natural_dims(dims: Dimensions, inv: f64) -> Dimensions {
    Dimensions::new((dims.max_x() * inv).round() as u32, (dims.max_y() * inv).round() as u32)
}

/// Neutral starting zones for line `index` of `count`: stacked rows across
/// the left part of the image.
#[allow(clippy::cast_precision_loss)]
fn initial_placement(index: usize, count: usize, dims: Dimensions) -> (Zone, Zone) {
    let (w, h) = (dims.max_x(), dims.max_y());
    let y = h * (index + 1) as f64 / (count + 1) as f64;
    let r = DEFAULT_ZONE_RADIUS.min(w / 4.0).min(h / 4.0).max(0.0);
    let mut line = Line::new(
        0,
        LineType::LineSegment,
        Zone::new(Point::new(w * 0.1, y), r),
        Zone::new(Point::new(w * 0.4, y), r),
    );
    line.move_entire_line(0.0, 0.0, w, h);
    (line.start, line.end)
}
