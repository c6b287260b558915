//! Grading engine: endpoint containment, per-line correctness, scoring, and
//! the penalized final grade across tries.
//!
//! DESIGN
//! ======
//! Everything here is a pure function of the authored lines and a response.
//! Lines are independent and may be graded in any order. Only
//! [`compute_final_grade`] depends on order: it walks attempts in submission
//! order because the penalty accumulates and a fully right attempt ends it.
//!
//! ERROR HANDLING
//! ==============
//! A malformed coordinate string on one line scores that line as wrong and
//! logs a warning; the remaining lines are still graded. Completeness checks
//! are stricter: one malformed field makes the whole response incomplete.

#[cfg(test)]
#[path = "grading_test.rs"]
mod grading_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coords::{is_response_valid_for, parse_line_response};
use crate::error::{FormatError, IncompleteResponse};
use crate::point::Point;
use crate::question::{GradeMethod, Question, QuestionLine, Response, field_key};
use crate::zone::Zone;

// =============================================================================
// TYPES
// =============================================================================

/// Outcome of a graded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Right,
    Wrong,
    Partial,
}

impl State {
    /// Classify a fraction: exactly 1 is right, exactly 0 is wrong.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction == 1.0 {
            Self::Right
        } else if fraction == 0.0 {
            Self::Wrong
        } else {
            Self::Partial
        }
    }
}

/// Per-line result consumed by results summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineClassification {
    pub number: usize,
    /// Whether the line had a value in the response.
    pub placed: bool,
    pub start_ok: bool,
    pub end_ok: bool,
    /// Credit this line earns under the grading method, in `[0, 1]`.
    pub fraction: f64,
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// Whether `point` lies inside the zone's axis-aligned bounding box.
///
/// This is a square test, not a distance test: a point at the corner of the
/// box, `√2·r` from the centre, still counts as inside. Bounds are inclusive.
#[must_use]
pub fn is_point_in_zone(point: Point, zone: &Zone) -> bool {
    let (c, r) = (zone.centre, zone.radius);
    c.x - r <= point.x && point.x <= c.x + r && c.y - r <= point.y && point.y <= c.y + r
}

/// Check a line's submitted coordinates against its start and end zones.
///
/// # Errors
///
/// Returns [`FormatError`] if `coords` is not a usable response string.
pub fn is_line_correctly_placed(coords: &str, line: &QuestionLine) -> Result<(bool, bool), FormatError> {
    let (start, end) = parse_line_response(line.line_type, coords)?;
    Ok((is_point_in_zone(start, &line.zone_start), is_point_in_zone(end, &line.zone_end)))
}

/// Correctness of one line, or `None` when the response leaves it empty.
fn line_result(line: &QuestionLine, response: &Response) -> Option<(bool, bool)> {
    let coords = response.for_line(line.number)?;
    match is_line_correctly_placed(coords, line) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(line = line.number, error = %e, "malformed line response; scoring as wrong");
            Some((false, false))
        }
    }
}

// =============================================================================
// SCORING
// =============================================================================

/// Count correct endpoints: `total` is twice the number of lines.
#[must_use]
pub fn grade_partial(lines: &[QuestionLine], response: &Response) -> (usize, usize) {
    let num_right = lines
        .iter()
        .filter_map(|line| line_result(line, response))
        .map(|(start_ok, end_ok)| usize::from(start_ok) + usize::from(end_ok))
        .sum();
    (num_right, 2 * lines.len())
}

/// Count lines with both endpoints correct: `total` is the number of lines.
#[must_use]
pub fn grade_all_or_none(lines: &[QuestionLine], response: &Response) -> (usize, usize) {
    let num_right = lines
        .iter()
        .filter_map(|line| line_result(line, response))
        .filter(|&(start_ok, end_ok)| start_ok && end_ok)
        .count();
    (num_right, lines.len())
}

/// `(num_right, total)` under the given method.
#[must_use]
pub fn grade_parts(lines: &[QuestionLine], response: &Response, method: GradeMethod) -> (usize, usize) {
    match method {
        GradeMethod::Partial => grade_partial(lines, response),
        GradeMethod::AllNone => grade_all_or_none(lines, response),
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { num as f64 / total as f64 }
}

/// Grade one response: its fraction and the resulting state.
#[must_use]
pub fn grade_response(lines: &[QuestionLine], response: &Response, method: GradeMethod) -> (f64, State) {
    let (num_right, total) = grade_parts(lines, response, method);
    let fraction = ratio(num_right, total);
    debug!(num_right, total, fraction, method = method.as_str(), "graded response");
    (fraction, State::from_fraction(fraction))
}

/// Final grade over a sequence of tries, in submission order.
///
/// Attempts with nothing placed are skipped. With a single try the first
/// graded attempt's fraction is returned as is. Otherwise each attempt earns
/// its fraction minus the penalty accumulated so far (never below zero); a
/// fully right attempt returns immediately, a wrong one adds a full
/// `penalty`, a partial one adds a share proportional to what was still
/// wrong, capped at `penalty`. If no attempt is fully right, the grade of the
/// last graded attempt is returned, or 0 if none was graded.
#[must_use]
pub fn compute_final_grade(
    lines: &[QuestionLine],
    method: GradeMethod,
    responses: &[Response],
    penalty: f64,
    total_tries: usize,
) -> f64 {
    let mut accumulated = 0.0;
    let mut grade = 0.0;

    for (attempt, response) in responses.iter().enumerate() {
        if !is_gradable_response(lines, response) {
            debug!(attempt, "skipping empty attempt");
            continue;
        }
        let (num_right, total) = grade_parts(lines, response, method);
        let fraction = ratio(num_right, total);
        if total_tries == 1 {
            return fraction;
        }

        grade = (fraction - accumulated).max(0.0);
        match State::from_fraction(fraction) {
            State::Right => return grade,
            State::Wrong => accumulated += penalty,
            State::Partial => accumulated += penalty.min(ratio(total - num_right, total) * penalty),
        }
        debug!(attempt, fraction, grade, accumulated, "graded try");
    }
    grade
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

/// Response keys the question expects, `c0` through `c{N-1}`.
#[must_use]
pub fn expected_data(lines: &[QuestionLine]) -> Vec<String> {
    lines.iter().map(QuestionLine::field_key).collect()
}

fn incomplete_fields(lines: &[QuestionLine], response: &Response) -> Vec<String> {
    lines
        .iter()
        .filter(|line| {
            response
                .for_line(line.number)
                .is_none_or(|v| !is_response_valid_for(line.line_type, v))
        })
        .map(QuestionLine::field_key)
        .collect()
}

/// Every line is placed with a well-formed value.
#[must_use]
pub fn is_complete_response(lines: &[QuestionLine], response: &Response) -> bool {
    incomplete_fields(lines, response).is_empty()
}

/// At least one line is placed.
#[must_use]
pub fn is_gradable_response(lines: &[QuestionLine], response: &Response) -> bool {
    lines.iter().any(|line| response.for_line(line.number).is_some())
}

/// The message shown when a response cannot be submitted yet.
#[must_use]
pub fn validation_error(lines: &[QuestionLine], response: &Response) -> Option<IncompleteResponse> {
    let missing = incomplete_fields(lines, response);
    if missing.is_empty() { None } else { Some(IncompleteResponse { missing }) }
}

/// Two responses place every line identically. Missing and blank are equal.
#[must_use]
pub fn is_same_response(lines: &[QuestionLine], a: &Response, b: &Response) -> bool {
    lines.iter().all(|line| a.for_line(line.number) == b.for_line(line.number))
}

/// Human-readable summary, e.g. `"Line 1: 10,10 200,200; Line 2: ..."`.
///
/// Shows the graded pair of each placed line. Returns `None` when nothing is
/// placed.
#[must_use]
pub fn summarise_response(lines: &[QuestionLine], response: &Response) -> Option<String> {
    let parts: Vec<String> = lines
        .iter()
        .filter_map(|line| {
            let value = response.for_line(line.number)?;
            let shown = match parse_line_response(line.line_type, value) {
                Ok((start, end)) => format!("{start} {end}"),
                Err(_) => value.to_string(),
            };
            Some(format!("Line {}: {shown}", line.number))
        })
        .collect();
    if parts.is_empty() { None } else { Some(parts.join("; ")) }
}

/// A response that places every endpoint at its zone centre.
#[must_use]
pub fn correct_response(lines: &[QuestionLine]) -> Response {
    lines
        .iter()
        .map(|line| (line.field_key(), format!("{} {}", line.zone_start.centre, line.zone_end.centre)))
        .collect()
}

/// Correct endpoints out of all endpoints, for "show number correct" hints.
#[must_use]
pub fn num_parts_right(lines: &[QuestionLine], response: &Response) -> (usize, usize) {
    grade_partial(lines, response)
}

/// Copy of `response` without the lines that are not fully correct.
#[must_use]
pub fn clear_wrong_from_response(lines: &[QuestionLine], response: &Response) -> Response {
    let mut cleared = response.clone();
    for line in lines {
        if !matches!(line_result(line, response), Some((true, true))) {
            cleared.remove(&field_key(line.number));
        }
    }
    cleared
}

/// Per-line breakdown of a response.
#[must_use]
pub fn classify_response(lines: &[QuestionLine], response: &Response, method: GradeMethod) -> Vec<LineClassification> {
    lines
        .iter()
        .map(|line| {
            let result = line_result(line, response);
            let (start_ok, end_ok) = result.unwrap_or((false, false));
            let fraction = match method {
                GradeMethod::Partial => ratio(usize::from(start_ok) + usize::from(end_ok), 2),
                GradeMethod::AllNone => ratio(usize::from(start_ok && end_ok), 1),
            };
            LineClassification { number: line.number, placed: result.is_some(), start_ok, end_ok, fraction }
        })
        .collect()
}

// =============================================================================
// QUESTION CONVENIENCE
// =============================================================================

impl Question {
    /// Grade a response with this question's method.
    #[must_use]
    pub fn grade_response(&self, response: &Response) -> (f64, State) {
        grade_response(&self.lines, response, self.grade_method)
    }

    /// Final grade across tries with this question's method and penalty.
    #[must_use]
    pub fn compute_final_grade(&self, responses: &[Response], total_tries: usize) -> f64 {
        compute_final_grade(&self.lines, self.grade_method, responses, self.penalty, total_tries)
    }

    #[must_use]
    pub fn is_complete_response(&self, response: &Response) -> bool {
        is_complete_response(&self.lines, response)
    }

    #[must_use]
    pub fn correct_response(&self) -> Response {
        correct_response(&self.lines)
    }
}
