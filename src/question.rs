//! Question model: line types, grading methods, authored lines, and responses.
//!
//! This module defines the persisted shape of a draw-lines question
//! (`Question`, `QuestionLine`), the authoring form it is built from
//! (`QuestionForm`), and the per-attempt `Response` map.
//!
//! Data flows into this layer as JSON. `QuestionForm` tolerates partially
//! filled authoring forms: a line whose type is unknown or whose zones are
//! empty is skipped with a warning when the form is turned into a `Question`.
//! `QuestionForm::validate` reports the same problems to the author.

#[cfg(test)]
#[path = "question_test.rs"]
mod question_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::DEFAULT_PENALTY;
use crate::coords::is_zone_coordinates_valid;
use crate::dimensions::Dimensions;
use crate::error::ConfigurationError;
use crate::zone::Zone;

/// How a line is drawn. Only `LineInfinite` affects grading, through the
/// number of coordinate pairs in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// Plain segment between the two endpoints.
    LineSegment,
    /// Segment with an arrowhead at the end point.
    LineSingleArrow,
    /// Segment with arrowheads at both endpoints.
    LineDoubleArrows,
    /// Line extended through both endpoints to the image border.
    LineInfinite,
}

impl LineType {
    pub const ALL: [LineType; 4] =
        [Self::LineSegment, Self::LineSingleArrow, Self::LineDoubleArrows, Self::LineInfinite];

    /// Wire value persisted by the host.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LineSegment => "linesegment",
            Self::LineSingleArrow => "linesinglearrow",
            Self::LineDoubleArrows => "linedoublearrows",
            Self::LineInfinite => "lineinfinite",
        }
    }

    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::LineInfinite)
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownLineType(s.to_string()))
    }
}

/// Grading method configured on the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeMethod {
    /// Each of the 2N endpoints scores independently.
    #[default]
    Partial,
    /// A line scores only when both endpoints are right.
    AllNone,
}

impl GradeMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::AllNone => "allnone",
        }
    }
}

impl FromStr for GradeMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partial" => Ok(Self::Partial),
            "allnone" => Ok(Self::AllNone),
            other => Err(ConfigurationError::UnknownGradeMethod(other.to_string())),
        }
    }
}

/// An authored line, read-only during attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionLine {
    /// 1-based position among the question's lines.
    pub number: usize,
    #[serde(rename = "type")]
    pub line_type: LineType,
    #[serde(rename = "labelstart", default)]
    pub label_start: String,
    #[serde(rename = "labelmiddle", default)]
    pub label_middle: String,
    #[serde(rename = "labelend", default)]
    pub label_end: String,
    #[serde(rename = "zonestart")]
    pub zone_start: Zone,
    #[serde(rename = "zoneend")]
    pub zone_end: Zone,
}

impl QuestionLine {
    /// Response key for this line (`c0` for line 1).
    #[must_use]
    pub fn field_key(&self) -> String {
        field_key(self.number)
    }
}

/// Response key for the line with the given 1-based number.
#[must_use]
pub fn field_key(number: usize) -> String {
    format!("c{}", number.saturating_sub(1))
}

/// Combined feedback hint shown between tries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    #[serde(default)]
    pub text: String,
    /// Tell the student how many endpoints are placed correctly.
    #[serde(rename = "shownumcorrect", default)]
    pub show_num_correct: bool,
    /// Remove incorrectly placed lines before the next try.
    #[serde(rename = "clearwrong", default)]
    pub clear_wrong: bool,
}

/// A fully configured question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionForm")]
pub struct Question {
    #[serde(rename = "grademethod")]
    pub grade_method: GradeMethod,
    pub penalty: f64,
    pub lines: Vec<QuestionLine>,
    pub hints: Vec<Hint>,
}

impl Question {
    /// Hint to show after the given (1-based) try, if one is configured.
    #[must_use]
    pub fn hint_for_try(&self, try_number: usize) -> Option<&Hint> {
        try_number.checked_sub(1).and_then(|i| self.hints.get(i))
    }

    /// Total tries in interactive mode: one plus one per hint.
    #[must_use]
    pub fn total_tries(&self) -> usize {
        self.hints.len() + 1
    }
}

/// One line as submitted by the authoring form. Every field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineForm {
    #[serde(default)]
    pub number: Option<usize>,
    #[serde(rename = "type", default)]
    pub line_type: String,
    #[serde(rename = "labelstart", default)]
    pub label_start: String,
    #[serde(rename = "labelmiddle", default)]
    pub label_middle: String,
    #[serde(rename = "labelend", default)]
    pub label_end: String,
    #[serde(rename = "zonestart", default)]
    pub zone_start: String,
    #[serde(rename = "zoneend", default)]
    pub zone_end: String,
}

impl LineForm {
    fn is_blank(&self) -> bool {
        self.line_type.trim().is_empty() && self.zone_start.trim().is_empty() && self.zone_end.trim().is_empty()
    }

    fn number_at(&self, index: usize) -> usize {
        self.number.unwrap_or(index + 1)
    }

    /// Build the authored line, or explain why this form row is not one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for a missing or unknown type, missing
    /// zones, or zones that fail to parse.
    pub fn to_question_line(&self, index: usize) -> Result<QuestionLine, ConfigurationError> {
        let number = self.number_at(index);
        if self.line_type.trim().is_empty() || self.zone_start.trim().is_empty() || self.zone_end.trim().is_empty() {
            return Err(ConfigurationError::Unconfigured { number });
        }
        let line_type: LineType = self.line_type.trim().parse()?;
        let zone_start = parse_zone_field(number, &self.zone_start)?;
        let zone_end = parse_zone_field(number, &self.zone_end)?;
        Ok(QuestionLine {
            number,
            line_type,
            label_start: self.label_start.clone(),
            label_middle: self.label_middle.clone(),
            label_end: self.label_end.clone(),
            zone_start,
            zone_end,
        })
    }
}

fn parse_zone_field(number: usize, raw: &str) -> Result<Zone, ConfigurationError> {
    Zone::parse(raw.trim())
        .map(Zone::normalized)
        .map_err(|source| ConfigurationError::BadZone { number, source })
}

/// The authoring form a [`Question`] is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionForm {
    #[serde(rename = "grademethod", default)]
    pub grade_method: Option<String>,
    #[serde(default)]
    pub penalty: Option<f64>,
    #[serde(default)]
    pub lines: Vec<LineForm>,
    #[serde(default)]
    pub hints: Vec<Hint>,
}

/// A problem found while validating the authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Form field the issue belongs to, e.g. `zonestart[0]`.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl QuestionForm {
    /// Check the form the way the authoring page does before saving.
    ///
    /// Blank rows are ignored. When `dims` is given, each zone must also lie
    /// entirely inside the background image.
    #[must_use]
    pub fn validate(&self, dims: Option<Dimensions>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Some(method) = &self.grade_method {
            if method.parse::<GradeMethod>().is_err() {
                issues.push(ValidationIssue::new("grademethod", format!("Unknown grading method '{method}'.")));
            }
        }
        if let Some(p) = self.penalty {
            if !(0.0..=1.0).contains(&p) {
                issues.push(ValidationIssue::new("penalty", "Penalty must be between 0 and 1."));
            }
        }

        let mut configured = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if line.is_blank() {
                continue;
            }
            configured += 1;

            let line_type = line.line_type.trim();
            if line_type.is_empty() {
                issues.push(ValidationIssue::new(format!("type[{i}]"), "Choose a line type."));
            } else if line_type.parse::<LineType>().is_err() {
                issues.push(ValidationIssue::new(format!("type[{i}]"), format!("Unknown line type '{line_type}'.")));
            }

            for (name, raw) in [("zonestart", &line.zone_start), ("zoneend", &line.zone_end)] {
                let field = format!("{name}[{i}]");
                let raw = raw.trim();
                if raw.is_empty() {
                    issues.push(ValidationIssue::new(field, "Zone coordinates are required."));
                } else if !is_zone_coordinates_valid(raw) {
                    issues.push(ValidationIssue::new(field, "Zone coordinates must be in the form x,y;r."));
                } else if let Some(dims) = dims {
                    match Zone::parse(raw) {
                        Ok(zone) if !zone.fits_within(dims) => {
                            issues.push(ValidationIssue::new(field, "The zone must lie inside the background image."));
                        }
                        Ok(_) => {}
                        Err(e) => issues.push(ValidationIssue::new(field, e.to_string())),
                    }
                }
            }
        }

        if configured == 0 {
            issues.push(ValidationIssue::new("lines", "You must define at least one line."));
        }
        issues
    }
}

impl TryFrom<QuestionForm> for Question {
    type Error = ConfigurationError;

    fn try_from(form: QuestionForm) -> Result<Self, Self::Error> {
        let grade_method = match form.grade_method.as_deref() {
            None | Some("") => GradeMethod::default(),
            Some(raw) => raw.parse()?,
        };

        let mut lines = Vec::new();
        for (i, row) in form.lines.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            match row.to_question_line(i) {
                Ok(line) => lines.push(line),
                Err(e) => warn!(line = row.number_at(i), error = %e, "skipping unconfigured line"),
            }
        }

        Ok(Self {
            grade_method,
            penalty: form.penalty.unwrap_or(DEFAULT_PENALTY),
            lines,
            hints: form.hints,
        })
    }
}

/// Submitted coordinates keyed by field (`c0`, `c1`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(BTreeMap<String, String>);

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The trimmed value for `key`, or `None` when absent or blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// The value for the line with the given 1-based number.
    #[must_use]
    pub fn for_line(&self, number: usize) -> Option<&str> {
        self.get(&field_key(number))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Response {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
