//! Error types shared by the geometry, parsing, and grading layers.
//!
//! ERROR HANDLING
//! ==============
//! Parsing errors propagate to callers. The grading engine catches a
//! [`FormatError`] for a single line and scores that line as wrong instead of
//! aborting the whole response. [`ConfigurationError`] marks a line that was
//! never fully configured; such lines are skipped when a question is loaded.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// A coordinate, zone, or response string did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The string did not split into the expected number of parts.
    #[error("expected {expected} `{separator}`-separated parts in {input:?}, found {found}")]
    PartCount {
        input: String,
        separator: char,
        expected: usize,
        found: usize,
    },
    /// A field could not be parsed as a number.
    #[error("non-numeric field {field:?} in {input:?}")]
    NotNumeric { input: String, field: String },
    /// A response held a number of coordinate pairs the line type cannot use.
    #[error("line response {input:?} has {found} coordinate pairs")]
    PointCount { input: String, found: usize },
}

impl FormatError {
    pub(crate) fn part_count(input: &str, separator: char, expected: usize, found: usize) -> Self {
        Self::PartCount { input: input.to_string(), separator, expected, found }
    }

    pub(crate) fn not_numeric(input: &str, field: &str) -> Self {
        Self::NotNumeric { input: input.to_string(), field: field.to_string() }
    }
}

/// The response is missing fields required before it can be graded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please place all lines on the image.")]
pub struct IncompleteResponse {
    /// Response keys (`c0`, `c1`, ...) that were empty or malformed.
    pub missing: Vec<String>,
}

/// A line definition that cannot take part in a question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The line type string is not one of the known wire values.
    #[error("unknown line type: {0}")]
    UnknownLineType(String),
    /// The grading method string is not one of the known wire values.
    #[error("unknown grade method: {0}")]
    UnknownGradeMethod(String),
    /// An environment setting holds a value that cannot be used.
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: String, value: String },
    /// Line has no start or end zone.
    #[error("line {number} is not configured")]
    Unconfigured { number: usize },
    /// A zone string on an otherwise configured line is malformed.
    #[error("line {number}: {source}")]
    BadZone {
        number: usize,
        #[source]
        source: FormatError,
    },
}
