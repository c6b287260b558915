//! Geometry, validation, and grading for drag-the-line image questions.
//!
//! An author places N lines on a background image; each line has a tolerance
//! zone around its start and end point. A student drags lines onto the image
//! and each endpoint is graded by whether it falls inside its zone. This crate
//! owns the line model, the coordinate grammar, the grading engine, and a
//! host-agnostic editor that turns pointer and keyboard input into updates.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`point`] | 2D point, parsing and formatting of `"x,y"` |
//! | [`zone`] | Tolerance circle, `"x,y;r"` with display scaling |
//! | [`line`] | Line geometry, clamped moves, infinite projection |
//! | [`coords`] | Regex validation of zone and response strings |
//! | [`question`] | Line types, authored lines, authoring form, responses |
//! | [`grading`] | Partial / all-or-nothing grading and multi-try penalty |
//! | [`render`] | Pure display model for a line |
//! | [`hit`] | Hit-testing endpoints, zone edges, and line bodies |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`editor`] | Testable editor controller ([`editor::EditorCore`]) |
//! | [`config`] | Grading defaults from the environment |
//! | [`dimensions`] | Image size and its provider trait |
//! | [`error`] | Shared error types |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod coords;
pub mod dimensions;
pub mod editor;
pub mod error;
pub mod grading;
pub mod hit;
pub mod input;
pub mod line;
pub mod point;
pub mod question;
pub mod render;
pub mod zone;

pub use dimensions::Dimensions;
pub use error::{ConfigurationError, FormatError, IncompleteResponse};
pub use grading::State;
pub use line::Line;
pub use point::Point;
pub use question::{GradeMethod, LineType, Question, QuestionForm, Response};
pub use zone::Zone;
