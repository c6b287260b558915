//! Input model: editor mode, modifier keys, and the gesture state machine.
//!
//! `InputState` is the active gesture between pointer-down and pointer-up. It
//! carries the last pointer position so each move applies an incremental
//! delta to exactly one line.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::line::Handle;
use crate::point::Point;

/// Who is using the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The question author positions and sizes the tolerance zones.
    Authoring,
    /// A student places lines; zones cannot be resized.
    #[default]
    Attempt,
}

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
}

/// A keyboard key, named as the browser reports it (e.g. `"ArrowLeft"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Unit direction for arrow keys, `None` for anything else.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

/// The line part that keyboard input acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub line_index: usize,
    /// `None` moves the whole line.
    pub handle: Option<Handle>,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging one endpoint.
    DraggingEndpoint { line_index: usize, handle: Handle, last: Point },
    /// Dragging a zone edge to change its radius (authoring only).
    ResizingZone { line_index: usize, handle: Handle, last: Point },
    /// Dragging the whole line by its body.
    DraggingLine { line_index: usize, last: Point },
}

impl InputState {
    /// The line the active gesture acts on.
    #[must_use]
    pub fn line_index(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::DraggingEndpoint { line_index, .. }
            | Self::ResizingZone { line_index, .. }
            | Self::DraggingLine { line_index, .. } => Some(line_index),
        }
    }
}
