//! Shared numeric constants for the drawlines crate.

use std::f64::consts::PI;

// ── Rendering ───────────────────────────────────────────────────

/// Arrowhead length in image pixels.
pub const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
pub const ARROW_ANGLE: f64 = PI / 6.0;

/// Gap between an endpoint and its label anchor, in image pixels.
pub const LABEL_OFFSET: f64 = 20.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels for the zone edge (radius handle) and the line body.
pub const HANDLE_SLOP_PX: f64 = 6.0;

// ── Editing ─────────────────────────────────────────────────────

/// Pixels moved per arrow-key press.
pub const KEY_NUDGE_PX: f64 = 1.0;

/// Multiplier applied to the nudge while Shift is held.
pub const KEY_NUDGE_FAST_FACTOR: f64 = 10.0;

/// Radius given to the zones of a freshly created line.
pub const DEFAULT_ZONE_RADIUS: f64 = 10.0;

// ── Grading ─────────────────────────────────────────────────────

/// Default penalty per incorrect try.
pub const DEFAULT_PENALTY: f64 = 0.333_333_3;

