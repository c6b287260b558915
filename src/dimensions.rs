//! Background image dimensions supplied by the host.

use serde::{Deserialize, Serialize};

/// Width and height of the background image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn max_x(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn max_y(self) -> f64 {
        f64::from(self.height)
    }
}

/// Source of the current image dimensions.
///
/// The host implements this for whatever owns the loaded background image.
pub trait DimensionsProvider {
    fn dimensions(&self) -> Dimensions;
}

impl DimensionsProvider for Dimensions {
    fn dimensions(&self) -> Dimensions {
        *self
    }
}
