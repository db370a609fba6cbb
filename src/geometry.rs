//! Geometry value types shared across the engine.
//!
//! A [`Region`] is always expressed in *some* coordinate space — source
//! document space or image-pixel space — and must be mapped (see
//! [`crate::mapper`]) before being compared against pixel offsets from the
//! other space.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in a single coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// Create a new region.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal center of the region.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center of the region.
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// A width/height pair, e.g. an image's natural pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0
    }
}

/// Per-axis factor converting source-document coordinates into the proof
/// image's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderScale {
    pub x: f32,
    pub y: f32,
}

impl RenderScale {
    /// Create a new render scale.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Identity scale (coordinates already in pixel space).
    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// Apply the scale to a region, mapping it into pixel space.
    pub fn apply(&self, region: Region) -> Region {
        Region {
            x: region.x * self.x,
            y: region.y * self.y,
            width: region.width * self.x,
            height: region.height * self.y,
        }
    }
}
