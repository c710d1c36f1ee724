//! Geographic bounding box of a tile.

use serde::{Deserialize, Serialize};

/// Axis-aligned geographic bounding box `[min_x, min_y, max_x, max_y]`.
///
/// Coordinates are in whatever CRS the tile pyramid uses; the grid math
/// only assumes a linear mapping from cell indices to the extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileBBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl TileBBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Create from a `[min_x, min_y, max_x, max_y]` array.
    pub fn from_array(coords: [f64; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    /// Extent in the X direction.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent in the Y direction.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if two bboxes intersect.
    pub fn intersects(&self, other: &TileBBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}
