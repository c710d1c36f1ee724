//! Cell-grid geometry.
//!
//! A tile's extent is partitioned into a fixed row-major grid of
//! `num_cells × num_cells` cells. These functions map a linear cell index
//! to a geographic Point or rectangular Polygon within the tile bbox.
//!
//! All functions are pure and never fail: a cell index outside
//! `num_cells²` simply yields geometry outside the bbox. Callers that need
//! range validation do it themselves (the aggregator does).

use geo_types::{polygon, Point, Polygon};

use crate::bbox::TileBBox;

/// Column/row position of a cell in the grid, plus the bbox extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCoords {
    pub col: u32,
    pub row: u32,
    pub width: f64,
    pub height: f64,
}

impl CellCoords {
    /// Resolve a linear row-major cell index against a grid of side
    /// `num_cells` over `bbox`.
    pub fn resolve(bbox: &TileBBox, cell: u32, num_cells: u32) -> Self {
        Self {
            col: cell % num_cells,
            row: cell / num_cells,
            width: bbox.width(),
            height: bbox.height(),
        }
    }
}

/// Point geometry of a cell: its lower-left corner.
///
/// The lower-left corner (not the centroid) is the convention existing
/// consumers of the output expect; do not change it.
pub fn cell_point(bbox: &TileBBox, cell: u32, num_cells: u32) -> Point<f64> {
    let coords = CellCoords::resolve(bbox, cell, num_cells);
    let n = num_cells as f64;

    let x = bbox.min_x + (coords.col as f64 / n) * coords.width;
    let y = bbox.min_y + (coords.row as f64 / n) * coords.height;

    Point::new(x, y)
}

/// Polygon geometry of a cell: the rectangle it covers within the bbox.
///
/// The exterior ring is closed and wound lower-left, lower-right,
/// upper-right, upper-left, lower-left.
pub fn cell_polygon(bbox: &TileBBox, cell: u32, num_cells: u32) -> Polygon<f64> {
    let coords = CellCoords::resolve(bbox, cell, num_cells);
    let n = num_cells as f64;

    let min_x = bbox.min_x + (coords.col as f64 / n) * coords.width;
    let min_y = bbox.min_y + (coords.row as f64 / n) * coords.height;
    let max_x = bbox.min_x + ((coords.col + 1) as f64 / n) * coords.width;
    let max_y = bbox.min_y + ((coords.row + 1) as f64 / n) * coords.height;

    polygon![
        (x: min_x, y: min_y),
        (x: max_x, y: min_y),
        (x: max_x, y: max_y),
        (x: min_x, y: max_y),
        (x: min_x, y: min_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cell_coords_row_major() {
        let bbox = TileBBox::new(0.0, 0.0, 4.0, 4.0);
        let coords = CellCoords::resolve(&bbox, 5, 4);
        assert_eq!(coords.col, 1);
        assert_eq!(coords.row, 1);
    }

    #[test]
    fn test_point_is_lower_left_corner() {
        let bbox = TileBBox::new(0.0, 0.0, 4.0, 4.0);
        let p = cell_point(&bbox, 5, 4);
        assert_relative_eq!(p.x(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_ring() {
        let bbox = TileBBox::new(0.0, 0.0, 4.0, 4.0);
        let poly = cell_polygon(&bbox, 5, 4);

        let ring: Vec<(f64, f64)> = poly.exterior().coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(
            ring,
            vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_non_square_bbox() {
        // 2x2 grid over a 10x4 extent: cell 3 is the upper-right quadrant.
        let bbox = TileBBox::new(100.0, 50.0, 110.0, 54.0);
        let p = cell_point(&bbox, 3, 2);
        assert_relative_eq!(p.x(), 105.0, epsilon = 1e-12);
        assert_relative_eq!(p.y(), 52.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_cell_is_not_an_error() {
        // cell 20 in a 4x4 grid lands above the bbox
        let bbox = TileBBox::new(0.0, 0.0, 4.0, 4.0);
        let p = cell_point(&bbox, 20, 4);
        assert_relative_eq!(p.y(), 5.0, epsilon = 1e-12);
    }
}
