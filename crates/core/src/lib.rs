//! # Gridtide Core
//!
//! Core types for the gridtide temporal aggregation engine.
//!
//! This crate provides:
//! - `TileBBox`: geographic bounding box of a tile
//! - Cell-grid geometry: mapping row-major cell indices to Point/Polygon
//!   geometries within a tile extent
//! - `Feature` / `FeatureCollection`: aggregation output types
//!
//! All geometry math here is pure and infallible; the decode and
//! aggregation machinery (and its error taxonomy) lives in
//! `gridtide-aggregation`.

pub mod bbox;
pub mod feature;
pub mod grid;

pub use bbox::TileBBox;
pub use feature::{Feature, FeatureCollection, PropertyValue};
pub use grid::{cell_point, cell_polygon, CellCoords};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bbox::TileBBox;
    pub use crate::feature::{Feature, FeatureCollection, PropertyValue};
    pub use crate::grid::{cell_point, cell_polygon, CellCoords};
}
