//! Error types for tile buffer encoding and aggregation.

use thiserror::Error;

/// Errors produced while encoding a tile layer or aggregating a buffer.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("tileset {tileset:?} not present in decoded tile")]
    MissingLayer { tileset: String },

    #[error("truncated record at offset {offset}: need {needed} more values, {available} available")]
    TruncatedRecord {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("record for cell {cell} has inverted time range: min {min} > max {max}")]
    InvalidTimeRange { cell: u32, min: u32, max: u32 },

    #[error("cell {cell} out of range for a {num_cells}x{num_cells} grid")]
    CellOutOfRange { cell: u32, num_cells: u32 },

    #[error("feature {feature} has no 'cell' property")]
    MissingCellKey { feature: usize },

    #[error("feature {feature} has non-timestamp property key {key:?}")]
    InvalidTimestampKey { feature: usize, key: String },

    #[error("feature {feature} has no timestamp properties")]
    EmptyTimeSeries { feature: usize },

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result alias for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregationError>;
