//! # Gridtide Aggregation
//!
//! Per-tile temporal aggregation: encode a decoded tile layer's sparse
//! per-cell time series into a flat `u16` buffer, then aggregate that
//! buffer into geographic features carrying sliding time-window sums.
//!
//! ## Pipeline
//!
//! 1. **layer** — the input boundary: a decoded tile's named layers, one
//!    `cell` property plus timestamp-keyed counts per feature
//! 2. **buffer** — the flat record format: encode, and bounds-checked
//!    record decode
//! 3. **aggregate** — the streaming windowed-sum scan emitting one
//!    feature per record
//!
//! Every call is synchronous and self-contained; independent tiles can be
//! processed concurrently with no coordination.

pub mod aggregate;
pub mod buffer;
pub mod error;
pub mod layer;
pub mod window;

pub use aggregate::{aggregate, AggregateParams, GeomType};
pub use buffer::{decode_records, encode_layer, encode_tile, BufferRecord};
pub use error::{AggregationError, Result};
pub use layer::{DecodedTile, LayerFeature, TileLayer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregate::{aggregate, AggregateParams, GeomType};
    pub use crate::buffer::{decode_records, encode_layer, encode_tile, BufferRecord};
    pub use crate::error::{AggregationError, Result};
    pub use crate::layer::{DecodedTile, LayerFeature, TileLayer};
    pub use gridtide_core::prelude::*;
}
