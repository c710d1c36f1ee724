//! Decoded tile layer input boundary.
//!
//! The wire format (length-prefixed, compressed vector tiles) is decoded by
//! an upstream collaborator; this module models what arrives on the other
//! side of that boundary: named layers whose features carry a `cell`
//! property and one property per absolute timestamp.

use std::collections::HashMap;

use crate::error::{AggregationError, Result};

/// One feature of a decoded tile layer.
///
/// Properties hold the reserved `cell` key plus one entry per absolute
/// timestamp (key = decimal timestamp, value = raw count). Values are
/// `u16` by contract with the buffer format.
#[derive(Debug, Clone, Default)]
pub struct LayerFeature {
    pub properties: HashMap<String, u16>,
}

impl LayerFeature {
    /// Build a feature from a cell index and a sparse timestamp → value map.
    pub fn from_series(cell: u16, series: &HashMap<u16, u16>) -> Self {
        let mut properties = HashMap::with_capacity(series.len() + 1);
        properties.insert("cell".to_string(), cell);
        for (&t, &v) in series {
            properties.insert(t.to_string(), v);
        }
        Self { properties }
    }
}

/// A named layer of a decoded tile.
#[derive(Debug, Clone, Default)]
pub struct TileLayer {
    pub features: Vec<LayerFeature>,
}

/// A decoded tile: a set of named layers.
#[derive(Debug, Clone, Default)]
pub struct DecodedTile {
    pub layers: HashMap<String, TileLayer>,
}

impl DecodedTile {
    /// Look up a layer by tileset name.
    ///
    /// A missing layer is a loud failure: silently aggregating nothing
    /// would be indistinguishable from an empty tile.
    pub fn layer(&self, tileset: &str) -> Result<&TileLayer> {
        self.layers
            .get(tileset)
            .ok_or_else(|| AggregationError::MissingLayer {
                tileset: tileset.to_string(),
            })
    }
}
