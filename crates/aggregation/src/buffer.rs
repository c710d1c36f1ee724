//! Flat `u16` tile buffer encoding and record-level decoding.
//!
//! A buffer is the concatenation, in feature order, of variable-length
//! records `[cell, min, max, v(min), …, v(max)]`. There is no feature count
//! and no length prefix; a record's length is `3 + (max - min + 1)`, so
//! boundaries can only be recovered by walking the records in order.

use tracing::trace;

use crate::error::{AggregationError, Result};
use crate::layer::{DecodedTile, TileLayer};

/// Number of header values preceding each record's dense value run.
pub const HEADER_LEN: usize = 3;

/// One decoded buffer record: a cell's dense time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRecord {
    pub cell: u16,
    pub min_timestamp: u16,
    pub max_timestamp: u16,
    /// One value per timestamp in `min_timestamp..=max_timestamp`,
    /// zero-filled where the source series had no sample.
    pub values: Vec<u16>,
}

impl BufferRecord {
    /// Number of buffer values this record occupies.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.values.len()
    }
}

/// Encode a decoded tile layer into a flat buffer, preserving feature order.
///
/// Each feature must carry a `cell` property and at least one property
/// whose key parses as a `u16` timestamp. Missing timestamps inside the
/// `[min, max]` span are encoded as zero.
pub fn encode_layer(layer: &TileLayer) -> Result<Vec<u16>> {
    struct Pending<'a> {
        cell: u16,
        min: u16,
        max: u16,
        feature: &'a std::collections::HashMap<String, u16>,
    }

    // First pass: parse headers and size the buffer.
    let mut pending = Vec::with_capacity(layer.features.len());
    let mut buffer_len = 0usize;

    for (index, feature) in layer.features.iter().enumerate() {
        let cell = *feature
            .properties
            .get("cell")
            .ok_or(AggregationError::MissingCellKey { feature: index })?;

        let mut min = u16::MAX;
        let mut max = u16::MIN;
        let mut seen = false;
        for key in feature.properties.keys() {
            if key == "cell" {
                continue;
            }
            let t: u16 =
                key.parse()
                    .map_err(|_| AggregationError::InvalidTimestampKey {
                        feature: index,
                        key: key.clone(),
                    })?;
            min = min.min(t);
            max = max.max(t);
            seen = true;
        }
        if !seen {
            return Err(AggregationError::EmptyTimeSeries { feature: index });
        }

        buffer_len += HEADER_LEN + (max - min) as usize + 1;
        pending.push(Pending {
            cell,
            min,
            max,
            feature: &feature.properties,
        });
    }

    // Second pass: fill the buffer.
    let mut buffer = Vec::with_capacity(buffer_len);
    for p in &pending {
        buffer.push(p.cell);
        buffer.push(p.min);
        buffer.push(p.max);
        for t in p.min..=p.max {
            buffer.push(p.feature.get(&t.to_string()).copied().unwrap_or(0));
        }
    }
    debug_assert_eq!(buffer.len(), buffer_len);

    trace!(
        features = pending.len(),
        buffer_len,
        "encoded tile layer"
    );
    Ok(buffer)
}

/// Look up `tileset` in a decoded tile and encode it.
pub fn encode_tile(tile: &DecodedTile, tileset: &str) -> Result<Vec<u16>> {
    encode_layer(tile.layer(tileset)?)
}

/// Decode a buffer into records, with full bounds checking.
///
/// This is the record-level view of the buffer; the sliding-window
/// aggregator consumes values one at a time instead (see
/// [`crate::aggregate`]).
pub fn decode_records(buffer: &[u16]) -> Result<Vec<BufferRecord>> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    while offset < buffer.len() {
        let available = buffer.len() - offset;
        if available < HEADER_LEN {
            return Err(AggregationError::TruncatedRecord {
                offset,
                needed: HEADER_LEN,
                available,
            });
        }

        let cell = buffer[offset];
        let min = buffer[offset + 1];
        let max = buffer[offset + 2];
        if min > max {
            return Err(AggregationError::InvalidTimeRange {
                cell: cell as u32,
                min: min as u32,
                max: max as u32,
            });
        }

        let span = (max - min) as usize + 1;
        if available - HEADER_LEN < span {
            return Err(AggregationError::TruncatedRecord {
                offset,
                needed: HEADER_LEN + span,
                available,
            });
        }

        records.push(BufferRecord {
            cell,
            min_timestamp: min,
            max_timestamp: max,
            values: buffer[offset + HEADER_LEN..offset + HEADER_LEN + span].to_vec(),
        });
        offset += HEADER_LEN + span;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerFeature;
    use std::collections::HashMap;

    fn layer_of(features: Vec<LayerFeature>) -> TileLayer {
        TileLayer { features }
    }

    #[test]
    fn test_encode_zero_fills_gaps() {
        let series = HashMap::from([(10u16, 5u16), (13, 2)]);
        let layer = layer_of(vec![LayerFeature::from_series(9, &series)]);

        let buffer = encode_layer(&layer).unwrap();
        assert_eq!(buffer, vec![9, 10, 13, 5, 0, 0, 2]);
    }

    #[test]
    fn test_encode_preserves_feature_order() {
        let a = LayerFeature::from_series(1, &HashMap::from([(5u16, 1u16)]));
        let b = LayerFeature::from_series(2, &HashMap::from([(7u16, 3u16)]));
        let buffer = encode_layer(&layer_of(vec![a, b])).unwrap();
        assert_eq!(buffer, vec![1, 5, 5, 1, 2, 7, 7, 3]);
    }

    #[test]
    fn test_encode_missing_cell() {
        let mut feature = LayerFeature::default();
        feature.properties.insert("10".into(), 1);
        let err = encode_layer(&layer_of(vec![feature])).unwrap_err();
        assert!(matches!(err, AggregationError::MissingCellKey { feature: 0 }));
    }

    #[test]
    fn test_encode_bad_timestamp_key() {
        let mut feature = LayerFeature::default();
        feature.properties.insert("cell".into(), 1);
        feature.properties.insert("not-a-ts".into(), 1);
        let err = encode_layer(&layer_of(vec![feature])).unwrap_err();
        assert!(matches!(
            err,
            AggregationError::InvalidTimestampKey { feature: 0, .. }
        ));
    }

    #[test]
    fn test_encode_empty_series() {
        let mut feature = LayerFeature::default();
        feature.properties.insert("cell".into(), 1);
        let err = encode_layer(&layer_of(vec![feature])).unwrap_err();
        assert!(matches!(err, AggregationError::EmptyTimeSeries { feature: 0 }));
    }

    #[test]
    fn test_round_trip() {
        let features = vec![
            LayerFeature::from_series(0, &HashMap::from([(100u16, 1u16), (105, 9)])),
            LayerFeature::from_series(63, &HashMap::from([(200u16, 65535u16)])),
            LayerFeature::from_series(7, &HashMap::from([(3u16, 4u16), (4, 5), (5, 6)])),
        ];
        let layer = layer_of(features);
        let buffer = encode_layer(&layer).unwrap();

        let records = decode_records(&buffer).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            BufferRecord {
                cell: 0,
                min_timestamp: 100,
                max_timestamp: 105,
                values: vec![1, 0, 0, 0, 0, 9],
            }
        );
        assert_eq!(
            records[1],
            BufferRecord {
                cell: 63,
                min_timestamp: 200,
                max_timestamp: 200,
                values: vec![65535],
            }
        );
        assert_eq!(
            records[2],
            BufferRecord {
                cell: 7,
                min_timestamp: 3,
                max_timestamp: 5,
                values: vec![4, 5, 6],
            }
        );
    }

    #[test]
    fn test_decode_truncated_header() {
        let err = decode_records(&[1, 10]).unwrap_err();
        assert!(matches!(err, AggregationError::TruncatedRecord { offset: 0, .. }));
    }

    #[test]
    fn test_decode_truncated_values() {
        // record claims span 10..=12 (3 values) but only 2 follow
        let err = decode_records(&[1, 10, 12, 5, 5]).unwrap_err();
        assert!(matches!(
            err,
            AggregationError::TruncatedRecord { offset: 0, needed: 6, available: 5 }
        ));
    }

    #[test]
    fn test_decode_inverted_range() {
        let err = decode_records(&[1, 12, 10, 5]).unwrap_err();
        assert!(matches!(
            err,
            AggregationError::InvalidTimeRange { cell: 1, min: 12, max: 10 }
        ));
    }
}
