//! Sliding time-window aggregation of tile buffers.
//!
//! Walks the buffer once, value by value, through an explicit per-record
//! state machine (`Cell → MinTimestamp → MaxTimestamp → Value*`). Each raw
//! value advances a `delta`-wide window sum in O(1) via a circular buffer;
//! at the record boundary a finalization pass drains the window for the
//! timestamps whose right edge has passed the last sample. One feature is
//! emitted per record.

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridtide_core::feature::{Feature, FeatureCollection, PropertyValue};
use gridtide_core::grid::{cell_point, cell_polygon};
use gridtide_core::TileBBox;

use crate::buffer::HEADER_LEN;
use crate::error::{AggregationError, Result};
use crate::window::SlidingWindow;

/// Literal prefix existing consumers match on in the `presence` string.
const PRESENCE_PREFIX: &str = "hello";

/// Output geometry mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeomType {
    /// Rectangular cell polygons.
    #[default]
    Gridded,
    /// Lower-left-corner points, decimated by `point_decimation`.
    Point,
}

/// Parameters for one aggregation call. Plain data; no file or
/// environment binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateParams {
    /// Geographic extent of the tile being aggregated.
    pub tile_bbox: TileBBox,
    /// Shift subtracted from absolute timestamps to produce output frame
    /// indices.
    pub quantize_offset: u32,
    /// Window length: number of consecutive time buckets summed into one
    /// output frame.
    pub delta: u32,
    pub geom_type: GeomType,
    /// Grid side length; the tile holds `num_cells²` cells.
    pub num_cells: u32,
    /// When set, emit only the frame at this quantized timestamp, as a
    /// single `value` property.
    pub single_frame_start: Option<u32>,
    /// Point mode writes values only for cells with
    /// `cell % point_decimation == 0`. A coarsening heuristic, not spatial
    /// aggregation; other point-mode cells keep their geometry but get an
    /// empty property map.
    pub point_decimation: u32,
}

impl AggregateParams {
    /// Parameters with the standard defaults (`delta` 30, gridded
    /// geometry, 64×64 grid, multi-frame output).
    pub fn new(tile_bbox: TileBBox, quantize_offset: u32) -> Self {
        Self {
            tile_bbox,
            quantize_offset,
            delta: 30,
            geom_type: GeomType::default(),
            num_cells: 64,
            single_frame_start: None,
            point_decimation: 4,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.delta == 0 {
            return Err(AggregationError::InvalidParameter {
                name: "delta",
                value: self.delta.to_string(),
                reason: "window length must be at least 1",
            });
        }
        if self.num_cells == 0 {
            return Err(AggregationError::InvalidParameter {
                name: "num_cells",
                value: self.num_cells.to_string(),
                reason: "grid side length must be at least 1",
            });
        }
        if self.geom_type == GeomType::Point && self.point_decimation == 0 {
            return Err(AggregationError::InvalidParameter {
                name: "point_decimation",
                value: self.point_decimation.to_string(),
                reason: "decimation modulus must be at least 1",
            });
        }
        Ok(())
    }
}

/// Decode position within the current record.
///
/// Header states carry what the record has revealed so far, so a record
/// boundary in any state other than `Cell` is detectable as truncation.
enum DecodeState {
    Cell,
    MinTimestamp {
        cell: u32,
        geometry: Geometry<f64>,
    },
    MaxTimestamp {
        cell: u32,
        geometry: Geometry<f64>,
        min_timestamp: i64,
    },
    Value(RecordContext),
}

/// Accumulators for the record currently being decoded.
struct RecordContext {
    cell: u32,
    geometry: Geometry<f64>,
    min_timestamp: i64,
    max_timestamp: i64,
    /// Timestamp of the next incoming raw value.
    head: i64,
    /// Raw values still expected before the record boundary.
    remaining: i64,
    /// Running window sum. `u64`: a window of 16-bit values overflows both
    /// 16 and 32 bits.
    acc: u64,
    /// Frames written so far: (quantized tail, window sum), in write order.
    frames: Vec<(i64, u64)>,
    /// Output of single-frame mode.
    single_value: Option<u64>,
}

impl RecordContext {
    fn new(cell: u32, geometry: Geometry<f64>, min_timestamp: i64, max_timestamp: i64) -> Self {
        Self {
            cell,
            geometry,
            min_timestamp,
            max_timestamp,
            head: min_timestamp,
            remaining: max_timestamp - min_timestamp + 1,
            acc: 0,
            frames: Vec::new(),
            single_value: None,
        }
    }

    /// Consume one raw value: advance the window sum and emit the frame
    /// whose window starts at `tail`.
    fn step(&mut self, raw: u16, window: &mut SlidingWindow, params: &AggregateParams) {
        let tail = self.head - i64::from(params.delta) + 1;

        // Eviction on a full window is exactly the `tail > min_timestamp`
        // condition: the window has already absorbed `delta` values.
        let outgoing = window.push(raw).map_or(0, u64::from);
        self.acc = self.acc + u64::from(raw) - outgoing;

        self.write_frame(tail, params);
        self.head += 1;
        self.remaining -= 1;
    }

    /// Drain the window past the last raw value: one frame per timestamp
    /// in `(last tail, max_timestamp]`, with no new incoming values.
    ///
    /// Runs for every record, including single-frame mode, where the
    /// writes are filtered by the `single_frame_start` match like any
    /// other write.
    fn finalize(&mut self, window: &mut SlidingWindow, params: &AggregateParams) {
        let last_tail = self.max_timestamp - i64::from(params.delta) + 1;
        for tail in (last_tail + 1)..=self.max_timestamp {
            let outgoing = if tail > self.min_timestamp {
                window.pop_front().map_or(0, u64::from)
            } else {
                0
            };
            self.acc -= outgoing;
            self.write_frame(tail, params);
        }
    }

    /// Write the current window sum at `tail`, subject to the positivity,
    /// quantization, decimation and single-frame gates.
    fn write_frame(&mut self, tail: i64, params: &AggregateParams) {
        if self.acc == 0 {
            return;
        }
        let quantized = tail - i64::from(params.quantize_offset);
        if quantized < 0 {
            return;
        }
        if params.geom_type == GeomType::Point
            && self.cell % params.point_decimation != 0
        {
            return;
        }
        match params.single_frame_start {
            Some(start) => {
                if quantized == i64::from(start) {
                    self.single_value = Some(self.acc);
                }
            }
            None => self.frames.push((quantized, self.acc)),
        }
    }

    fn into_feature(self, params: &AggregateParams) -> Feature {
        let mut feature = Feature::new(self.geometry);
        if params.single_frame_start.is_some() {
            if let Some(value) = self.single_value {
                feature.set_property("value", PropertyValue::Count(value));
            }
        } else if !self.frames.is_empty() {
            let presence = self
                .frames
                .iter()
                .map(|(_, value)| format!("{PRESENCE_PREFIX}{value}"))
                .collect::<Vec<_>>()
                .join(",");
            for (quantized, value) in self.frames {
                feature.set_property(quantized.to_string(), PropertyValue::Count(value));
            }
            feature.set_property("presence", PropertyValue::Text(presence));
        }
        feature
    }
}

/// Aggregate an encoded tile buffer into one feature per record.
///
/// Each feature's properties hold the `delta`-wide window sums keyed by
/// quantized timestamp (multi-frame), or a single `value` entry
/// (single-frame). Returns a complete collection or a typed error; a
/// malformed buffer never yields partial output.
pub fn aggregate(buffer: &[u16], params: &AggregateParams) -> Result<FeatureCollection> {
    params.validate()?;

    let max_cell = u64::from(params.num_cells) * u64::from(params.num_cells);
    let mut features = FeatureCollection::new();
    let mut window = SlidingWindow::new(params.delta as usize);
    let mut state = DecodeState::Cell;
    let mut record_start = 0usize;

    for (offset, &raw) in buffer.iter().enumerate() {
        state = match state {
            DecodeState::Cell => {
                record_start = offset;
                let cell = u32::from(raw);
                if u64::from(cell) >= max_cell {
                    return Err(AggregationError::CellOutOfRange {
                        cell,
                        num_cells: params.num_cells,
                    });
                }
                let geometry: Geometry<f64> = match params.geom_type {
                    GeomType::Point => {
                        cell_point(&params.tile_bbox, cell, params.num_cells).into()
                    }
                    GeomType::Gridded => {
                        cell_polygon(&params.tile_bbox, cell, params.num_cells).into()
                    }
                };
                DecodeState::MinTimestamp { cell, geometry }
            }
            DecodeState::MinTimestamp { cell, geometry } => DecodeState::MaxTimestamp {
                cell,
                geometry,
                min_timestamp: i64::from(raw),
            },
            DecodeState::MaxTimestamp {
                cell,
                geometry,
                min_timestamp,
            } => {
                let max_timestamp = i64::from(raw);
                if max_timestamp < min_timestamp {
                    return Err(AggregationError::InvalidTimeRange {
                        cell,
                        min: min_timestamp as u32,
                        max: max_timestamp as u32,
                    });
                }
                window.clear();
                DecodeState::Value(RecordContext::new(
                    cell,
                    geometry,
                    min_timestamp,
                    max_timestamp,
                ))
            }
            DecodeState::Value(mut ctx) => {
                ctx.step(raw, &mut window, params);
                if ctx.remaining == 0 {
                    ctx.finalize(&mut window, params);
                    features.push(ctx.into_feature(params));
                    DecodeState::Cell
                } else {
                    DecodeState::Value(ctx)
                }
            }
        };
    }

    // The scan must end exactly on a record boundary.
    let needed = match &state {
        DecodeState::Cell => 0,
        DecodeState::MinTimestamp { .. } | DecodeState::MaxTimestamp { .. } => HEADER_LEN + 1,
        DecodeState::Value(ctx) => {
            HEADER_LEN + (ctx.max_timestamp - ctx.min_timestamp + 1) as usize
        }
    };
    if needed > 0 {
        return Err(AggregationError::TruncatedRecord {
            offset: record_start,
            needed,
            available: buffer.len() - record_start,
        });
    }

    debug!(
        buffer_len = buffer.len(),
        features = features.len(),
        delta = params.delta,
        "aggregated tile buffer"
    );
    Ok(features)
}
