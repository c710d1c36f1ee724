//! Aggregation output types: features and feature collections.

use geo_types::Geometry;
use serde::Serialize;
use std::collections::HashMap;

/// Property value types carried by output features.
///
/// Aggregated frames are window sums (`Count`); the derived `presence`
/// string is `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyValue {
    Count(u64),
    Text(String),
}

impl PropertyValue {
    /// The numeric value, if this is a `Count`.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            PropertyValue::Count(v) => Some(*v),
            PropertyValue::Text(_) => None,
        }
    }

    /// The string value, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Count(_) => None,
        }
    }
}

/// A geographic feature: one grid cell's geometry plus its aggregated
/// time frames.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Cell geometry (Point or Polygon, depending on aggregation mode)
    pub geometry: Geometry<f64>,
    /// Aggregated properties, keyed by quantized timestamp (multi-frame)
    /// or `"value"` (single-frame)
    pub properties: HashMap<String, PropertyValue>,
}

impl Feature {
    /// Create a new feature with geometry and no properties.
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            properties: HashMap::new(),
        }
    }

    /// Set a property.
    pub fn set_property(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get a property.
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// The window sum at a quantized timestamp, if one was emitted.
    pub fn frame(&self, quantized: u32) -> Option<u64> {
        self.properties
            .get(&quantized.to_string())
            .and_then(PropertyValue::as_count)
    }
}

/// Collection of features, one per buffer record.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;

    #[test]
    fn test_frame_lookup() {
        let mut f = Feature::new(Point::new(0.0, 0.0));
        f.set_property("42", PropertyValue::Count(7));
        f.set_property("presence", PropertyValue::Text("x".into()));

        assert_eq!(f.frame(42), Some(7));
        assert_eq!(f.frame(43), None);
        // text properties are not frames
        assert_eq!(f.get_property("presence").unwrap().as_count(), None);
    }

    #[test]
    fn test_collection_push_iter() {
        let mut fc = FeatureCollection::new();
        assert!(fc.is_empty());
        fc.push(Feature::new(Point::new(1.0, 2.0)));
        fc.push(Feature::new(Point::new(3.0, 4.0)));
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.iter().count(), 2);
    }
}
