use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder shown when an earthquake carries no usable `place`
pub const UNKNOWN_PLACE: &str = "Unknown location";

/// GeoJSON geometry, kept loosely typed so any geometry kind passes through
/// to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// A single GeoJSON feature. Unknown top-level members (such as `id`) are
/// kept in `extra` so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "nullable_map")]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A GeoJSON feature collection as served by both feeds.
///
/// Features are decoded one at a time; a malformed entry is dropped rather
/// than failing the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Vec<Feature>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

// GeoJSON allows `"properties": null`
fn nullable_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let features = raw
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<Feature>(value) {
            Ok(feature) => Some(feature),
            Err(e) => {
                debug!("Skipping malformed feature {}: {}", idx, e);
                None
            }
        })
        .collect();
    Ok(features)
}

impl Feature {
    /// Depth in km, taken from the third coordinate of a Point geometry.
    pub fn depth(&self) -> Option<f64> {
        let geometry = self.geometry.as_ref()?;
        if !geometry.kind.eq_ignore_ascii_case("Point") {
            return None;
        }
        geometry
            .coordinates
            .as_array()
            .and_then(|coords| coords.get(2))
            .and_then(|v| v.as_f64())
    }

    /// Magnitude from the `mag` property.
    pub fn magnitude(&self) -> Option<f64> {
        self.properties.get("mag").and_then(|v| v.as_f64())
    }

    /// Human-readable location from the `place` property.
    pub fn place(&self) -> Option<&str> {
        self.properties
            .get("place")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_point(&self) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|g| g.kind.eq_ignore_ascii_case("Point"))
    }
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quake(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_usgs_point_feature() {
        let f = quake(json!({
            "type": "Feature",
            "id": "us7000abcd",
            "properties": {"mag": 4.5, "place": "10km N of Testville", "tsunami": 0},
            "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]}
        }));

        assert_eq!(f.depth(), Some(8.2));
        assert_eq!(f.magnitude(), Some(4.5));
        assert_eq!(f.place(), Some("10km N of Testville"));
        assert!(f.is_point());
        assert_eq!(f.extra.get("id"), Some(&json!("us7000abcd")));
    }

    #[test]
    fn missing_values_are_none() {
        let f = quake(json!({
            "type": "Feature",
            "properties": null,
            "geometry": {"type": "Point", "coordinates": [-117.5, 35.7]}
        }));

        assert_eq!(f.depth(), None);
        assert_eq!(f.magnitude(), None);
        assert_eq!(f.place(), None);
    }

    #[test]
    fn non_numeric_magnitude_and_blank_place_are_none() {
        let f = quake(json!({
            "type": "Feature",
            "properties": {"mag": "big", "place": "  "},
            "geometry": null
        }));

        assert_eq!(f.magnitude(), None);
        assert_eq!(f.place(), None);
        assert_eq!(f.depth(), None);
        assert!(!f.is_point());
    }

    #[test]
    fn line_geometry_has_no_depth() {
        let f = quake(json!({
            "type": "Feature",
            "properties": {"Name": "AF-AN"},
            "geometry": {"type": "LineString", "coordinates": [[0.0, 1.0, 50.0], [2.0, 3.0, 50.0]]}
        }));

        assert_eq!(f.depth(), None);
    }

    #[test]
    fn malformed_features_are_dropped_individually() {
        let fc: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"mag": 5.0, "place": "Good one"},
                    "geometry": {"type": "Point", "coordinates": [140.0, 35.0, 95.0]}
                },
                {
                    "type": "Feature",
                    "properties": {"mag": 2.0},
                    "geometry": {"coordinates": [1.0, 2.0, 3.0]}
                },
                {
                    "type": "Feature",
                    "properties": "oops",
                    "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]}
                },
                "not a feature"
            ]
        }))
        .unwrap();

        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].place(), Some("Good one"));
        assert_eq!(fc.features[0].depth(), Some(95.0));
    }

    #[test]
    fn null_features_member_is_empty() {
        let fc: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": null}))
                .unwrap();
        assert!(fc.is_empty());
    }

    #[test]
    fn collection_tolerates_missing_features() {
        let fc: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection"})).unwrap();
        assert!(fc.is_empty());
    }
}
