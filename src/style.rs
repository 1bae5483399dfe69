use serde::Serialize;
use serde_json::{Value, json};

use crate::colors::{DepthColour, colour_for_depth, radius_for_magnitude};
use crate::feature::{Feature, UNKNOWN_PLACE};
use crate::util::escape_html;

/// Outline colour of every earthquake marker
pub const QUAKE_OUTLINE: &str = "white";
pub const QUAKE_FILL_OPACITY: f64 = 0.5;
pub const QUAKE_WEIGHT: f64 = 1.5;

/// Property under which rendering data is attached, kept apart from feed properties
pub const RENDER_KEY: &str = "_quakemap";

pub const PLATE_COLOR: &str = "blue";
pub const PLATE_WEIGHT: f64 = 2.0;

/// Leaflet path options for one feature.
///
/// Field names serialise to Leaflet's camelCase option keys. Fill fields are
/// omitted for line styles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<DepthColour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// Styling strategy applied to each feature as an overlay is populated.
pub trait FeatureStyler: Send + Sync {
    fn style_for(&self, feature: &Feature) -> StyleDescriptor;

    /// Plain-text popup label, or `None` when the feature gets no popup.
    fn label_for(&self, feature: &Feature) -> Option<String>;
}

/// Circle markers coloured by depth and sized by magnitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuakeStyler;

impl FeatureStyler for QuakeStyler {
    fn style_for(&self, feature: &Feature) -> StyleDescriptor {
        // Missing depth lands in the shallowest band, missing magnitude on the radius floor
        let depth = feature.depth().unwrap_or(f64::NEG_INFINITY);
        let magnitude = feature.magnitude().unwrap_or(0.0);
        StyleDescriptor {
            color: QUAKE_OUTLINE,
            fill_color: Some(colour_for_depth(depth)),
            fill_opacity: Some(QUAKE_FILL_OPACITY),
            weight: QUAKE_WEIGHT,
            radius: Some(radius_for_magnitude(magnitude)),
        }
    }

    fn label_for(&self, feature: &Feature) -> Option<String> {
        Some(popup_text_for(feature))
    }
}

/// Plain blue boundary lines, no popups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlateStyler;

impl FeatureStyler for PlateStyler {
    fn style_for(&self, _feature: &Feature) -> StyleDescriptor {
        plate_style()
    }

    fn label_for(&self, _feature: &Feature) -> Option<String> {
        None
    }
}

pub fn plate_style() -> StyleDescriptor {
    StyleDescriptor {
        color: PLATE_COLOR,
        fill_color: None,
        fill_opacity: None,
        weight: PLATE_WEIGHT,
        radius: None,
    }
}

/// Two-line popup label: `Magnitude: {mag}` then `Location: {place}`.
pub fn popup_text_for(feature: &Feature) -> String {
    let mag = feature
        .magnitude()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let place = feature.place().unwrap_or(UNKNOWN_PLACE);
    format!("Magnitude: {}\nLocation: {}", mag, place)
}

/// Escape a plain-text label for a Leaflet popup, one `<br>` per line break.
pub fn label_to_html(label: &str) -> String {
    label
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// A feature together with everything the page needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    pub feature: Feature,
    pub style: StyleDescriptor,
    pub popup_html: Option<String>,
}

impl StyledFeature {
    pub fn new(feature: Feature, styler: &dyn FeatureStyler) -> Self {
        let style = styler.style_for(&feature);
        let popup_html = styler.label_for(&feature).map(|l| label_to_html(&l));
        Self {
            feature,
            style,
            popup_html,
        }
    }

    /// GeoJSON feature with `style` and `popup` attached under [`RENDER_KEY`]
    /// in its properties. Feed properties are left as they were.
    pub fn to_geojson(&self) -> Value {
        let mut render = json!({ "style": self.style });
        if let Some(popup) = &self.popup_html {
            render["popup"] = json!(popup);
        }
        let mut properties = self.feature.properties.clone();
        properties.insert(RENDER_KEY.to_string(), render);

        let mut out = json!({
            "type": "Feature",
            "geometry": self.feature.geometry,
            "properties": properties,
        });
        for (key, value) in &self.feature.extra {
            out[key.as_str()] = value.clone();
        }
        out
    }
}
