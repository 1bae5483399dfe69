use log::debug;
use serde_json::{Value, json};
use std::fmt;

use crate::colors::DEPTH_BANDS;
use crate::feature::FeatureCollection;
use crate::features::{OverlayDef, OverlayKind};
use crate::legend::{LEGEND_CSS, LegendEntry, build_legend, render_legend_html};
use crate::style::{FeatureStyler, RENDER_KEY, StyledFeature};
use crate::util::{escape_html, fill_template, json_for_script};

pub const DEFAULT_TITLE: &str = "Earthquakes and Tectonic Plates";

pub const LEAFLET_VERSION: &str = "1.9.4";

pub const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Background tile layer
#[derive(Debug, Clone, PartialEq)]
pub struct Basemap {
    pub name: &'static str,
    pub url_template: &'static str,
    pub attribution: &'static str,
}

pub fn default_basemaps() -> Vec<Basemap> {
    vec![
        Basemap {
            name: "Basemap",
            url_template: OSM_TILES,
            attribution: OSM_ATTRIBUTION,
        },
        Basemap {
            name: "Street",
            url_template: OSM_TILES,
            attribution: OSM_ATTRIBUTION,
        },
    ]
}

/// A named, toggleable collection of styled features.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub name: &'static str,
    pub kind: OverlayKind,
    pub features: Vec<StyledFeature>,
}

impl Overlay {
    pub fn new(def: &OverlayDef) -> Self {
        Self {
            name: def.name,
            kind: def.kind,
            features: Vec::new(),
        }
    }

    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self.features.iter().map(|f| f.to_geojson()).collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    UnknownBasemap(String),
    UnknownOverlay(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::UnknownBasemap(name) => write!(f, "unknown basemap '{}'", name),
            ControlError::UnknownOverlay(name) => write!(f, "unknown overlay '{}'", name),
        }
    }
}

impl std::error::Error for ControlError {}

/// Layer switcher state: exactly one active basemap, independent overlay toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControl {
    basemaps: Vec<&'static str>,
    active_basemap: usize,
    overlays: Vec<(&'static str, bool)>,
}

impl LayerControl {
    pub fn new(basemaps: &[Basemap]) -> Self {
        Self {
            basemaps: basemaps.iter().map(|b| b.name).collect(),
            active_basemap: 0,
            overlays: Vec::new(),
        }
    }

    pub fn register_overlay(&mut self, name: &'static str, visible: bool) {
        match self.overlays.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = visible,
            None => self.overlays.push((name, visible)),
        }
    }

    /// Switch the background; the previous one is deselected.
    pub fn select_basemap(&mut self, name: &str) -> Result<(), ControlError> {
        let idx = self
            .basemaps
            .iter()
            .position(|n| *n == name)
            .ok_or_else(|| ControlError::UnknownBasemap(name.to_string()))?;
        self.active_basemap = idx;
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> Result<(), ControlError> {
        let entry = self
            .overlays
            .iter_mut()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| ControlError::UnknownOverlay(name.to_string()))?;
        entry.1 = visible;
        Ok(())
    }

    pub fn active_basemap(&self) -> Option<&'static str> {
        self.basemaps.get(self.active_basemap).copied()
    }

    pub fn is_overlay_visible(&self, name: &str) -> bool {
        self.overlays.iter().any(|(n, v)| *n == name && *v)
    }
}

/// Composition root for the page: view settings, layers, control and legend.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
    pub basemaps: Vec<Basemap>,
    pub overlays: Vec<Overlay>,
    pub control: LayerControl,
    pub legend: Vec<LegendEntry>,
}

impl MapView {
    /// Centred on the continental US, as the feeds are USGS-centric.
    pub fn new(overlay_defs: &[&OverlayDef]) -> Self {
        let basemaps = default_basemaps();
        let mut control = LayerControl::new(&basemaps);
        let overlays = overlay_defs
            .iter()
            .map(|def| {
                control.register_overlay(def.name, def.visible);
                Overlay::new(def)
            })
            .collect();

        Self {
            title: DEFAULT_TITLE.to_string(),
            center: [37.1, -95.7],
            zoom: 4,
            basemaps,
            overlays,
            control,
            legend: build_legend(DEPTH_BANDS),
        }
    }

    pub fn overlay(&self, name: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == name)
    }

    /// Style every feature of `collection` with `styler` and append it to the
    /// named overlay. Features without geometry, and non-point features on a
    /// point overlay, are skipped. Returns the number added.
    pub fn add_overlay_features(
        &mut self,
        name: &str,
        collection: FeatureCollection,
        styler: &dyn FeatureStyler,
    ) -> Result<usize, ControlError> {
        let overlay = self
            .overlays
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| ControlError::UnknownOverlay(name.to_string()))?;

        let mut added = 0;
        for feature in collection.features {
            if feature.geometry.is_none() {
                debug!("{}: feature has no geometry, skipping", name);
                continue;
            }
            if overlay.kind == OverlayKind::Points && !feature.is_point() {
                debug!("{}: non-point feature on point overlay, skipping", name);
                continue;
            }
            overlay.features.push(StyledFeature::new(feature, styler));
            added += 1;
        }
        Ok(added)
    }

    /// Render the complete Leaflet page.
    pub fn render_html(&self) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            "const map = L.map(\"map\", {{ center: {}, zoom: {} }});\n\n",
            json!(self.center),
            self.zoom
        ));

        script.push_str("const baseMaps = {};\n");
        for basemap in &self.basemaps {
            let name = json!(basemap.name).to_string();
            script.push_str(&fill_template(
                BASEMAP_SCRIPT,
                &[
                    ("name", name.as_str()),
                    ("url", json!(basemap.url_template).to_string().as_str()),
                    (
                        "attribution",
                        json_for_script(&json!(basemap.attribution).to_string()).as_str(),
                    ),
                ],
            ));
            if Some(basemap.name) == self.control.active_basemap() {
                script.push_str(&format!("baseMaps[{}].addTo(map);\n", name));
            }
        }

        script.push_str("\nconst overlays = {};\n");
        for overlay in &self.overlays {
            let name = json!(overlay.name).to_string();
            let template = match overlay.kind {
                OverlayKind::Points => POINT_OVERLAY_SCRIPT,
                OverlayKind::Lines => LINE_OVERLAY_SCRIPT,
            };
            script.push_str(&fill_template(
                template,
                &[
                    ("name", name.as_str()),
                    ("data", json_for_script(&overlay.to_geojson().to_string()).as_str()),
                ],
            ));
            if self.control.is_overlay_visible(overlay.name) {
                script.push_str(&format!("overlays[{}].addTo(map);\n", name));
            }
        }

        script.push_str("\nL.control.layers(baseMaps, overlays).addTo(map);\n");

        let legend_html = json_for_script(&json!(render_legend_html(&self.legend)).to_string());
        script.push_str(&fill_template(LEGEND_SCRIPT, &[("legend", legend_html.as_str())]));

        fill_template(
            PAGE_HTML,
            &[
                ("title", escape_html(&self.title).as_str()),
                ("leaflet", LEAFLET_VERSION),
                ("css", LEGEND_CSS),
                ("render_key", RENDER_KEY),
                ("script", script.as_str()),
            ],
        )
    }
}

const BASEMAP_SCRIPT: &str = r#"baseMaps[{{name}}] = L.tileLayer({{url}}, { attribution: {{attribution}} });
"#;

const POINT_OVERLAY_SCRIPT: &str = r#"overlays[{{name}}] = L.geoJSON({{data}}, {
  pointToLayer: (feature, latlng) => L.circleMarker(latlng, renderData(feature).style),
  onEachFeature: bindPopup
});
"#;

const LINE_OVERLAY_SCRIPT: &str = r#"overlays[{{name}}] = L.geoJSON({{data}}, {
  style: (feature) => renderData(feature).style,
  onEachFeature: bindPopup
});
"#;

const LEGEND_SCRIPT: &str = r#"
const legend = L.control({ position: "bottomright" });
legend.onAdd = function () {
  const div = L.DomUtil.create("div");
  div.innerHTML = {{legend}};
  return div.firstChild;
};
legend.addTo(map);
"#;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{{leaflet}}/dist/leaflet.css" crossorigin="">
  <script src="https://unpkg.com/leaflet@{{leaflet}}/dist/leaflet.js" crossorigin=""></script>
  <style>
    html, body, #map { height: 100%; margin: 0; }
{{css}}  </style>
</head>
<body>
  <div id="map"></div>
  <script>
function renderData(feature) {
  return (feature.properties && feature.properties["{{render_key}}"]) || {};
}

function bindPopup(feature, layer) {
  const popup = renderData(feature).popup;
  if (popup) {
    layer.bindPopup(popup);
  }
}

{{script}}  </script>
</body>
</html>
"#;
