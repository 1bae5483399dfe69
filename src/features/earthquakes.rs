use super::{OverlayDef, OverlayKind};
use crate::style::QuakeStyler;

/// USGS summary feed: every earthquake of the past seven days
pub const EARTHQUAKES_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

pub const EARTHQUAKES: OverlayDef = OverlayDef {
    name: "Earthquakes",
    default_source: EARTHQUAKES_URL,
    kind: OverlayKind::Points,
    styler: &QuakeStyler,
    visible: true,
};
