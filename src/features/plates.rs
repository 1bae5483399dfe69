use super::{OverlayDef, OverlayKind};
use crate::style::PlateStyler;

/// Bird (2003) PB2002 plate boundary model as GeoJSON
pub const PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

pub const TECTONIC_PLATES: OverlayDef = OverlayDef {
    name: "Tectonic Plates",
    default_source: PLATES_URL,
    kind: OverlayKind::Lines,
    styler: &PlateStyler,
    visible: true,
};
