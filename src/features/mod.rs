mod earthquakes;
mod plates;

pub use earthquakes::EARTHQUAKES;
pub use plates::TECTONIC_PLATES;

use crate::style::FeatureStyler;

/// How an overlay's features are drawn on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Point features drawn as circle markers
    Points,
    /// Line and polygon features drawn as paths
    Lines,
}

/// Declarative overlay definition — everything needed to add a toggleable data layer
pub struct OverlayDef {
    /// Name shown in the layer control
    pub name: &'static str,
    /// Feed loaded when no source is given on the command line
    pub default_source: &'static str,
    pub kind: OverlayKind,
    pub styler: &'static dyn FeatureStyler,
    /// Whether the overlay starts switched on
    pub visible: bool,
}

pub fn all_overlays() -> &'static [&'static OverlayDef] {
    &[&EARTHQUAKES, &TECTONIC_PLATES]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn overlay_names_are_unique() {
        let names: HashSet<&str> = all_overlays().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), all_overlays().len());
    }

    #[test]
    fn default_sources_are_https() {
        for def in all_overlays() {
            assert!(def.default_source.starts_with("https://"), "{}", def.name);
        }
    }
}
