use crate::colors::{DepthBand, DepthColour};

/// One row of the depth key: a colour swatch and its range label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub colour: DepthColour,
    pub label: String,
}

/// Build the legend rows for a band table.
///
/// Each band is labelled `lo–hi` with the next band's threshold as `hi`; the
/// last band has no upper bound and is labelled `lo+`.
pub fn build_legend(bands: &[DepthBand]) -> Vec<LegendEntry> {
    bands
        .iter()
        .enumerate()
        .map(|(i, band)| {
            let label = match bands.get(i + 1) {
                Some(next) => format!("{}\u{2013}{}", band.threshold, next.threshold),
                None => format!("{}+", band.threshold),
            };
            LegendEntry {
                colour: band.colour,
                label,
            }
        })
        .collect()
}

/// CSS for the legend panel, injected into the page head.
pub const LEGEND_CSS: &str = "\
.legend {\n    background: rgba(255, 255, 255, 0.85);\n    padding: 6px 8px;\n    border-radius: 5px;\n    line-height: 18px;\n    color: #555;\n}\n\
.legend i {\n    width: 18px;\n    height: 18px;\n    float: left;\n    margin-right: 8px;\n    opacity: 0.7;\n}\n";

/// Render the legend rows as the inner HTML of a Leaflet control.
pub fn render_legend_html(entries: &[LegendEntry]) -> String {
    let mut html = String::from("<div class=\"info legend\">");
    for entry in entries {
        html.push_str(&format!(
            "<i style=\"background:{}\"></i> {}<br>",
            entry.colour.css_name(),
            entry.label
        ));
    }
    html.push_str("</div>");
    html
}
