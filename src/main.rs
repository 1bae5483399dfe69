mod colors;
mod feature;
mod features;
mod feed;
mod legend;
mod map;
mod style;
mod util;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use feature::FeatureCollection;
use features::{EARTHQUAKES, OverlayDef, TECTONIC_PLATES};
use feed::FeedSource;
use map::{ControlError, MapView};

#[derive(Parser, Debug)]
#[command(version, about = "Render earthquake and tectonic plate feeds as a Leaflet web map")]
struct Args {
    /// Earthquake GeoJSON feed (http(s) URL or local file) [default: USGS weekly feed]
    #[arg(long, env = "QUAKEMAP_EARTHQUAKES")]
    earthquakes: Option<String>,

    /// Plate boundary GeoJSON feed (http(s) URL or local file) [default: PB2002 boundaries]
    #[arg(long, env = "QUAKEMAP_PLATES")]
    plates: Option<String>,

    /// Background selected when the page opens
    #[arg(long)]
    basemap: Option<String>,

    /// Overlay to start switched off (repeatable)
    #[arg(long = "hide-overlay", value_name = "NAME")]
    hide_overlays: Vec<String>,

    /// Write the HTML map to this path
    #[arg(long, default_value = "map.html")]
    output: PathBuf,

    /// Also write the styled earthquake GeoJSON to this path
    #[arg(long)]
    styled_output: Option<PathBuf>,

    /// Page title
    #[arg(long, default_value = map::DEFAULT_TITLE)]
    title: String,

    /// Per-request timeout for feed downloads
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Feed for an overlay: the command-line value if given, else the overlay's default.
fn feed_source(arg: Option<&str>, def: &OverlayDef) -> FeedSource {
    FeedSource::parse(arg.unwrap_or(def.default_source))
}

/// Apply the initial basemap and overlay visibility chosen on the command line.
fn apply_layer_choices(
    view: &mut MapView,
    basemap: Option<&str>,
    hidden: &[String],
) -> Result<(), ControlError> {
    if let Some(name) = basemap {
        view.control.select_basemap(name)?;
    }
    for name in hidden {
        view.control.set_overlay_visible(name, false)?;
    }
    Ok(())
}

/// Style a loaded feed into its overlay, logging how many features made it.
fn populate_overlay(view: &mut MapView, def: &OverlayDef, collection: FeatureCollection) {
    let total = collection.len();
    match view.add_overlay_features(def.name, collection, def.styler) {
        Ok(added) => {
            if added < total {
                warn!("{}: skipped {} of {} features", def.name, total - added, total);
            }
            info!("{}: {} features on map", def.name, added);
        }
        Err(e) => error!("Failed to populate {}: {}", def.name, e),
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let client = match feed::create_client(Duration::from_secs(args.timeout_secs)) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut view = MapView::new(features::all_overlays());
    view.title = args.title.clone();
    if let Err(e) = apply_layer_choices(&mut view, args.basemap.as_deref(), &args.hide_overlays) {
        error!("Invalid layer selection: {}", e);
        return ExitCode::FAILURE;
    }

    let quake_source = feed_source(args.earthquakes.as_deref(), &EARTHQUAKES);
    let plate_source = feed_source(args.plates.as_deref(), &TECTONIC_PLATES);
    info!("Earthquake feed: {}", quake_source);
    info!("Plate boundary feed: {}", plate_source);

    let pb = ProgressBar::new(features::all_overlays().len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message("Loading feeds");

    let (quakes, plates) = feed::load_feeds(
        &client,
        (&EARTHQUAKES, &quake_source),
        (&TECTONIC_PLATES, &plate_source),
        &pb,
    )
    .await;
    pb.finish_with_message("Feeds loaded");

    populate_overlay(&mut view, &EARTHQUAKES, quakes);
    populate_overlay(&mut view, &TECTONIC_PLATES, plates);

    if let Some(styled_path) = &args.styled_output {
        let styled = view
            .overlay(EARTHQUAKES.name)
            .map(|o| o.to_geojson())
            .unwrap_or_default();
        match serde_json::to_string_pretty(&styled) {
            Ok(json) => match write_output(styled_path, &json) {
                Ok(()) => info!("Wrote styled earthquakes to {:?}", styled_path),
                Err(e) => warn!("Failed to write {:?}: {}", styled_path, e),
            },
            Err(e) => warn!("Failed to serialize styled earthquakes: {}", e),
        }
    }

    let html = view.render_html();
    if let Err(e) = write_output(&args.output, &html) {
        error!("Failed to write map to {:?}: {}", args.output, e);
        return ExitCode::FAILURE;
    }
    info!("Wrote map to {:?}", args.output);

    ExitCode::SUCCESS
}
