use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::feature::FeatureCollection;
use crate::features::OverlayDef;
use crate::util;

pub type FeedError = Box<dyn Error + Send + Sync>;

/// Where a GeoJSON feed is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` sources are fetched, anything else is read as a local path.
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSource::Url(source.to_string())
        } else {
            FeedSource::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn create_client(timeout: Duration) -> Result<reqwest::Client, FeedError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fetch and decode one feed. No retry: a single request either succeeds or errors.
pub async fn load_feed(
    client: &reqwest::Client,
    source: &FeedSource,
) -> Result<FeatureCollection, FeedError> {
    match source {
        FeedSource::Url(url) => {
            debug!("GET {}", url);
            let collection = client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<FeatureCollection>()
                .await?;
            Ok(collection)
        }
        FeedSource::File(path) => {
            debug!("Reading {}", path.display());
            let text = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// Load the feed for one overlay, logging failures and falling back to an
/// empty collection so the rest of the map still renders.
pub async fn load_overlay_feed(
    client: &reqwest::Client,
    def: &OverlayDef,
    source: &FeedSource,
    pb: &ProgressBar,
) -> FeatureCollection {
    let name = util::source_name(&source.to_string());
    let collection = match load_feed(client, source).await {
        Ok(collection) => {
            if collection.is_empty() {
                warn!("{}: {} contained no usable features", def.name, name);
            }
            info!(
                "{}: loaded {} features from {}",
                def.name,
                collection.len(),
                name
            );
            collection
        }
        Err(e) => {
            warn!(
                "{}: failed to load {} ({}), overlay will be empty",
                def.name, source, e
            );
            FeatureCollection::default()
        }
    };
    pb.inc(1);
    collection
}

/// Load both feeds concurrently; neither waits on the other.
pub async fn load_feeds(
    client: &reqwest::Client,
    earthquakes: (&OverlayDef, &FeedSource),
    plates: (&OverlayDef, &FeedSource),
    pb: &ProgressBar,
) -> (FeatureCollection, FeatureCollection) {
    tokio::join!(
        load_overlay_feed(client, earthquakes.0, earthquakes.1, pb),
        load_overlay_feed(client, plates.0, plates.1, pb),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{EARTHQUAKES, TECTONIC_PLATES};
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quake_body() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"mag": 5.0, "place": "Deep one"},
                "geometry": {"type": "Point", "coordinates": [140.0, 35.0, 95.0]}
            }]
        })
    }

    fn client() -> reqwest::Client {
        create_client(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn parses_sources() {
        assert_eq!(
            FeedSource::parse("https://example.com/a.geojson"),
            FeedSource::Url("https://example.com/a.geojson".into())
        );
        assert_eq!(
            FeedSource::parse("HTTP://example.com/a.geojson"),
            FeedSource::Url("HTTP://example.com/a.geojson".into())
        );
        assert_eq!(
            FeedSource::parse("data/quakes.geojson"),
            FeedSource::File(PathBuf::from("data/quakes.geojson"))
        );
    }

    #[tokio::test]
    async fn loads_feed_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all_week.geojson"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quake_body()))
            .mount(&server)
            .await;

        let source = FeedSource::Url(format!("{}/all_week.geojson", server.uri()));
        let fc = load_feed(&client(), &source).await.unwrap();

        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].depth(), Some(95.0));
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = FeedSource::Url(format!("{}/plates.json", server.uri()));
        assert!(load_feed(&client(), &source).await.is_err());
    }

    #[tokio::test]
    async fn loads_feed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", quake_body()).unwrap();

        let source = FeedSource::File(file.path().to_path_buf());
        let fc = load_feed(&client(), &source).await.unwrap();
        assert_eq!(fc.features[0].magnitude(), Some(5.0));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not geojson").unwrap();

        let source = FeedSource::File(file.path().to_path_buf());
        assert!(load_feed(&client(), &source).await.is_err());
    }

    #[tokio::test]
    async fn plate_failure_leaves_earthquakes_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quakes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quake_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/plates"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let quakes = FeedSource::Url(format!("{}/quakes", server.uri()));
        let plates = FeedSource::Url(format!("{}/plates", server.uri()));
        let pb = ProgressBar::hidden();

        let (quake_fc, plate_fc) = load_feeds(
            &client(),
            (&EARTHQUAKES, &quakes),
            (&TECTONIC_PLATES, &plates),
            &pb,
        )
        .await;

        assert_eq!(quake_fc.len(), 1);
        assert!(plate_fc.is_empty());
        assert_eq!(pb.position(), 2);
    }

    #[tokio::test]
    async fn missing_file_gives_empty_overlay() {
        let source = FeedSource::File(PathBuf::from("/nonexistent/quakemap/plates.json"));
        let fc = load_overlay_feed(&client(), &TECTONIC_PLATES, &source, &ProgressBar::hidden())
            .await;
        assert!(fc.is_empty());
    }
}
