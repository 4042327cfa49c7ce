//! `reqwest`-backed [`MapService`].

use async_trait::async_trait;
use osmap_core::{FetchError, MapDataQuery, MapDocument, MapService, RouteRequest, RouteResponse};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::config::MapServiceConfig;
use super::overpass::inspect_document;

const ROUTE_PATH: &str = "map_route";
const INTERPRETER_PATH: &str = "api/interpreter";

/// Error type for [`HttpMapService`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// HTTP client for the route service and the Overpass interpreter.
///
/// Each call issues exactly one request. Nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct HttpMapService {
    client: Client,
    config: MapServiceConfig,
}

impl HttpMapService {
    /// Create a service with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: MapServiceConfig) -> Result<Self, ClientBuildError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// The configuration this service was built with.
    #[must_use]
    pub const fn config(&self) -> &MapServiceConfig {
        &self.config
    }

    /// `{route_base_url}/map_route`.
    fn route_url(&self) -> Result<Url, FetchError> {
        let raw = join_base(&self.config.route_base_url, ROUTE_PATH);
        Url::parse(&raw).map_err(|err| FetchError::InvalidEndpoint {
            url: raw,
            message: err.to_string(),
        })
    }

    /// `{overpass_base_url}/api/interpreter?data=<query>`.
    fn map_data_url(&self, query: &MapDataQuery) -> Result<Url, FetchError> {
        let raw = join_base(&self.config.overpass_base_url, INTERPRETER_PATH);
        Url::parse_with_params(&raw, &[("data", query.as_str())]).map_err(|err| {
            FetchError::InvalidEndpoint {
                url: raw,
                message: err.to_string(),
            }
        })
    }
}

fn join_base(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

/// Convert a reqwest error to a [`FetchError`].
///
/// Payloads are decoded here rather than by reqwest, so any other failure,
/// including a body cut short mid-download, is a transport error.
fn convert_reqwest_error(error: &reqwest::Error, url: &Url) -> FetchError {
    let url = url.as_str().to_owned();
    if error.is_timeout() {
        return FetchError::Timeout { url };
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            url,
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .map_or_else(|| error.to_string(), str::to_owned),
        };
    }

    FetchError::Network {
        url,
        message: error.to_string(),
    }
}

/// Decode a route service response body.
fn decode_route_body(body: &[u8], url: &Url) -> Result<RouteResponse, FetchError> {
    serde_json::from_slice(body).map_err(|err| FetchError::Decode {
        url: url.as_str().to_owned(),
        message: err.to_string(),
    })
}

/// Check an Overpass body and wrap it with its summary.
fn decode_map_body(body: Vec<u8>, url: &Url) -> Result<MapDocument, FetchError> {
    let summary = inspect_document(&body).map_err(|err| FetchError::Decode {
        url: url.as_str().to_owned(),
        message: err.to_string(),
    })?;
    Ok(MapDocument::new(body, summary))
}

#[async_trait(?Send)]
impl MapService for HttpMapService {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, FetchError> {
        let url = self.route_url()?;
        log::debug!("POST {url}");

        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url))?;

        decode_route_body(&body, &url)
    }

    async fn fetch_map_data(&self, query: &MapDataQuery) -> Result<MapDocument, FetchError> {
        let url = self.map_data_url(query)?;
        log::debug!("GET {}", join_base(&self.config.overpass_base_url, INTERPRETER_PATH));

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url))?;

        decode_map_body(body.to_vec(), &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmap_core::LatLon;
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> HttpMapService {
        HttpMapService::with_config(
            MapServiceConfig::new()
                .with_route_base_url("http://routes.example.com/")
                .with_overpass_base_url("http://overpass.example.com"),
        )
        .expect("service should build")
    }

    #[rstest]
    fn route_url_strips_trailing_slash(service: HttpMapService) {
        let url = service.route_url().expect("route url");

        assert_eq!(url.as_str(), "http://routes.example.com/map_route");
    }

    #[rstest]
    fn map_data_url_encodes_query(service: HttpMapService) {
        let centre = LatLon::new(17.8111683, -97.7810027).expect("valid centre");
        let query = MapDataQuery::highways_and_buildings(centre, 500);

        let url = service.map_data_url(&query).expect("map-data url");

        assert_eq!(url.path(), "/api/interpreter");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "data");
        assert_eq!(pairs[0].1, query.as_str());
    }

    #[rstest]
    fn unparsable_base_url_is_invalid_endpoint() {
        let service = HttpMapService::with_config(
            MapServiceConfig::new().with_route_base_url("not a url"),
        )
        .expect("service should build");

        let err = service.route_url().expect_err("should fail");

        match err {
            FetchError::InvalidEndpoint { url, .. } => assert_eq!(url, "not a url/map_route"),
            other => panic!("expected InvalidEndpoint, got {other:?}"),
        }
    }

    #[rstest]
    fn decode_route_body_keeps_wire_order(service: HttpMapService) {
        let url = service.route_url().expect("route url");
        let body = br#"{"algorithm":"busqueda_bidireccional","ruta":[[-97.77,17.75],[-97.74,17.80]]}"#;

        let response = decode_route_body(body, &url).expect("should decode");

        assert_eq!(response.algorithm, "busqueda_bidireccional");
        assert_eq!(response.ruta, Some(vec![[-97.77, 17.75], [-97.74, 17.80]]));
    }

    #[rstest]
    fn decode_route_body_accepts_missing_ruta(service: HttpMapService) {
        let url = service.route_url().expect("route url");

        let response = decode_route_body(br#"{"algorithm":"a*"}"#, &url).expect("should decode");

        assert_eq!(response.ruta, None);
    }

    #[rstest]
    #[case::not_json(b"<html/>".as_slice())]
    #[case::missing_algorithm(br#"{"ruta":[]}"#.as_slice())]
    #[case::wrong_shape(br#"{"algorithm":"a*","ruta":[[1.0]]}"#.as_slice())]
    fn decode_route_body_rejects_bad_payloads(service: HttpMapService, #[case] body: &[u8]) {
        let url = service.route_url().expect("route url");

        let err = decode_route_body(body, &url).expect_err("should fail");

        assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
    }

    #[rstest]
    fn decode_map_body_rejects_remark(service: HttpMapService) {
        let query = MapDataQuery::new("node(1);out;");
        let url = service.map_data_url(&query).expect("map-data url");
        let body = br#"<osm><remark>runtime error: out of memory</remark></osm>"#.to_vec();

        let err = decode_map_body(body, &url).expect_err("should fail");

        match err {
            FetchError::Decode { message, .. } => assert!(message.contains("out of memory")),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[rstest]
    fn decode_map_body_keeps_bytes(service: HttpMapService) {
        let query = MapDataQuery::new("node(1);out;");
        let url = service.map_data_url(&query).expect("map-data url");
        let body = br#"<osm version="0.6"><node id="1" lat="0" lon="0"/></osm>"#.to_vec();

        let document = decode_map_body(body.clone(), &url).expect("should decode");

        assert_eq!(document.body(), body.as_slice());
        assert_eq!(document.summary().nodes, 1);
    }
}
