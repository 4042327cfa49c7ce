//! Map service trait shared by the HTTP client and test doubles.

use async_trait::async_trait;

use crate::{MapDataQuery, MapDocument, RouteRequest, RouteResponse};

use super::error::FetchError;

/// Issue route and map-data requests.
///
/// Futures are `?Send`: the workflow drives them on the host's
/// single-threaded context so completions land where the sinks live.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use osmap_core::{
///     DocumentSummary, FetchError, MapDataQuery, MapDocument, MapService, RouteRequest,
///     RouteResponse,
/// };
///
/// struct NoRoutes;
///
/// #[async_trait(?Send)]
/// impl MapService for NoRoutes {
///     async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, FetchError> {
///         Ok(RouteResponse {
///             algorithm: request.algorithm().as_ref().to_owned(),
///             ruta: None,
///         })
///     }
///
///     async fn fetch_map_data(&self, _query: &MapDataQuery) -> Result<MapDocument, FetchError> {
///         Ok(MapDocument::new(b"<osm/>".to_vec(), DocumentSummary::default()))
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait MapService {
    /// Request a route between the two points of `request`.
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, FetchError>;

    /// Download the map-data document selected by `query`.
    async fn fetch_map_data(&self, query: &MapDataQuery) -> Result<MapDocument, FetchError>;
}
