//! Core domain types for the osmap map client.
//!
//! The crate models the requests a map screen sends, the payloads it gets
//! back, and the single workflow that turns those payloads into display and
//! notification calls. Transport, storage and the operating system's network
//! state sit behind traits so hosts and tests can supply their own.
#![forbid(unsafe_code)]

pub mod connectivity;
pub mod coord;
pub mod map_data;
pub mod route;
pub mod screen;
pub mod service;
pub mod sink;
pub mod store;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use connectivity::{NetworkCapabilities, NetworkMonitor, NetworkStatus, is_internet_available};
pub use coord::{CoordinateError, LatLon};
pub use map_data::{DEFAULT_QUERY_RADIUS_M, DocumentSummary, MapDataQuery, MapDocument, MapView};
pub use route::{Algorithm, Polyline, RouteRequest, RouteRequestError, RouteResponse};
pub use screen::{MapLifecycle, Screen};
pub use service::{FetchError, MapService};
pub use sink::{DisplaySink, Notification, NotificationSink, Severity};
pub use store::{MAP_DATA_FILE_NAME, OfflineStore, StoreError};
pub use workflow::{Collaborators, FetchMode, FetchPlan, FetchWorkflow, Outcome, ResponseKind};
