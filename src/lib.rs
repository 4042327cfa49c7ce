//! Facade crate for the osmap map client.
//!
//! This crate re-exports the core domain types and, behind the default
//! `http` feature, the HTTP service client, the filesystem-backed offline
//! store and the operating-system network monitor.

#![forbid(unsafe_code)]

pub use osmap_core::{
    Algorithm, Collaborators, CoordinateError, DisplaySink, FetchError, FetchMode, FetchPlan,
    FetchWorkflow, LatLon, MapDataQuery, MapDocument, MapLifecycle, MapService, MapView,
    NetworkMonitor, NetworkStatus, Notification, NotificationSink, OfflineStore, Outcome,
    Polyline, ResponseKind, RouteRequest, RouteResponse, Screen, StoreError,
    is_internet_available,
};

#[cfg(feature = "http")]
pub use osmap_data::{
    ClientBuildError, FileMapStore, HttpMapService, MapServiceConfig, SystemNetworkMonitor,
};
