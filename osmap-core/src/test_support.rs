//! Test doubles for the workflow collaborators.
//!
//! None of these touch the network or the filesystem; they record what the
//! workflow asked of them so tests can assert on it afterwards.

use std::cell::{Cell, RefCell};
use std::future::Future;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};

use crate::{
    DisplaySink, DocumentSummary, FetchError, MAP_DATA_FILE_NAME, MapDataQuery, MapDocument,
    MapLifecycle, MapService, MapView, NetworkCapabilities, NetworkMonitor, NetworkStatus,
    Notification, NotificationSink, OfflineStore, Polyline, RouteRequest, RouteResponse,
    StoreError,
};

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics when the runtime cannot be built.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(future),
        Err(err) => panic!("failed to build test runtime: {err}"),
    }
}

#[derive(Debug, Clone)]
enum StubReply<T> {
    Value(T),
    Error(FetchError),
    Pending,
}

impl<T: Clone> StubReply<T> {
    async fn resolve(&self) -> Result<T, FetchError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Error(error) => Err(error.clone()),
            Self::Pending => std::future::pending().await,
        }
    }
}

fn unconfigured(what: &str) -> FetchError {
    FetchError::Network {
        url: format!("stub://{what}"),
        message: "stub reply not configured".to_owned(),
    }
}

/// Stub [`MapService`] returning pre-configured replies.
///
/// Requests fail with a network error until a reply is configured. Call
/// counters let tests assert that no request was issued.
#[derive(Debug)]
pub struct StubMapService {
    route: StubReply<RouteResponse>,
    document: StubReply<MapDocument>,
    route_calls: Cell<usize>,
    map_data_calls: Cell<usize>,
    last_request: RefCell<Option<RouteRequest>>,
}

impl Default for StubMapService {
    fn default() -> Self {
        Self::new()
    }
}

impl StubMapService {
    /// A service whose requests fail until configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            route: StubReply::Error(unconfigured("route")),
            document: StubReply::Error(unconfigured("map-data")),
            route_calls: Cell::new(0),
            map_data_calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    /// Answer route requests with `response`.
    #[must_use]
    pub fn with_route(mut self, response: RouteResponse) -> Self {
        self.route = StubReply::Value(response);
        self
    }

    /// Fail route requests with `error`.
    #[must_use]
    pub fn with_route_error(mut self, error: FetchError) -> Self {
        self.route = StubReply::Error(error);
        self
    }

    /// Answer map-data requests with `body` and an empty summary.
    #[must_use]
    pub fn with_document_body(mut self, body: &[u8]) -> Self {
        self.document = StubReply::Value(MapDocument::new(
            body.to_vec(),
            DocumentSummary::default(),
        ));
        self
    }

    /// Fail map-data requests with `error`.
    #[must_use]
    pub fn with_document_error(mut self, error: FetchError) -> Self {
        self.document = StubReply::Error(error);
        self
    }

    /// Never complete any request.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.route = StubReply::Pending;
        self.document = StubReply::Pending;
        self
    }

    /// Number of route requests issued.
    pub fn route_calls(&self) -> usize {
        self.route_calls.get()
    }

    /// Number of map-data requests issued.
    pub fn map_data_calls(&self) -> usize {
        self.map_data_calls.get()
    }

    /// The most recent route request.
    pub fn last_route_request(&self) -> Option<RouteRequest> {
        self.last_request.borrow().clone()
    }
}

#[async_trait(?Send)]
impl MapService for StubMapService {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, FetchError> {
        self.route_calls.set(self.route_calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());
        self.route.resolve().await
    }

    async fn fetch_map_data(&self, _query: &MapDataQuery) -> Result<MapDocument, FetchError> {
        self.map_data_calls.set(self.map_data_calls.get() + 1);
        self.document.resolve().await
    }
}

/// [`NetworkMonitor`] reporting a fixed status.
#[derive(Debug, Clone)]
pub struct StaticMonitor(Option<NetworkStatus>);

impl StaticMonitor {
    /// An interface with the internet capability.
    #[must_use]
    pub fn online() -> Self {
        Self(Some(NetworkStatus::Capabilities(NetworkCapabilities {
            interface: Some("wlan0".to_owned()),
            internet: true,
        })))
    }

    /// No active network at all.
    #[must_use]
    pub const fn offline() -> Self {
        Self(None)
    }

    /// A legacy connection-state report.
    #[must_use]
    pub const fn legacy(connected: bool) -> Self {
        Self(Some(NetworkStatus::Legacy { connected }))
    }
}

impl NetworkMonitor for StaticMonitor {
    fn active_network(&self) -> Option<NetworkStatus> {
        self.0.clone()
    }
}

/// In-memory [`OfflineStore`].
#[derive(Debug)]
pub struct MemoryStore {
    location: Utf8PathBuf,
    document: RefCell<Option<Vec<u8>>>,
    fail_writes: bool,
    writes: Cell<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            location: Utf8PathBuf::from(MAP_DATA_FILE_NAME),
            document: RefCell::new(None),
            fail_writes: false,
            writes: Cell::new(0),
        }
    }
}

impl MemoryStore {
    /// A store already holding `body`.
    #[must_use]
    pub fn with_document(body: &[u8]) -> Self {
        let store = Self::default();
        *store.document.borrow_mut() = Some(body.to_vec());
        store
    }

    /// A store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Current document contents.
    pub fn document(&self) -> Option<Vec<u8>> {
        self.document.borrow().clone()
    }

    /// Number of write attempts.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl OfflineStore for MemoryStore {
    fn location(&self) -> &Utf8Path {
        &self.location
    }

    fn has_document(&self) -> Result<bool, StoreError> {
        Ok(self.document.borrow().is_some())
    }

    fn replace(&self, body: &[u8]) -> Result<u64, StoreError> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes {
            return Err(StoreError::Write {
                path: self.location.clone(),
                source: std::io::Error::other("storage full"),
            });
        }
        *self.document.borrow_mut() = Some(body.to_vec());
        u64::try_from(body.len()).map_err(|err| StoreError::Write {
            path: self.location.clone(),
            source: std::io::Error::other(err),
        })
    }
}

/// [`DisplaySink`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    /// Views applied, in order.
    pub views: Vec<MapView>,
    /// Polylines drawn, in order.
    pub polylines: Vec<Polyline>,
    /// Overlay documents added, in order.
    pub overlays: Vec<Utf8PathBuf>,
}

impl RecordingDisplay {
    /// Whether anything beyond the view configuration was displayed.
    pub fn displayed_anything(&self) -> bool {
        !self.polylines.is_empty() || !self.overlays.is_empty()
    }
}

impl DisplaySink for RecordingDisplay {
    fn configure_view(&mut self, view: &MapView) {
        self.views.push(*view);
    }

    fn show_polyline(&mut self, polyline: &Polyline) {
        self.polylines.push(polyline.clone());
    }

    fn show_tile_overlay(&mut self, document: &Utf8Path) {
        self.overlays.push(document.to_path_buf());
    }
}

/// [`NotificationSink`] that records every notification.
#[derive(Debug, Default)]
pub struct RecordingNotifications {
    /// Notifications received, in order.
    pub received: Vec<Notification>,
}

impl NotificationSink for RecordingNotifications {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

/// [`MapLifecycle`] that records hook names.
#[derive(Debug, Default)]
pub struct RecordingLifecycle {
    /// Hooks called, in order.
    pub events: Vec<&'static str>,
}

impl MapLifecycle for RecordingLifecycle {
    fn resume(&mut self) {
        self.events.push("resume");
    }

    fn pause(&mut self) {
        self.events.push("pause");
    }

    fn detach(&mut self) {
        self.events.push("detach");
    }
}
