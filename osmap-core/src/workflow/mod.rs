//! The map screen's fetch-and-display workflow.
//!
//! A [`FetchWorkflow`] is configured once with a [`FetchMode`] and a
//! [`FetchPlan`]; the plan fixes the [`ResponseKind`]. Running it performs at
//! most one request and reports the result through the display and
//! notification sinks. Failures never escape as errors: every path ends in an
//! [`Outcome`] and, unless cancelled, a notification.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::{
    DisplaySink, FetchError, MapDataQuery, MapService, MapView, NetworkMonitor, Notification,
    NotificationSink, OfflineStore, RouteRequest, StoreError, connectivity::is_internet_available,
    coord::CoordinateError,
};

/// Whether the connectivity check gates the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Check connectivity first; fall back to stored content when offline.
    OfflineFirst,
    /// Issue the request regardless of reported connectivity.
    AlwaysFetch,
}

/// Shape of the payload the workflow expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// An Overpass document persisted and shown as an overlay.
    TileDocument,
    /// A route drawn as a polyline.
    RoutePolyline,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileDocument => f.write_str("map data"),
            Self::RoutePolyline => f.write_str("route"),
        }
    }
}

/// The request a workflow issues.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    /// Download map data for offline display.
    TileDocument {
        /// Overpass query sent to the interpreter endpoint.
        query: MapDataQuery,
    },
    /// Request a route between two points.
    RoutePolyline {
        /// Route request posted to the route endpoint.
        request: RouteRequest,
    },
}

impl FetchPlan {
    /// The response kind this plan produces.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::TileDocument { .. } => ResponseKind::TileDocument,
            Self::RoutePolyline { .. } => ResponseKind::RoutePolyline,
        }
    }
}

/// Everything a workflow run talks to.
pub struct Collaborators<'a> {
    /// Connectivity source consulted in [`FetchMode::OfflineFirst`].
    pub network: &'a dyn NetworkMonitor,
    /// Remote route and map-data service.
    pub service: &'a dyn MapService,
    /// Storage for the downloaded map-data document.
    pub store: &'a dyn OfflineStore,
    /// Map widget adapter.
    pub display: &'a mut dyn DisplaySink,
    /// User-visible message surface.
    pub notifications: &'a mut dyn NotificationSink,
}

/// How a workflow run ended.
#[derive(Debug)]
pub enum Outcome {
    /// A route was drawn with `points` points.
    RouteDisplayed { points: usize },
    /// The route service found no path.
    NoRouteFound,
    /// The route contained a point outside valid coordinate ranges.
    RouteRejected(CoordinateError),
    /// A fresh document was stored; `overlay_shown` tells whether the overlay
    /// was added afterwards.
    MapDataStored { bytes: u64, overlay_shown: bool },
    /// Offline: the previously stored document was shown.
    OfflineMapShown,
    /// Offline and nothing stored yet.
    OfflineMapUnavailable,
    /// Offline with a plan that needs the network.
    Offline,
    /// The request failed.
    FetchFailed(FetchError),
    /// The document could not be stored.
    StorageFailed(StoreError),
    /// The run was cancelled before it could touch the sinks.
    Cancelled,
}

impl Outcome {
    /// Whether the user got what the plan asked for.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::RouteDisplayed { .. }
                | Self::MapDataStored {
                    overlay_shown: true,
                    ..
                }
                | Self::OfflineMapShown
        )
    }
}

/// One configurable fetch-and-display workflow.
///
/// # Examples
///
/// ```
/// use osmap_core::{FetchMode, FetchPlan, FetchWorkflow, MapDataQuery, ResponseKind};
///
/// let workflow = FetchWorkflow::new(
///     FetchMode::OfflineFirst,
///     FetchPlan::TileDocument {
///         query: MapDataQuery::new("[out:xml];node(1);out;"),
///     },
/// );
/// assert_eq!(workflow.plan().kind(), ResponseKind::TileDocument);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetchWorkflow {
    mode: FetchMode,
    plan: FetchPlan,
    view: MapView,
}

impl FetchWorkflow {
    /// Configure a workflow with the default map view.
    #[must_use]
    pub fn new(mode: FetchMode, plan: FetchPlan) -> Self {
        Self {
            mode,
            plan,
            view: MapView::default(),
        }
    }

    /// Replace the map view applied at the start of each run.
    #[must_use]
    pub const fn with_view(mut self, view: MapView) -> Self {
        self.view = view;
        self
    }

    /// Connectivity gating mode.
    #[must_use]
    pub const fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Request issued by each run.
    #[must_use]
    pub const fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Map view applied at the start of each run.
    #[must_use]
    pub const fn view(&self) -> &MapView {
        &self.view
    }

    /// Run the workflow once.
    ///
    /// The request races `cancel`; a cancelled run returns
    /// [`Outcome::Cancelled`] without touching the store or either sink
    /// after the initial view configuration.
    pub async fn run(
        &self,
        collaborators: &mut Collaborators<'_>,
        cancel: &CancellationToken,
    ) -> Outcome {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        collaborators.display.configure_view(&self.view);

        if self.mode == FetchMode::OfflineFirst && !is_internet_available(collaborators.network) {
            log::debug!("offline, skipping {} request", self.plan.kind());
            return self.run_offline(collaborators);
        }

        match &self.plan {
            FetchPlan::TileDocument { query } => {
                download_document(query, collaborators, cancel).await
            }
            FetchPlan::RoutePolyline { request } => fetch_route(request, collaborators, cancel).await,
        }
    }

    fn run_offline(&self, collaborators: &mut Collaborators<'_>) -> Outcome {
        match self.plan {
            FetchPlan::TileDocument { .. } => {
                if show_stored_document(collaborators) {
                    Outcome::OfflineMapShown
                } else {
                    Outcome::OfflineMapUnavailable
                }
            }
            FetchPlan::RoutePolyline { .. } => {
                collaborators
                    .notifications
                    .notify(Notification::ConnectivityUnavailable);
                Outcome::Offline
            }
        }
    }
}

async fn fetch_route(
    request: &RouteRequest,
    collaborators: &mut Collaborators<'_>,
    cancel: &CancellationToken,
) -> Outcome {
    log::debug!(
        "requesting route {} -> {} ({})",
        request.start(),
        request.end(),
        request.algorithm().as_ref()
    );
    let result = match cancel
        .run_until_cancelled(collaborators.service.fetch_route(request))
        .await
    {
        Some(result) if !cancel.is_cancelled() => result,
        _ => return Outcome::Cancelled,
    };

    let response = match result {
        Ok(response) => response,
        Err(error) => return report_fetch_failure(ResponseKind::RoutePolyline, error, collaborators),
    };

    match response.polyline() {
        Ok(Some(polyline)) => {
            let points = polyline.len();
            collaborators.display.show_polyline(&polyline);
            collaborators.notifications.notify(Notification::RouteReady {
                algorithm: response.algorithm,
                points,
            });
            Outcome::RouteDisplayed { points }
        }
        Ok(None) => {
            collaborators.notifications.notify(Notification::NoRouteFound {
                algorithm: response.algorithm,
            });
            Outcome::NoRouteFound
        }
        Err(error) => {
            log::warn!("route response contained an invalid point: {error}");
            collaborators.notifications.notify(Notification::FetchFailed {
                kind: ResponseKind::RoutePolyline,
                reason: error.to_string(),
            });
            Outcome::RouteRejected(error)
        }
    }
}

async fn download_document(
    query: &MapDataQuery,
    collaborators: &mut Collaborators<'_>,
    cancel: &CancellationToken,
) -> Outcome {
    let result = match cancel
        .run_until_cancelled(collaborators.service.fetch_map_data(query))
        .await
    {
        Some(result) if !cancel.is_cancelled() => result,
        _ => return Outcome::Cancelled,
    };

    let document = match result {
        Ok(document) => document,
        Err(error) => return report_fetch_failure(ResponseKind::TileDocument, error, collaborators),
    };

    let bytes = match collaborators.store.replace(document.body()) {
        Ok(bytes) => bytes,
        Err(error) => {
            log::warn!("{error}");
            collaborators.notifications.notify(Notification::StorageFailed {
                path: collaborators.store.location().to_path_buf(),
                reason: error.to_string(),
            });
            return Outcome::StorageFailed(error);
        }
    };
    let summary = document.summary();
    log::info!(
        "stored {bytes} bytes of map data at {} ({} nodes, {} ways, {} relations)",
        collaborators.store.location(),
        summary.nodes,
        summary.ways,
        summary.relations
    );

    let overlay_shown = show_stored_document(collaborators);
    collaborators
        .notifications
        .notify(Notification::MapDataReady);
    Outcome::MapDataStored {
        bytes,
        overlay_shown,
    }
}

/// Add the overlay when a stored document exists, otherwise tell the user.
fn show_stored_document(collaborators: &mut Collaborators<'_>) -> bool {
    let available = collaborators.store.has_document().unwrap_or_else(|error| {
        log::warn!("treating map data as unavailable: {error}");
        false
    });
    if available {
        collaborators
            .display
            .show_tile_overlay(collaborators.store.location());
    } else {
        collaborators
            .notifications
            .notify(Notification::OfflineMapUnavailable);
    }
    available
}

fn report_fetch_failure(
    kind: ResponseKind,
    error: FetchError,
    collaborators: &mut Collaborators<'_>,
) -> Outcome {
    log::warn!("{kind} request failed: {error}");
    collaborators.notifications.notify(Notification::FetchFailed {
        kind,
        reason: error.to_string(),
    });
    Outcome::FetchFailed(error)
}
