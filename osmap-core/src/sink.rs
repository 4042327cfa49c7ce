//! Collaborators that present workflow results to the user.
//!
//! Both sinks belong to the host's UI context and are only called from the
//! task driving the workflow.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{MapView, Polyline, ResponseKind};

/// Receives data shaped for the map widget.
pub trait DisplaySink {
    /// Apply the initial centre and zoom limits.
    fn configure_view(&mut self, view: &MapView);

    /// Draw a route as a connected line, points in `(lat, lon)` order.
    fn show_polyline(&mut self, polyline: &Polyline);

    /// Add the overlay backed by the downloaded document at `document`.
    fn show_tile_overlay(&mut self, document: &Utf8Path);
}

/// Receives short, transient messages for the user.
pub trait NotificationSink {
    /// Show `notification`.
    fn notify(&mut self, notification: Notification);
}

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal progress.
    Info,
    /// Something the user asked for did not happen.
    Error,
}

/// Message produced by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A route was drawn.
    RouteReady { algorithm: String, points: usize },
    /// The service answered but found no path.
    NoRouteFound { algorithm: String },
    /// The map-data document was stored and is usable offline.
    MapDataReady,
    /// No stored map-data document exists.
    OfflineMapUnavailable,
    /// The request was skipped because the device is offline.
    ConnectivityUnavailable,
    /// The request failed before producing a usable payload.
    FetchFailed { kind: ResponseKind, reason: String },
    /// The document arrived but could not be stored.
    StorageFailed { path: Utf8PathBuf, reason: String },
}

impl Notification {
    /// Severity of this message.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::RouteReady { .. } | Self::MapDataReady => Severity::Info,
            Self::NoRouteFound { .. }
            | Self::OfflineMapUnavailable
            | Self::ConnectivityUnavailable
            | Self::FetchFailed { .. }
            | Self::StorageFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouteReady { algorithm, points } => {
                write!(f, "route ready ({algorithm}, {points} points)")
            }
            Self::NoRouteFound { algorithm } => write!(f, "no route found ({algorithm})"),
            Self::MapDataReady => f.write_str("map downloaded and ready for offline use"),
            Self::OfflineMapUnavailable => f.write_str("offline map is not available"),
            Self::ConnectivityUnavailable => f.write_str("no internet connection"),
            Self::FetchFailed { kind, reason } => write!(f, "error downloading {kind}: {reason}"),
            Self::StorageFailed { path, reason } => {
                write!(f, "could not save map data to {path}: {reason}")
            }
        }
    }
}
