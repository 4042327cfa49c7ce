//! Terminal host for the fetch workflow.
//!
//! Display output goes to one writer (stdout) and notifications to another
//! (stderr), so piping the command output yields only coordinates or paths.

use std::io::Write;

use camino::Utf8Path;
use osmap_core::{
    Collaborators, DisplaySink, FetchWorkflow, MapLifecycle, MapService, MapView, NetworkMonitor,
    Notification, NotificationSink, OfflineStore, Outcome, Polyline, ResponseKind, Screen,
    Severity,
};

use crate::CliError;

/// Prints polylines as `lat,lon` lines and overlays as their path.
pub(crate) struct TerminalDisplay<'w> {
    out: &'w mut dyn Write,
}

impl<'w> TerminalDisplay<'w> {
    pub(crate) fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }
}

impl DisplaySink for TerminalDisplay<'_> {
    fn configure_view(&mut self, view: &MapView) {
        log::debug!(
            "map view centred on {} at zoom {} ({}-{})",
            view.centre,
            view.zoom,
            view.min_zoom,
            view.max_zoom
        );
    }

    fn show_polyline(&mut self, polyline: &Polyline) {
        for point in polyline.points() {
            if let Err(err) = writeln!(self.out, "{point}") {
                log::warn!("failed to print route point: {err}");
                return;
            }
        }
    }

    fn show_tile_overlay(&mut self, document: &Utf8Path) {
        if let Err(err) = writeln!(self.out, "{document}") {
            log::warn!("failed to print overlay path: {err}");
        }
    }
}

/// Prints notifications prefixed with their severity.
pub(crate) struct TerminalNotifications<'w> {
    err: &'w mut dyn Write,
}

impl<'w> TerminalNotifications<'w> {
    pub(crate) fn new(err: &'w mut dyn Write) -> Self {
        Self { err }
    }
}

impl NotificationSink for TerminalNotifications<'_> {
    fn notify(&mut self, notification: Notification) {
        let label = match notification.severity() {
            Severity::Info => "info",
            Severity::Error => "error",
        };
        if let Err(err) = writeln!(self.err, "{label}: {notification}") {
            log::warn!("failed to print notification: {err}");
        }
    }
}

/// There is no widget behind a terminal; lifecycle hooks are only logged.
struct HeadlessLifecycle;

impl MapLifecycle for HeadlessLifecycle {
    fn resume(&mut self) {
        log::debug!("screen resumed");
    }

    fn pause(&mut self) {
        log::debug!("screen paused");
    }

    fn detach(&mut self) {
        log::debug!("screen detached");
    }
}

/// Services a single workflow run talks to.
pub(crate) struct Services<'a> {
    pub(crate) network: &'a dyn NetworkMonitor,
    pub(crate) service: &'a dyn MapService,
    pub(crate) store: &'a dyn OfflineStore,
}

/// Run `workflow` once on a current-thread runtime and return its outcome.
pub(crate) fn drive(
    workflow: FetchWorkflow,
    services: &Services<'_>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let mut display = TerminalDisplay::new(out);
    let mut notifications = TerminalNotifications::new(err);
    let mut collaborators = Collaborators {
        network: services.network,
        service: services.service,
        store: services.store,
        display: &mut display,
        notifications: &mut notifications,
    };

    let screen = Screen::new(workflow, HeadlessLifecycle);
    screen.resume();
    let outcome = runtime.block_on(screen.load(&mut collaborators));
    screen.pause();
    screen.destroy();
    log::debug!("workflow finished: {outcome:?}");
    Ok(outcome)
}

/// Map a finished run onto the process result.
pub(crate) fn finish(kind: ResponseKind, outcome: &Outcome) -> Result<(), CliError> {
    if outcome.is_success() {
        Ok(())
    } else {
        Err(CliError::Unsuccessful { kind })
    }
}
