//! Behavioural coverage for the fetch workflow.

use crate::test_support::{
    MemoryStore, RecordingDisplay, RecordingNotifications, StaticMonitor, StubMapService,
    block_on_for_tests,
};
use crate::{
    Algorithm, Collaborators, FetchError, FetchMode, FetchPlan, FetchWorkflow, LatLon,
    MapDataQuery, Notification, OfflineStore, Outcome, ResponseKind, RouteRequest, RouteResponse,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, path::PathBuf};
use tokio_util::sync::CancellationToken;

const DOCUMENT: &[u8] = b"<osm version=\"0.6\"><node id=\"1\" lat=\"0\" lon=\"0\"/></osm>";

#[derive(Debug, Default)]
struct WorkflowContext {
    service: RefCell<StubMapService>,
    monitor: RefCell<Option<StaticMonitor>>,
    store: RefCell<MemoryStore>,
    display: RefCell<RecordingDisplay>,
    notifications: RefCell<RecordingNotifications>,
    outcome: RefCell<Option<Outcome>>,
}

impl WorkflowContext {
    fn configure_service(&self, configure: impl FnOnce(StubMapService) -> StubMapService) {
        let service = self.service.take();
        *self.service.borrow_mut() = configure(service);
    }

    fn run(&self, mode: FetchMode, plan: FetchPlan) {
        let monitor = self
            .monitor
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("connectivity must be configured"));
        let service = self.service.borrow();
        let store = self.store.borrow();
        let mut display = self.display.borrow_mut();
        let mut notifications = self.notifications.borrow_mut();
        let mut collaborators = Collaborators {
            network: &monitor,
            service: &*service,
            store: &*store,
            display: &mut *display,
            notifications: &mut *notifications,
        };
        let workflow = FetchWorkflow::new(mode, plan);
        let outcome = block_on_for_tests(workflow.run(&mut collaborators, &CancellationToken::new()));
        *self.outcome.borrow_mut() = Some(outcome);
    }
}

#[fixture]
fn workflow_context() -> WorkflowContext {
    WorkflowContext::default()
}

fn route_plan() -> FetchPlan {
    let start = LatLon::new(17.749_129_9, -97.769_06);
    let end = LatLon::new(17.877_179_9, -97.732_929_3);
    let algorithm = Algorithm::new("busqueda_bidireccional");
    match (start, end, algorithm) {
        (Ok(start), Ok(end), Ok(algorithm)) => FetchPlan::RoutePolyline {
            request: RouteRequest::new(start, end, algorithm),
        },
        _ => panic!("route fixture must be valid"),
    }
}

fn tile_plan() -> FetchPlan {
    FetchPlan::TileDocument {
        query: MapDataQuery::new("[out:xml];node(1);out;"),
    }
}

#[given("a route service answering with a two-point path")]
fn two_point_route(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.configure_service(|service| {
        service.with_route(RouteResponse {
            algorithm: "busqueda_bidireccional".to_owned(),
            ruta: Some(vec![[-97.77, 17.75], [-97.74, 17.80]]),
        })
    });
}

#[given("a route service answering with an empty path")]
fn empty_route(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.configure_service(|service| {
        service.with_route(RouteResponse {
            algorithm: "busqueda_bidireccional".to_owned(),
            ruta: Some(Vec::new()),
        })
    });
}

#[given("a map-data service failing with status 500")]
fn failing_map_data(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.configure_service(|service| {
        service.with_document_error(FetchError::Http {
            url: "https://overpass-api.de/api/interpreter".to_owned(),
            status: 500,
            message: "Internal Server Error".to_owned(),
        })
    });
}

#[given("a map-data service answering with a document")]
fn answering_map_data(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.configure_service(|service| service.with_document_body(DOCUMENT));
}

#[given("a previously stored map-data document")]
fn stored_document(#[from(workflow_context)] ctx: &WorkflowContext) {
    *ctx.store.borrow_mut() = MemoryStore::with_document(DOCUMENT);
}

#[given("the device is online")]
fn device_online(#[from(workflow_context)] ctx: &WorkflowContext) {
    *ctx.monitor.borrow_mut() = Some(StaticMonitor::online());
}

#[given("the device is offline")]
fn device_offline(#[from(workflow_context)] ctx: &WorkflowContext) {
    *ctx.monitor.borrow_mut() = Some(StaticMonitor::offline());
}

#[when("the route workflow runs in offline-first mode")]
fn run_route_offline_first(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.run(FetchMode::OfflineFirst, route_plan());
}

#[when("the map-data workflow runs in always-fetch mode")]
fn run_map_data_always(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.run(FetchMode::AlwaysFetch, tile_plan());
}

#[when("the map-data workflow runs in offline-first mode")]
fn run_map_data_offline_first(#[from(workflow_context)] ctx: &WorkflowContext) {
    ctx.run(FetchMode::OfflineFirst, tile_plan());
}

#[then("a two-point polyline is displayed in latitude-longitude order")]
fn polyline_displayed(#[from(workflow_context)] ctx: &WorkflowContext) {
    let display = ctx.display.borrow();
    let [polyline] = display.polylines.as_slice() else {
        panic!("expected one polyline, got {:?}", display.polylines);
    };
    let pairs: Vec<[f64; 2]> = polyline.points().iter().map(LatLon::to_lat_lon).collect();
    assert_eq!(pairs, vec![[17.75, -97.77], [17.80, -97.74]]);
}

#[then("a route ready notification is shown")]
fn route_ready(#[from(workflow_context)] ctx: &WorkflowContext) {
    assert!(matches!(
        ctx.notifications.borrow().received.as_slice(),
        [Notification::RouteReady { points: 2, .. }]
    ));
}

#[then("nothing is displayed")]
fn nothing_displayed(#[from(workflow_context)] ctx: &WorkflowContext) {
    assert!(!ctx.display.borrow().displayed_anything());
}

#[then("a no route found notification is shown")]
fn no_route_found(#[from(workflow_context)] ctx: &WorkflowContext) {
    assert!(matches!(
        ctx.notifications.borrow().received.as_slice(),
        [Notification::NoRouteFound { .. }]
    ));
    assert!(matches!(
        ctx.outcome.borrow().as_ref(),
        Some(Outcome::NoRouteFound)
    ));
}

#[then("a download failure notification is shown")]
fn download_failure(#[from(workflow_context)] ctx: &WorkflowContext) {
    let notifications = ctx.notifications.borrow();
    let [notification] = notifications.received.as_slice() else {
        panic!("expected one notification, got {:?}", notifications.received);
    };
    assert!(matches!(
        notification,
        Notification::FetchFailed {
            kind: ResponseKind::TileDocument,
            ..
        }
    ));
    assert!(notification.to_string().contains("500"));
}

#[then("the offline store is untouched")]
fn store_untouched(#[from(workflow_context)] ctx: &WorkflowContext) {
    let store = ctx.store.borrow();
    assert_eq!(store.writes(), 0);
    assert_eq!(store.document(), None);
}

#[then("the stored document matches the response body")]
fn stored_matches(#[from(workflow_context)] ctx: &WorkflowContext) {
    assert_eq!(ctx.store.borrow().document().as_deref(), Some(DOCUMENT));
}

#[then("the tile overlay is displayed")]
fn overlay_displayed(#[from(workflow_context)] ctx: &WorkflowContext) {
    let location = ctx.store.borrow().location().to_path_buf();
    assert_eq!(ctx.display.borrow().overlays, vec![location]);
}

#[then("no request is issued")]
fn no_request(#[from(workflow_context)] ctx: &WorkflowContext) {
    let service = ctx.service.borrow();
    assert_eq!(service.route_calls() + service.map_data_calls(), 0);
}

#[then("a connectivity notification is shown")]
fn connectivity_notice(#[from(workflow_context)] ctx: &WorkflowContext) {
    assert_eq!(
        ctx.notifications.borrow().received,
        vec![Notification::ConnectivityUnavailable]
    );
    assert!(matches!(ctx.outcome.borrow().as_ref(), Some(Outcome::Offline)));
}

macro_rules! register_scenario {
    ($name:ident, $index:literal) => {
        #[scenario(path = "tests/features/fetch_workflow.feature", index = $index)]
        fn $name(#[from(workflow_context)] context: WorkflowContext) {
            let _ = context;
        }
    };
}

register_scenario!(drawing_a_route_returned_by_the_service, 0);
register_scenario!(reporting_an_empty_route, 1);
register_scenario!(reporting_a_map_data_server_error, 2);
register_scenario!(storing_downloaded_map_data, 3);
register_scenario!(showing_stored_map_data_while_offline, 4);
register_scenario!(skipping_the_route_request_while_offline, 5);

#[test]
fn scenario_indices_follow_feature_order() {
    let feature_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/fetch_workflow.feature");
    let contents = match fs::read_to_string(&feature_path) {
        Ok(data) => data,
        Err(err) => panic!("failed to read feature file {feature_path:?}: {err}"),
    };
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles,
        [
            "drawing a route returned by the service",
            "reporting an empty route",
            "reporting a map-data server error",
            "storing downloaded map data",
            "showing stored map data while offline",
            "skipping the route request while offline",
        ]
    );
}
