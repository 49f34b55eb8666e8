//! Stop list controller: markers, deliveries, and navigation lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use kurier_core::{
    CameraSettings, Coordinate, CourierError, LoadOutcome, LocationPort, MapDisplay, PortError,
    PositionFailure, ResolvedPosition, StopListController,
};

/// Map display that keeps placed markers in memory.
#[derive(Default)]
struct RecordingMap {
    next: u32,
    markers: BTreeMap<u32, (Coordinate, String)>,
    removed: Vec<u32>,
    camera: Option<(Coordinate, f32)>,
}

impl RecordingMap {
    fn labels(&self) -> Vec<&str> {
        self.markers.values().map(|(_, label)| label.as_str()).collect()
    }
}

impl MapDisplay for RecordingMap {
    type Handle = u32;

    fn place_marker(&mut self, position: Coordinate, label: &str) -> u32 {
        self.next += 1;
        self.markers.insert(self.next, (position, label.to_owned()));
        self.next
    }

    fn remove_marker(&mut self, handle: u32) {
        assert!(
            self.markers.remove(&handle).is_some(),
            "removed a marker that was never placed"
        );
        self.removed.push(handle);
    }

    fn center_camera(&mut self, position: Coordinate, zoom: f32) {
        self.camera = Some((position, zoom));
    }
}

enum Answer {
    At(Coordinate),
    NoFix,
    Denied,
}

struct StubLocation(Answer);

#[async_trait]
impl LocationPort for StubLocation {
    fn name(&self) -> &str {
        "stub"
    }

    async fn current_position(&self) -> Result<Option<Coordinate>, PortError> {
        match self.0 {
            Answer::At(position) => Ok(Some(position)),
            Answer::NoFix => Ok(None),
            Answer::Denied => Err(PortError::PermissionDenied),
        }
    }
}

const HERE: Coordinate = Coordinate::new(52.2, 21.0);

const WARSAW: &str = r#"[
    {"name": "Warsaw Center", "lat": 52.23, "lng": 21.01},
    {"name": "Praga", "lat": 52.25, "lng": 21.04}
]"#;

fn controller_with(answer: Answer) -> StopListController<RecordingMap> {
    let mut controller = StopListController::new(
        RecordingMap::default(),
        Arc::new(StubLocation(answer)),
        CameraSettings::default(),
    );
    let outcome = controller.load_asset(WARSAW);
    assert!(matches!(outcome, LoadOutcome::Loaded { count: 2, .. }));
    controller
}

fn controller() -> StopListController<RecordingMap> {
    controller_with(Answer::At(HERE))
}

#[test]
fn camera_starts_at_configured_centre() {
    let controller = controller();
    let (centre, zoom) = controller.markers().display().camera.expect("camera set");
    assert_eq!(centre, Coordinate::new(52.2297, 21.0122));
    assert!((zoom - 12.0).abs() < f32::EPSILON);
}

#[test]
fn warsaw_scenario() {
    let mut controller = controller();

    controller
        .set_selected("Warsaw Center", true)
        .expect("stop exists");
    assert_eq!(controller.markers().display().labels(), ["Warsaw Center"]);

    controller
        .set_selected("Warsaw Center", true)
        .expect("stop exists");
    assert_eq!(controller.markers().len(), 1);
    assert_eq!(controller.markers().display().markers.len(), 1);

    let delivery = controller
        .mark_delivered("Warsaw Center")
        .expect("stop exists");
    assert_eq!(delivery.stop.name.0, "Warsaw Center");
    assert!(controller.markers().is_empty());
    assert!(controller.markers().display().markers.is_empty());

    let names = controller
        .store()
        .stops()
        .iter()
        .map(|stop| stop.name.0.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Praga"]);
}

#[test]
fn toggle_places_and_removes_marker() {
    let mut controller = controller();

    assert!(controller.toggle("Praga").expect("stop exists"));
    assert!(controller.markers().has_marker("Praga"));
    let (position, label) = controller
        .markers()
        .display()
        .markers
        .values()
        .next()
        .cloned()
        .expect("one marker");
    assert_eq!(position, Coordinate::new(52.25, 21.04));
    assert_eq!(label, "Praga");

    assert!(!controller.toggle("Praga").expect("stop exists"));
    assert!(!controller.markers().has_marker("Praga"));
    assert_eq!(controller.markers().display().removed.len(), 1);
}

#[test]
fn unknown_stop_touches_no_marker() {
    let mut controller = controller();

    let err = controller.toggle("Wola").expect_err("unknown");
    assert!(matches!(err, CourierError::NotFound(_)));
    let err = controller.mark_delivered("Wola").expect_err("unknown");
    assert!(matches!(err, CourierError::NotFound(_)));
    assert!(controller.markers().display().markers.is_empty());
}

#[test]
fn reorder_does_not_touch_markers() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");

    controller.reorder(1, 0).expect("valid indices");

    assert_eq!(controller.markers().len(), 1);
    assert!(controller.markers().display().removed.is_empty());
    let err = controller.reorder(0, 7).expect_err("out of range");
    assert!(matches!(err, CourierError::OutOfRange { index: 7, len: 2 }));
}

#[test]
fn delivering_selected_stop_clears_one_entry_each() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");
    controller.toggle("Warsaw Center").expect("stop exists");

    controller.mark_delivered("Praga").expect("stop exists");

    assert_eq!(controller.store().selected_len(), 1);
    assert_eq!(controller.markers().len(), 1);
    assert_eq!(controller.markers().display().labels(), ["Warsaw Center"]);
    assert_eq!(controller.deliveries().len(), 1);

    let err = controller.mark_delivered("Praga").expect_err("already gone");
    assert!(matches!(err, CourierError::NotFound(_)));
    assert_eq!(controller.deliveries().len(), 1);
}

#[test]
fn reload_clears_markers() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");

    controller.load_asset(WARSAW);

    assert!(controller.markers().is_empty());
    assert!(controller.markers().display().markers.is_empty());
    assert_eq!(controller.store().selected_len(), 0);
}

#[test]
fn broken_asset_is_reported_and_leaves_empty_list() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");

    let outcome = controller.load_asset("not json");

    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    assert!(controller.store().is_empty());
    assert!(controller.markers().display().markers.is_empty());
}

#[test]
fn partial_asset_reports_skips_and_duplicates() {
    let mut controller = controller();

    let outcome = controller.load_asset(
        r#"[
            {"name": "A", "lat": 1.0, "lng": 2.0},
            {"name": "B"},
            {"name": "A", "lat": 3.0, "lng": 4.0}
        ]"#,
    );

    match outcome {
        LoadOutcome::Loaded {
            count,
            skipped,
            duplicates,
        } => {
            assert_eq!(count, 1);
            assert_eq!(skipped.len(), 1);
            assert_eq!(skipped[0].index, 1);
            assert_eq!(duplicates.len(), 1);
            assert_eq!(duplicates[0].0, "A");
        }
        LoadOutcome::Failed(err) => panic!("load failed: {err}"),
    }
}

#[test]
fn nothing_selected_requests_no_navigation() {
    let mut controller = controller();
    assert!(controller.request_navigation().is_none());
    assert!(!controller.is_navigation_pending());
}

#[tokio::test]
async fn navigate_uses_list_order_of_selection() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");
    controller.toggle("Warsaw Center").expect("stop exists");

    let request = controller
        .navigate()
        .await
        .expect("position known")
        .expect("stops selected");

    assert_eq!(request.origin, HERE);
    assert_eq!(request.destination.name.0, "Praga");
    assert_eq!(request.waypoints.len(), 1);
    assert_eq!(request.waypoints[0].name.0, "Warsaw Center");
    assert!(!controller.is_navigation_pending());
}

#[tokio::test]
async fn navigate_without_fix_is_position_unavailable() {
    let mut controller = controller_with(Answer::NoFix);
    controller.toggle("Praga").expect("stop exists");

    let err = controller.navigate().await.expect_err("no fix");
    assert!(matches!(
        err,
        CourierError::PositionUnavailable(PositionFailure::NoFix)
    ));
    assert!(!err.is_permission_denied());
}

#[tokio::test]
async fn navigate_with_denied_permission_is_flagged() {
    let mut controller = controller_with(Answer::Denied);
    controller.toggle("Praga").expect("stop exists");

    let err = controller.navigate().await.expect_err("denied");
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn newer_request_makes_older_answer_stale() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");

    let first = controller.request_navigation().expect("stop selected");
    let second = controller.request_navigation().expect("stop selected");
    assert_ne!(first.id(), second.id());

    let stale = first.resolve().await;
    let err = controller.complete_navigation(stale).expect_err("superseded");
    assert!(matches!(err, CourierError::StaleLookup));
    assert!(controller.is_navigation_pending());

    let fresh = second.resolve().await;
    let request = controller
        .complete_navigation(fresh)
        .expect("current lookup")
        .expect("stop selected");
    assert_eq!(request.destination.name.0, "Praga");
}

#[test]
fn selection_change_makes_pending_answer_stale() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");
    let lookup = controller.request_navigation().expect("stop selected");

    controller.toggle("Warsaw Center").expect("stop exists");
    assert!(!controller.is_navigation_pending());

    let late = ResolvedPosition {
        id: lookup.id(),
        outcome: Ok(Some(HERE)),
    };
    let err = controller.complete_navigation(late).expect_err("selection changed");
    assert!(matches!(err, CourierError::StaleLookup));
}

#[test]
fn delivery_makes_pending_answer_stale() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");
    let lookup = controller.request_navigation().expect("stop selected");

    controller.mark_delivered("Warsaw Center").expect("stop exists");

    let late = ResolvedPosition {
        id: lookup.id(),
        outcome: Ok(Some(HERE)),
    };
    assert!(matches!(
        controller.complete_navigation(late),
        Err(CourierError::StaleLookup)
    ));
}

#[test]
fn provider_failure_is_position_unavailable() {
    let mut controller = controller();
    controller.toggle("Praga").expect("stop exists");
    let lookup = controller.request_navigation().expect("stop selected");

    let failed = ResolvedPosition {
        id: lookup.id(),
        outcome: Err(PortError::Provider("quota exceeded".into())),
    };
    let err = controller.complete_navigation(failed).expect_err("provider failed");
    assert!(matches!(
        err,
        CourierError::PositionUnavailable(PositionFailure::Provider(PortError::Provider(_)))
    ));
    assert!(!controller.is_navigation_pending());
}
