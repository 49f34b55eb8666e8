use std::sync::Arc;

use kurier_core::{
    error::CourierError,
    model::StopName,
    route::NavigationRequest,
    service::{LoadOutcome, StopListController},
};
use kurier_provider_location::PermissionGate;
use tracing::{info, warn};

use crate::map::TerminalMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prompt {
    /// Ask whether kurier may read the current position.
    LocationPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Busy,
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct Status {
    pub kind: StatusKind,
    pub text: String,
}

pub(crate) struct App {
    pub controller: StopListController<TerminalMap>,
    pub permission: Arc<PermissionGate>,

    pub cursor: usize,
    pub list_visible: bool,
    pub prompt: Option<Prompt>,
    pub status: Option<Status>,

    pub open_links: bool,
    pub last_link: Option<String>,
}

impl App {
    pub(crate) fn new(
        controller: StopListController<TerminalMap>,
        permission: Arc<PermissionGate>,
        open_links: bool,
    ) -> Self {
        Self {
            controller,
            permission,
            cursor: 0,
            list_visible: true,
            prompt: None,
            status: None,
            open_links,
            last_link: None,
        }
    }

    pub(crate) fn notify(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    pub(crate) fn report(&mut self, err: &CourierError) {
        self.notify(StatusKind::Error, err.to_string());
    }

    pub(crate) fn report_load(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded {
                count,
                skipped,
                duplicates,
            } => {
                let mut text = format!("Loaded {count} stops");
                if !skipped.is_empty() {
                    text = format!("{text}, skipped {} malformed", skipped.len());
                }
                if !duplicates.is_empty() {
                    text = format!("{text}, ignored {} duplicate names", duplicates.len());
                }
                self.notify(StatusKind::Info, text);
            }
            LoadOutcome::Failed(err) => {
                self.notify(StatusKind::Error, format!("No stops loaded: {err}"));
            }
        }
        self.clamp_cursor();
    }

    pub(crate) fn current_stop_name(&self) -> Option<StopName> {
        self.controller
            .store()
            .stops()
            .get(self.cursor)
            .map(|stop| stop.name.clone())
    }

    pub(crate) fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.controller.store().len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn toggle_current(&mut self) {
        let Some(name) = self.current_stop_name() else {
            return;
        };
        if let Err(err) = self.controller.toggle(&name.0) {
            self.report(&err);
        }
    }

    /// Move the stop under the cursor one place up or down, keeping the cursor on it.
    pub(crate) fn shift_current(&mut self, up: bool) {
        let from = self.cursor;
        let to = if up {
            from.saturating_sub(1)
        } else {
            from + 1
        };
        if from == to {
            return;
        }
        match self.controller.reorder(from, to) {
            Ok(()) => self.cursor = to,
            Err(err) => self.report(&err),
        }
    }

    pub(crate) fn deliver_current(&mut self) {
        let Some(name) = self.current_stop_name() else {
            self.notify(StatusKind::Error, "No stop to mark as delivered");
            return;
        };
        match self.controller.mark_delivered(&name.0) {
            Ok(delivery) => {
                let at = delivery
                    .delivered_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M");
                self.notify(
                    StatusKind::Info,
                    format!("Delivered: {} at {at}", delivery.stop.name),
                );
            }
            Err(err) => self.report(&err),
        }
        self.clamp_cursor();
    }

    pub(crate) fn toggle_list(&mut self) {
        self.list_visible = !self.list_visible;
    }

    pub(crate) fn answer_permission(&mut self, granted: bool) {
        self.prompt = None;
        if granted {
            self.permission.grant();
            self.notify(
                StatusKind::Info,
                "Location access granted, press n to navigate",
            );
        } else {
            self.notify(StatusKind::Error, "Location access denied");
        }
    }

    /// Flip location access without waiting for a navigation attempt.
    pub(crate) fn toggle_permission(&mut self) {
        if self.permission.is_granted() {
            self.permission.revoke();
            self.notify(StatusKind::Info, "Location access revoked");
        } else {
            self.permission.grant();
            self.notify(StatusKind::Info, "Location access granted");
        }
    }

    /// Finish a navigation: remember the link and open it in the maps app.
    pub(crate) fn hand_off(&mut self, request: &NavigationRequest) {
        let uri = request.directions_uri();
        let summary = format!(
            "Route to {} via {} stops",
            request.destination.name,
            request.waypoints.len()
        );
        self.last_link = Some(uri.clone());

        if !self.open_links {
            self.notify(StatusKind::Info, format!("{summary}: {uri}"));
            return;
        }

        match open::that_detached(&uri) {
            Ok(()) => {
                info!(%uri, "directions handed off");
                self.notify(StatusKind::Info, format!("{summary} opened"));
            }
            Err(err) => {
                warn!(%uri, error = %err, "cannot open directions link");
                self.notify(
                    StatusKind::Error,
                    format!("Cannot open maps ({err}), open this link: {uri}"),
                );
            }
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.controller.store().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use kurier_core::model::{CameraSettings, Coordinate};
    use kurier_provider_location::FixedLocationPort;

    use super::*;

    pub(crate) fn app_with_stops() -> App {
        let gate = Arc::new(PermissionGate::new(
            Arc::new(FixedLocationPort::new(Coordinate::new(52.2, 21.0))),
            false,
        ));
        let mut controller = StopListController::new(
            TerminalMap::new(),
            Arc::<PermissionGate>::clone(&gate),
            CameraSettings::default(),
        );
        let outcome = controller.load_asset(
            r#"[
                {"name": "Warsaw Center", "lat": 52.23, "lng": 21.01},
                {"name": "Praga", "lat": 52.25, "lng": 21.04},
                {"name": "Wola", "lat": 52.24, "lng": 20.98}
            ]"#,
        );
        let mut app = App::new(controller, gate, false);
        app.report_load(&outcome);
        app
    }

    fn names(app: &App) -> Vec<String> {
        app.controller
            .store()
            .stops()
            .iter()
            .map(|stop| stop.name.0.clone())
            .collect()
    }

    #[test]
    fn shifting_moves_stop_and_cursor() {
        let mut app = app_with_stops();

        app.shift_current(false);
        assert_eq!(names(&app), ["Praga", "Warsaw Center", "Wola"]);
        assert_eq!(app.cursor, 1);

        app.shift_current(true);
        app.shift_current(true);
        assert_eq!(names(&app), ["Warsaw Center", "Praga", "Wola"]);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn shifting_past_the_end_reports_error() {
        let mut app = app_with_stops();
        app.cursor = 2;

        app.shift_current(false);

        assert_eq!(app.cursor, 2);
        let status = app.status.expect("error shown");
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[test]
    fn delivering_last_row_keeps_cursor_in_range() {
        let mut app = app_with_stops();
        app.cursor = 2;
        app.toggle_current();
        assert_eq!(app.controller.markers().display().markers().count(), 1);

        app.deliver_current();

        assert_eq!(app.cursor, 1);
        assert_eq!(names(&app), ["Warsaw Center", "Praga"]);
        assert_eq!(app.controller.markers().display().markers().count(), 0);
        let status = app.status.expect("delivery confirmed");
        assert!(status.text.starts_with("Delivered: Wola"));
    }

    #[test]
    fn hand_off_without_opening_shows_link() {
        let mut app = app_with_stops();
        app.toggle_current();
        let request = kurier_core::route::build_route(
            &app.controller.selected_ordered(),
            Some(Coordinate::new(52.2, 21.0)),
        )
        .expect("origin known")
        .expect("stop selected");

        app.hand_off(&request);

        let link = app.last_link.clone().expect("link kept");
        assert!(link.ends_with("&destination=52.23,21.01"));
        let status = app.status.expect("link shown");
        assert!(status.text.contains(&link));
    }

    #[test]
    fn granting_permission_opens_the_gate() {
        let mut app = app_with_stops();
        app.prompt = Some(Prompt::LocationPermission);

        app.answer_permission(true);

        assert!(app.prompt.is_none());
        assert!(app.permission.is_granted());
    }

    #[test]
    fn toggling_permission_revokes_and_grants() {
        let mut app = app_with_stops();
        app.permission.grant();

        app.toggle_permission();
        assert!(!app.permission.is_granted());

        app.toggle_permission();
        assert!(app.permission.is_granted());
        let status = app.status.expect("change shown");
        assert_eq!(status.text, "Location access granted");
    }
}
