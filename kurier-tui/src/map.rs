use std::collections::BTreeMap;

use kurier_core::{model::Coordinate, ports::MapDisplay};

/// Handle of a marker on the terminal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MarkerId(u64);

#[derive(Debug, Clone)]
pub(crate) struct PlacedMarker {
    pub position: Coordinate,
    pub label: String,
}

/// Map display drawn with the ratatui canvas.
#[derive(Debug)]
pub(crate) struct TerminalMap {
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_id: u64,
    center: Coordinate,
    zoom: f32,
}

impl TerminalMap {
    const MIN_ZOOM: f32 = 0.0;
    const MAX_ZOOM: f32 = 18.0;

    pub(crate) fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
            next_id: 0,
            center: Coordinate::new(0.0, 0.0),
            zoom: Self::MIN_ZOOM,
        }
    }

    pub(crate) fn markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.values()
    }

    pub(crate) fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    pub(crate) fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Visible `[west, east]` and `[south, north]` bounds for the current camera.
    ///
    /// One zoom step halves the visible longitude span, starting from the whole
    /// world at zoom 0. Terminal cells are about twice as tall as wide, so the
    /// latitude span is half the longitude span.
    pub(crate) fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let lng_span = 360.0 / 2f64.powf(f64::from(self.zoom));
        let lat_span = (lng_span / 2.0).min(180.0);
        let Coordinate { lat, lng } = self.center;
        (
            [lng - lng_span / 2.0, lng + lng_span / 2.0],
            [lat - lat_span / 2.0, lat + lat_span / 2.0],
        )
    }
}

impl MapDisplay for TerminalMap {
    type Handle = MarkerId;

    fn place_marker(&mut self, position: Coordinate, label: &str) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                position,
                label: label.to_owned(),
            },
        );
        id
    }

    fn remove_marker(&mut self, handle: MarkerId) {
        self.markers.remove(&handle);
    }

    fn center_camera(&mut self, position: Coordinate, zoom: f32) {
        self.center = position;
        self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}
