//! Marker registry mirroring the stop selection onto a map display.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{CameraSettings, Stop, StopName};
use crate::ports::MapDisplay;

/// Owns the map display and the handle of every marker it has placed.
///
/// A handle exists for a stop exactly when that stop is selected.
pub struct MarkerSync<M: MapDisplay> {
    display: M,
    registry: HashMap<StopName, M::Handle>,
}

impl<M: MapDisplay> MarkerSync<M> {
    /// Wrap a map display with an empty registry.
    #[must_use]
    pub fn new(display: M) -> Self {
        Self {
            display,
            registry: HashMap::new(),
        }
    }

    /// Reflect a selection change. Placing is skipped when a marker already exists.
    pub fn on_toggle(&mut self, stop: &Stop, selected: bool) {
        if selected {
            if !self.registry.contains_key(&stop.name) {
                let handle = self.display.place_marker(stop.position, &stop.name.0);
                debug!(stop = %stop.name, "marker placed");
                self.registry.insert(stop.name.clone(), handle);
            }
        } else {
            self.remove(&stop.name);
        }
    }

    /// Drop the marker of a delivered stop whatever its selection state was.
    pub fn on_delivered(&mut self, stop: &Stop) {
        self.remove(&stop.name);
    }

    /// Remove every marker from the display.
    pub fn clear(&mut self) {
        for (name, handle) in self.registry.drain() {
            self.display.remove_marker(handle);
            debug!(stop = %name, "marker removed");
        }
    }

    /// Move the display camera.
    pub fn center(&mut self, camera: CameraSettings) {
        self.display.center_camera(camera.center, camera.zoom);
    }

    /// Whether a marker is placed for the named stop.
    #[must_use]
    pub fn has_marker(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Number of placed markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no marker is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The wrapped display.
    #[must_use]
    pub fn display(&self) -> &M {
        &self.display
    }

    /// The wrapped display, mutably. Markers must not be touched through it.
    pub fn display_mut(&mut self) -> &mut M {
        &mut self.display
    }

    fn remove(&mut self, name: &StopName) {
        if let Some(handle) = self.registry.remove(name) {
            self.display.remove_marker(handle);
            debug!(stop = %name, "marker removed");
        }
    }
}
