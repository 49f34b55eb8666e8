//! High-level controller combining the store, markers, and route building.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::asset::{self, AssetError, ParsedStops, SkippedRecord};
use crate::error::{CourierError, PositionFailure};
use crate::markers::MarkerSync;
use crate::model::{CameraSettings, Coordinate, Delivery, Stop, StopName};
use crate::ports::{LocationPort, MapDisplay, PortError};
use crate::route::{self, NavigationRequest};
use crate::store::PlaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Identifier of a position lookup issued for navigation.
pub struct LookupId(u64);

/// Pending request for the current position.
///
/// The lookup owns what it needs, so it can be awaited on another task while the
/// controller keeps handling user actions.
pub struct PositionLookup {
    id: LookupId,
    location: Arc<dyn LocationPort>,
}

impl PositionLookup {
    /// Identifier to hand back with the result.
    #[must_use]
    pub fn id(&self) -> LookupId {
        self.id
    }

    /// Ask the location provider once.
    pub async fn resolve(self) -> ResolvedPosition {
        let outcome = self.location.current_position().await;
        ResolvedPosition {
            id: self.id,
            outcome,
        }
    }
}

/// Answer of the location provider for one lookup.
#[derive(Debug)]
pub struct ResolvedPosition {
    /// Lookup this answers.
    pub id: LookupId,
    /// Position, no fix, or provider failure.
    pub outcome: Result<Option<Coordinate>, PortError>,
}

#[derive(Debug)]
/// Result of loading the stop asset.
pub enum LoadOutcome {
    /// Stops were loaded, possibly with some records left out.
    Loaded {
        /// Number of stops now in the list.
        count: usize,
        /// Records that did not decode.
        skipped: Vec<SkippedRecord>,
        /// Stops dropped because their name was already taken.
        duplicates: Vec<StopName>,
    },
    /// The asset could not be read; the list is empty.
    Failed(AssetError),
}

/// Applies user actions to the stop list and keeps the map markers in step.
pub struct StopListController<M: MapDisplay> {
    store: PlaceStore,
    markers: MarkerSync<M>,
    location: Arc<dyn LocationPort>,
    deliveries: Vec<Delivery>,
    pending: Option<LookupId>,
    next_lookup: u64,
}

impl<M: MapDisplay> StopListController<M> {
    /// Create a controller and move the map camera to its initial placement.
    #[must_use]
    pub fn new(display: M, location: Arc<dyn LocationPort>, camera: CameraSettings) -> Self {
        let mut markers = MarkerSync::new(display);
        markers.center(camera);
        Self {
            store: PlaceStore::new(),
            markers,
            location,
            deliveries: Vec::new(),
            pending: None,
            next_lookup: 0,
        }
    }

    /// Load stops from the JSON text of the asset.
    ///
    /// Failures never propagate; they are logged and reported in the outcome.
    pub fn load_asset(&mut self, source: &str) -> LoadOutcome {
        self.apply_parsed(asset::parse_stops(source))
    }

    /// Load stops from the asset file at `path`.
    pub fn load_asset_file(&mut self, path: &Path) -> LoadOutcome {
        self.apply_parsed(asset::read_stops(path))
    }

    /// Replace the stop list with already-built stops, returning rejected duplicates.
    pub fn load_stops<I>(&mut self, stops: I) -> Vec<Stop>
    where
        I: IntoIterator<Item = Stop>,
    {
        self.invalidate_lookup();
        self.markers.clear();
        self.store.load(stops)
    }

    /// Flip the selection of a stop and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] for an unknown stop.
    pub fn toggle(&mut self, name: &str) -> Result<bool, CourierError> {
        let selected = self.store.toggle(name)?;
        self.sync_marker(name, selected);
        Ok(selected)
    }

    /// Check or uncheck a stop. Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] for an unknown stop.
    pub fn set_selected(&mut self, name: &str, selected: bool) -> Result<bool, CourierError> {
        let changed = self.store.set_selected(name, selected)?;
        self.sync_marker(name, selected);
        Ok(changed)
    }

    /// Move a stop within the list. Markers are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::OutOfRange`] for an index outside the list.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CourierError> {
        self.store.reorder(from, to)?;
        if from != to {
            self.invalidate_lookup();
        }
        Ok(())
    }

    /// Remove a delivered stop together with its marker and record the delivery.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NotFound`] if the stop is not in the list.
    pub fn mark_delivered(&mut self, name: &str) -> Result<Delivery, CourierError> {
        let stop = self.store.remove_delivered(name)?;
        self.markers.on_delivered(&stop);
        self.invalidate_lookup();
        info!(stop = %stop.name, remaining = self.store.len(), "stop delivered");

        let delivery = Delivery {
            stop,
            delivered_at: Utc::now(),
        };
        self.deliveries.push(delivery.clone());
        Ok(delivery)
    }

    /// Checked stops in list order.
    #[must_use]
    pub fn selected_ordered(&self) -> Vec<Stop> {
        self.store.selected_ordered()
    }

    /// Start a navigation request by asking for the current position.
    ///
    /// Returns `None` when nothing is selected. A new request replaces any
    /// pending one, whose answer will then be rejected as stale.
    pub fn request_navigation(&mut self) -> Option<PositionLookup> {
        if self.store.selected_len() == 0 {
            return None;
        }
        let id = LookupId(self.next_lookup);
        self.next_lookup += 1;
        if let Some(previous) = self.pending.replace(id) {
            debug!(?previous, "replacing pending position lookup");
        }
        Some(PositionLookup {
            id,
            location: Arc::clone(&self.location),
        })
    }

    /// Finish a navigation request with the provider's answer.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::StaleLookup`] when the answer belongs to a lookup that
    /// was superseded, and [`CourierError::PositionUnavailable`] when the provider
    /// failed or had no fix.
    pub fn complete_navigation(
        &mut self,
        resolved: ResolvedPosition,
    ) -> Result<Option<NavigationRequest>, CourierError> {
        if self.pending != Some(resolved.id) {
            debug!(lookup = ?resolved.id, "ignoring stale position lookup");
            return Err(CourierError::StaleLookup);
        }
        self.pending = None;

        let origin = resolved.outcome.map_err(PositionFailure::from)?;
        let request = route::build_route(&self.store.selected_ordered(), origin)?;
        if let Some(request) = &request {
            info!(
                destination = %request.destination.name,
                waypoints = request.waypoints.len(),
                "navigation request built"
            );
        }
        Ok(request)
    }

    /// Request, resolve, and complete a navigation in one call.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::PositionUnavailable`] when no current position could
    /// be obtained.
    pub async fn navigate(&mut self) -> Result<Option<NavigationRequest>, CourierError> {
        let Some(lookup) = self.request_navigation() else {
            return Ok(None);
        };
        let resolved = lookup.resolve().await;
        self.complete_navigation(resolved)
    }

    /// Whether a position lookup is awaiting its answer.
    #[must_use]
    pub fn is_navigation_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Stop list and selection.
    #[must_use]
    pub fn store(&self) -> &PlaceStore {
        &self.store
    }

    /// Marker registry and the map display behind it.
    #[must_use]
    pub fn markers(&self) -> &MarkerSync<M> {
        &self.markers
    }

    /// Mutable access to the map display, for camera moves.
    pub fn display_mut(&mut self) -> &mut M {
        self.markers.display_mut()
    }

    /// Deliveries recorded this session, oldest first.
    #[must_use]
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    fn apply_parsed(&mut self, parsed: Result<ParsedStops, AssetError>) -> LoadOutcome {
        match parsed {
            Ok(ParsedStops { stops, skipped }) => {
                let duplicates = self
                    .load_stops(stops)
                    .into_iter()
                    .map(|stop| stop.name)
                    .collect::<Vec<_>>();
                let count = self.store.len();
                info!(
                    count,
                    skipped = skipped.len(),
                    duplicates = duplicates.len(),
                    "stops loaded"
                );
                LoadOutcome::Loaded {
                    count,
                    skipped,
                    duplicates,
                }
            }
            Err(err) => {
                warn!(error = %err, "stop asset could not be loaded");
                self.load_stops(Vec::new());
                LoadOutcome::Failed(err)
            }
        }
    }

    fn sync_marker(&mut self, name: &str, selected: bool) {
        if let Some(stop) = self.store.get(name) {
            self.markers.on_toggle(stop, selected);
        }
        self.invalidate_lookup();
    }

    fn invalidate_lookup(&mut self) {
        if let Some(stale) = self.pending.take() {
            debug!(lookup = ?stale, "stop list changed, pending position lookup dropped");
        }
    }
}
