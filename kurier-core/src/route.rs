//! Navigation request construction and the directions deep link.

use serde::{Deserialize, Serialize};

use crate::error::{CourierError, PositionFailure};
use crate::model::{Coordinate, Stop};

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Route handed to an external navigation app.
pub struct NavigationRequest {
    /// Where the courier currently is.
    pub origin: Coordinate,
    /// Final stop of the route.
    pub destination: Stop,
    /// Intermediate stops in visiting order.
    pub waypoints: Vec<Stop>,
}

impl NavigationRequest {
    /// Directions link understood by Google Maps and compatible handlers.
    ///
    /// The `waypoints` parameter is omitted for single-stop routes.
    #[must_use]
    pub fn directions_uri(&self) -> String {
        let waypoints = if self.waypoints.is_empty() {
            String::new()
        } else {
            let joined = self
                .waypoints
                .iter()
                .map(|stop| stop.position.to_string())
                .collect::<Vec<_>>()
                .join("|");
            format!("&waypoints={joined}")
        };
        format!(
            "{DIRECTIONS_BASE_URL}&origin={}&destination={}{waypoints}",
            self.origin, self.destination.position
        )
    }
}

/// Turn the selected stops into a navigation request.
///
/// The last stop becomes the destination and the rest stay waypoints in their
/// given order. Returns `Ok(None)` for an empty selection, in which case no
/// navigation should be started.
///
/// # Errors
///
/// Returns [`CourierError::PositionUnavailable`] when `origin` is `None` and there
/// is something to navigate to.
pub fn build_route(
    stops: &[Stop],
    origin: Option<Coordinate>,
) -> Result<Option<NavigationRequest>, CourierError> {
    let Some((destination, waypoints)) = stops.split_last() else {
        return Ok(None);
    };
    let origin = origin.ok_or(PositionFailure::NoFix)?;

    Ok(Some(NavigationRequest {
        origin,
        destination: destination.clone(),
        waypoints: waypoints.to_vec(),
    }))
}
