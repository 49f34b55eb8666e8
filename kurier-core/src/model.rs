//! Domain data structures for stops, coordinates, and deliveries.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Name of a stop, used as its identity within a session.
pub struct StopName(pub String);

impl fmt::Display for StopName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.pad(&self.0)
    }
}

impl From<&str> for StopName {
    fn from(name: &str) -> Self {
        StopName(name.to_owned())
    }
}

impl From<String> for StopName {
    fn from(name: String) -> Self {
        StopName(name)
    }
}

impl Borrow<str> for StopName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StopName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// WGS84 position in decimal degrees.
pub struct Coordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Formats as `lat,lng`, the form used in directions links.
impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A named delivery point. Never mutated after load, only removed.
pub struct Stop {
    /// Unique name of the stop.
    pub name: StopName,
    /// Where the stop is.
    pub position: Coordinate,
}

impl Stop {
    /// Build a stop from its name and coordinates.
    #[must_use]
    pub fn new<N: Into<StopName>>(name: N, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            position: Coordinate::new(lat, lng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Record of a stop that was marked delivered.
pub struct Delivery {
    /// The stop that left the list.
    pub stop: Stop,
    /// When the courier confirmed the delivery.
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Initial map camera placement.
pub struct CameraSettings {
    /// Camera centre.
    pub center: Coordinate,
    /// Zoom level in web-map terms (0 shows the whole world).
    pub zoom: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            center: Coordinate::new(52.2297, 21.0122),
            zoom: 12.0,
        }
    }
}
