//! Traits describing collaborator capabilities and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::Coordinate;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to collaborator backends.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Provider response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// The host has not granted access to the device position.
    #[error("Location permission not granted")]
    PermissionDenied,
    /// Provider-specific failure.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Surface that draws stop markers on a map.
///
/// Calls are synchronous and made from the thread that owns the controller.
pub trait MapDisplay {
    /// Opaque token identifying a placed marker.
    type Handle;

    /// Place a labelled marker and return its handle.
    fn place_marker(&mut self, position: Coordinate, label: &str) -> Self::Handle;

    /// Remove a previously placed marker.
    fn remove_marker(&mut self, handle: Self::Handle);

    /// Move the camera to `position` at the given zoom level.
    fn center_camera(&mut self, position: Coordinate, zoom: f32);
}

#[async_trait]
/// One-shot source of the current device position.
pub trait LocationPort: Send + Sync {
    /// Short human-readable name of the provider, used in logs.
    fn name(&self) -> &str;

    /// Ask for the current position once.
    ///
    /// `Ok(None)` means the provider answered but had no fix.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::PermissionDenied`] when the permission gate is closed, or
    /// another [`PortError`] when the provider request fails.
    async fn current_position(&self) -> Result<Option<Coordinate>, PortError>;
}
