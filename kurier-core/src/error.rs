//! Caller-visible failures of stop list operations.

use crate::model::StopName;
use crate::ports::PortError;

#[derive(thiserror::Error, Debug)]
/// Errors returned by the store, route builder, and controller.
pub enum CourierError {
    /// No stop with this name is in the list.
    #[error("Unknown stop: {0}")]
    NotFound(StopName),
    /// A list position was outside the current list.
    #[error("Position {index} is out of range for {len} stops")]
    OutOfRange {
        /// Offending index.
        index: usize,
        /// List length at the time of the call.
        len: usize,
    },
    /// Navigation needs a current position and none could be obtained.
    #[error("Current position unavailable: {0}")]
    PositionUnavailable(#[from] PositionFailure),
    /// A position lookup finished after a newer request or a list change.
    #[error("Position lookup was superseded")]
    StaleLookup,
}

#[derive(thiserror::Error, Debug)]
/// Why a current position could not be obtained.
pub enum PositionFailure {
    /// The provider answered without a fix.
    #[error("no position fix")]
    NoFix,
    /// The provider failed or refused.
    #[error(transparent)]
    Provider(#[from] PortError),
}

impl CourierError {
    /// Whether the failure came from a closed location permission gate.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            CourierError::PositionUnavailable(PositionFailure::Provider(
                PortError::PermissionDenied
            ))
        )
    }
}
