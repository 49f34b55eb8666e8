//! Core types and service wiring for the kurier delivery stop planner.

/// Parsing of the bundled stop asset.
pub mod asset;
/// Error types surfaced to callers of the controller.
pub mod error;
/// Keeps map markers in step with the stop selection.
pub mod markers;
/// Domain models and identifiers shared by all crates.
pub mod model;
/// Traits describing the map display and location provider collaborators.
pub mod ports;
/// Navigation request construction and the directions deep link.
pub mod route;
/// High-level controller used by front ends.
pub mod service;
/// Ordered stop list and selection state.
pub mod store;

pub use asset::*;
pub use error::*;
pub use markers::*;
pub use model::*;
pub use ports::*;
pub use route::*;
pub use service::*;
pub use store::*;
