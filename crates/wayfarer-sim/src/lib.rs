//! Headless orchestration for WAYFARER.
//!
//! Owns the coordinate system, physics world, character, navigation engine
//! and camera, feeds them location fixes and route responses from their
//! single-slot handoffs, and produces `FrameSnapshot`s. No rendering or
//! network dependency, so every frame is reproducible in tests.

pub mod camera;
pub mod engine;
pub mod fetcher;
pub mod location;

pub use wayfarer_core as core;
pub use camera::{CameraPreset, NavigationCamera};
pub use engine::MovementEngine;
pub use fetcher::RouteFetcher;
pub use location::{LocationFilter, LocationSlot, LocationWriter, SimulatedLocation};

#[cfg(test)]
mod tests;
