//! Headless Wayfarer runner.
//!
//! Wires the engine crates to the outside world: configuration files,
//! logging, an HTTP directions service, location feeds, and a real-time
//! frame loop that streams snapshots.

pub mod config;
pub mod game_loop;
pub mod http_routing;
pub mod location_feed;
pub mod logging;
pub mod route_source;

pub use wayfarer_core as core;
