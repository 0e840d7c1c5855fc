//! Fixed-timestep physics for WAYFARER.
//!
//! Owns point-mass bodies in a hecs world, advances them with an
//! accumulator loop, resolves coarse sphere overlaps, and drives the
//! controlled character from directional input.

pub mod body;
pub mod character;
pub mod world;

pub use wayfarer_core as core;
pub use body::PhysicsBody;
pub use character::CharacterController;
pub use world::{BodyHandle, PhysicsWorld};

#[cfg(test)]
mod tests;
