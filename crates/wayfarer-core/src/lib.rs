//! Core types and definitions for the WAYFARER movement engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geographic and world-frame types, commands, events, frame snapshots,
//! configuration, constants and the error taxonomy.
//! It has no dependency on any runtime, network or rendering framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::EngineError;
