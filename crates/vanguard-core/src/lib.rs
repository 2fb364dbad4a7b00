//! Core types and definitions for the VANGUARD simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the flat entity record, the world store, the seeded PRNG, scripted
//! events, enums, and constants. It has no dependency on any runtime
//! framework, enabling deterministic headless testing.

pub mod constants;
pub mod entity;
pub mod enums;
pub mod error;
pub mod events;
pub mod geo;
pub mod rng;
pub mod world;

pub use entity::Entity;
pub use rng::SeededRng;
pub use world::World;

#[cfg(test)]
mod tests;
