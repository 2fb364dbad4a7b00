//! The per-tick system pipeline.
//!
//! Systems run in a fixed sequence; the ordering is a contract shared
//! with the RNG consultation order, so reordering breaks determinism.

use vanguard_core::World;

use crate::{ai, events, physics, sensors, weapons};

/// Advance the world by one tick of dt seconds.
pub fn step(world: &mut World, dt: f64) {
    // 1. AI (no RNG draws)
    ai::run(world, dt);
    // 2. Physics (no RNG draws)
    physics::run(world, dt);
    // 3. Sensors (detection rolls, entity order)
    sensors::run(world, dt);
    // 4. Weapons (kinetic, SAM, A2A Pk rolls, in that order)
    weapons::run(world, dt);
    // 5. Scripted events (no RNG draws)
    events::run(world);

    world.t += dt;
}
