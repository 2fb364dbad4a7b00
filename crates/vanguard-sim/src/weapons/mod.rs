//! Weapon systems.
//!
//! Three ordered sub-passes — kinetic kill, SAM batteries, A2A missiles —
//! each iterating entities in insertion order. The ordering is part of
//! the determinism contract: it fixes the sequence of Pk rolls within a
//! tick. Entities under `weapons_hold` are skipped by every pass.

pub mod a2a;
pub mod kinetic;
pub mod sam;

use vanguard_core::World;

pub fn run(world: &mut World, dt: f64) {
    kinetic::run(world, dt);
    sam::run(world, dt);
    a2a::run(world, dt);
}
