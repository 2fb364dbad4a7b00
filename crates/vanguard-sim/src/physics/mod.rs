//! Physics system — dispatches each entity to its motion model.

pub mod flight;
pub mod orbital;

use vanguard_core::enums::PhysicsKind;
use vanguard_core::{Entity, World};

/// Advance all active entities by dt. Inactive entities hold their last
/// state so the replay can repeat their final position.
pub fn run(world: &mut World, dt: f64) {
    for entity in world.entities_mut() {
        if !entity.active {
            continue;
        }
        step_entity(entity, dt);
    }
}

/// Single-entity physics update. Shared with the distributed worker,
/// which steps its assigned subset through this same function.
pub fn step_entity(entity: &mut Entity, dt: f64) {
    match entity.physics {
        PhysicsKind::OrbitalTwoBody => orbital::propagate(entity, dt),
        PhysicsKind::Flight3Dof => flight::step(entity, dt),
        PhysicsKind::Static | PhysicsKind::None => {}
    }
}
