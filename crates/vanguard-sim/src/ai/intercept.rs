//! Intercept AI.
//!
//! Chases a named target with the shared steering law at full throttle.
//! Flips its engagement state when the slant range closes inside the
//! engage range; the A2A weapon system reads that flag for its own
//! acquisition.

use vanguard_core::constants::INTERCEPT_MIN_ALTITUDE;
use vanguard_core::enums::PhysicsKind;
use vanguard_core::World;

use super::steer;

pub fn update(world: &mut World, idx: usize, dt: f64) {
    let target_id = world.entity(idx).intercept.target_id.clone();

    let target = (!target_id.is_empty())
        .then(|| world.index_of(&target_id))
        .flatten();
    let Some(j) = target else {
        world.entity_mut(idx).intercept.engaged = false;
        return;
    };

    let (target_geo, target_physics) = {
        let t = world.entity(j);
        if !t.active || t.destroyed || t.physics == PhysicsKind::OrbitalTwoBody {
            world.entity_mut(idx).intercept.engaged = false;
            return;
        }
        (t.geo, t.physics)
    };

    let entity = world.entity_mut(idx);
    let bearing = entity.geo.bearing_to(&target_geo);
    let ground = entity.geo.haversine_to(&target_geo);
    let d_alt = target_geo.alt_m - entity.geo.alt_m;
    let slant = (ground * ground + d_alt * d_alt).sqrt();

    let desired_alt = if target_physics == PhysicsKind::Flight3Dof {
        target_geo.alt_m
    } else {
        target_geo.alt_m.max(INTERCEPT_MIN_ALTITUDE)
    };

    steer(
        &mut entity.flight,
        bearing,
        desired_alt - entity.geo.alt_m,
        dt,
    );
    entity.flight.throttle = 1.0;

    entity.intercept.engaged =
        entity.intercept.engage_range > 0.0 && slant < entity.intercept.engage_range;
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::enums::AiKind;
    use vanguard_core::geo::Geodetic;
    use vanguard_core::Entity;

    fn world_with_pair(target_lon: f64, engage_range: f64) -> World {
        let mut world = World::new(1);
        let mut hunter = Entity::new("hunter", "HUNTER", "fighter", "blue");
        hunter.physics = PhysicsKind::Flight3Dof;
        hunter.ai = AiKind::Intercept;
        hunter.geo = Geodetic::new(0.0, 0.0, 8_000.0);
        hunter.flight.tas = 250.0;
        hunter.intercept.target_id = "bandit".into();
        hunter.intercept.engage_range = engage_range;
        world.add_entity(hunter).unwrap();

        let mut bandit = Entity::new("bandit", "BANDIT", "fighter", "red");
        bandit.physics = PhysicsKind::Flight3Dof;
        bandit.geo = Geodetic::new(0.0, target_lon, 8_000.0);
        bandit.flight.tas = 200.0;
        world.add_entity(bandit).unwrap();
        world
    }

    #[test]
    fn engages_inside_engage_range() {
        let mut world = world_with_pair(0.1, 50_000.0); // ~11 km away
        update(&mut world, 0, 0.1);
        assert!(world.entity(0).intercept.engaged);
        assert_eq!(world.entity(0).flight.throttle, 1.0);
    }

    #[test]
    fn navigates_outside_engage_range() {
        let mut world = world_with_pair(2.0, 50_000.0); // ~222 km away
        update(&mut world, 0, 0.1);
        assert!(!world.entity(0).intercept.engaged);
    }

    #[test]
    fn zero_engage_range_never_engages() {
        let mut world = world_with_pair(0.01, 0.0);
        update(&mut world, 0, 0.1);
        assert!(!world.entity(0).intercept.engaged);
    }

    #[test]
    fn dead_target_resets_engagement() {
        let mut world = world_with_pair(0.1, 50_000.0);
        update(&mut world, 0, 0.1);
        assert!(world.entity(0).intercept.engaged);
        world.entity_mut(1).mark_destroyed();
        update(&mut world, 0, 0.1);
        assert!(!world.entity(0).intercept.engaged);
    }

    #[test]
    fn missing_target_resets_engagement() {
        let mut world = world_with_pair(0.1, 50_000.0);
        world.entity_mut(0).intercept.target_id = "ghost".into();
        update(&mut world, 0, 0.1);
        assert!(!world.entity(0).intercept.engaged);
    }
}
