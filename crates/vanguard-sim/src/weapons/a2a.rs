//! Air-to-air missiles.
//!
//! Engagements advance lock → guide → assess; the round leaves the
//! inventory at lock → guide and the Pk roll lands at guide → assess.
//! Acquisition pairs every un-engaged radar detection (and the intercept
//! AI's target, when engaged) with the cheapest weapon that still reaches:
//! smallest spec range ≥ slant with rounds remaining.

use std::collections::HashSet;

use vanguard_core::constants::A2A_ASSESS_TIME;
use vanguard_core::entity::A2aEngagement;
use vanguard_core::enums::{
    A2aPhase, AiKind, EngagementResult, EngagementRules, WeaponKind,
};
use vanguard_core::World;

pub fn run(world: &mut World, dt: f64) {
    for idx in 0..world.entity_count() {
        {
            let e = world.entity(idx);
            if e.weapon != WeaponKind::A2aMissile
                || !e.is_alive()
                || e.rules == EngagementRules::WeaponsHold
            {
                continue;
            }
        }
        advance_engagements(world, idx, dt);
        acquire_targets(world, idx);
    }
}

fn advance_engagements(world: &mut World, idx: usize, dt: f64) {
    let t = world.t;
    let (self_id, self_name, self_ecef) = {
        let e = world.entity(idx);
        (e.id.clone(), e.name.clone(), e.position_ecef(t))
    };

    let engagements = std::mem::take(&mut world.entity_mut(idx).a2a.engagements);
    let mut retained: Vec<A2aEngagement> = Vec::with_capacity(engagements.len());

    for mut eng in engagements {
        eng.phase_timer -= dt;
        if eng.phase_timer > 0.0 {
            retained.push(eng);
            continue;
        }

        match eng.phase {
            A2aPhase::Lock => {
                let target = world
                    .index_of(&eng.target_id)
                    .filter(|&j| world.entity(j).is_alive());
                let rounds = world
                    .entity(idx)
                    .a2a
                    .inventory
                    .get(&eng.weapon)
                    .copied()
                    .unwrap_or(0);
                if let (Some(j), true) = (target, rounds > 0) {
                    let spec = world
                        .entity(idx)
                        .a2a
                        .specs
                        .get(&eng.weapon)
                        .copied()
                        .unwrap_or_default();
                    let (target_id, target_name, slant) = {
                        let tgt = world.entity(j);
                        (
                            tgt.id.clone(),
                            tgt.name.clone(),
                            (tgt.position_ecef(t) - self_ecef).length(),
                        )
                    };
                    {
                        let e = world.entity_mut(idx);
                        if let Some(count) = e.a2a.inventory.get_mut(&eng.weapon) {
                            *count -= 1;
                        }
                        e.log_engagement(target_id, target_name, EngagementResult::Launch, t);
                    }
                    eng.phase = A2aPhase::Guide;
                    eng.phase_timer = if spec.speed > 0.0 { slant / spec.speed } else { 0.0 };
                    retained.push(eng);
                }
                // Lost lock or empty rail: engagement erased.
            }
            A2aPhase::Guide => {
                let pk = world
                    .entity(idx)
                    .a2a
                    .specs
                    .get(&eng.weapon)
                    .map_or(0.0, |s| s.pk);
                let hit = world.rng.bernoulli(pk);

                let target = world.index_of(&eng.target_id);
                let live_target = target.filter(|&j| world.entity(j).is_alive());
                if let (true, Some(j)) = (hit, live_target) {
                    let (target_id, target_name) = {
                        let tgt = world.entity(j);
                        (tgt.id.clone(), tgt.name.clone())
                    };
                    let (shooter, victim) = world.pair_mut(idx, j);
                    victim.mark_destroyed();
                    victim.log_engagement(
                        self_id.clone(),
                        self_name.clone(),
                        EngagementResult::KilledBy,
                        t,
                    );
                    shooter.log_engagement(target_id, target_name, EngagementResult::Kill, t);
                } else {
                    let (target_id, target_name) = match target {
                        Some(j) => {
                            let tgt = world.entity(j);
                            (tgt.id.clone(), tgt.name.clone())
                        }
                        None => (eng.target_id.clone(), eng.target_id.clone()),
                    };
                    world.entity_mut(idx).log_engagement(
                        target_id,
                        target_name,
                        EngagementResult::Miss,
                        t,
                    );
                }
                eng.phase = A2aPhase::Assess;
                eng.phase_timer = A2A_ASSESS_TIME;
                retained.push(eng);
            }
            A2aPhase::Assess => {
                // Assessment complete: engagement erased.
            }
        }
    }

    world.entity_mut(idx).a2a.engagements = retained;
}

fn acquire_targets(world: &mut World, idx: usize) {
    let t = world.t;
    let self_ecef = world.entity(idx).position_ecef(t);
    let lock_time = world.entity(idx).a2a.lock_time;

    let mut engaged: HashSet<String> = world
        .entity(idx)
        .a2a
        .engagements
        .iter()
        .map(|e| e.target_id.clone())
        .collect();
    let mut fresh: Vec<(String, String)> = Vec::new();

    // Own-radar detections, in detection order.
    let detected: Vec<String> = world
        .entity(idx)
        .radar
        .detections
        .iter()
        .map(|d| d.target_id.clone())
        .collect();
    for target_id in detected {
        if engaged.contains(&target_id) {
            continue;
        }
        if let Some(weapon) = select_weapon(world, idx, &target_id, self_ecef) {
            engaged.insert(target_id.clone());
            fresh.push((target_id, weapon));
        }
    }

    // Intercept AI hand-off: engage the chased target directly.
    let intercept_target = {
        let e = world.entity(idx);
        (e.ai == AiKind::Intercept && e.intercept.engaged && !e.intercept.target_id.is_empty())
            .then(|| e.intercept.target_id.clone())
    };
    if let Some(target_id) = intercept_target {
        if !engaged.contains(&target_id) {
            if let Some(weapon) = select_weapon(world, idx, &target_id, self_ecef) {
                fresh.push((target_id, weapon));
            }
        }
    }

    let e = world.entity_mut(idx);
    for (target_id, weapon) in fresh {
        e.a2a.engagements.push(A2aEngagement {
            target_id,
            phase: A2aPhase::Lock,
            phase_timer: lock_time,
            weapon,
        });
    }
}

/// Min-overkill selection: among loadout weapons with rounds remaining
/// whose spec range covers the slant, take the smallest range. Loadout
/// order breaks ties.
fn select_weapon(
    world: &World,
    idx: usize,
    target_id: &str,
    self_ecef: glam::DVec3,
) -> Option<String> {
    let j = world
        .index_of(target_id)
        .filter(|&j| world.entity(j).is_alive())?;
    let slant = (world.entity(j).position_ecef(world.t) - self_ecef).length();

    let e = world.entity(idx);
    let mut best: Option<(&str, f64)> = None;
    for name in &e.a2a.loadout {
        let rounds = e.a2a.inventory.get(name).copied().unwrap_or(0);
        if rounds == 0 {
            continue;
        }
        let Some(spec) = e.a2a.specs.get(name) else {
            continue;
        };
        if spec.range >= slant && best.map_or(true, |(_, r)| spec.range < r) {
            best = Some((name.as_str(), spec.range));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::entity::{Detection, WeaponSpec};
    use vanguard_core::enums::PhysicsKind;
    use vanguard_core::geo::Geodetic;
    use vanguard_core::Entity;

    fn fighter(id: &str, team: &str, lon: f64) -> Entity {
        let mut e = Entity::new(id, id.to_uppercase(), "fighter", team);
        e.physics = PhysicsKind::Flight3Dof;
        e.geo = Geodetic::new(0.0, lon, 8_000.0);
        e.flight.tas = 250.0;
        e
    }

    fn arm(e: &mut Entity, loadout: &[(&str, u32, f64, f64, f64)]) {
        e.weapon = WeaponKind::A2aMissile;
        e.a2a.lock_time = 1.0;
        for (name, count, range, pk, speed) in loadout {
            e.a2a.loadout.push((*name).to_string());
            e.a2a.inventory.insert((*name).to_string(), *count);
            e.a2a.specs.insert(
                (*name).to_string(),
                WeaponSpec {
                    range: *range,
                    pk: *pk,
                    speed: *speed,
                },
            );
        }
    }

    fn detect(e: &mut Entity, target: &str, range: f64) {
        e.radar.enabled = true;
        e.radar.detections.push(Detection {
            target_id: target.into(),
            range,
            bearing: 0.0,
            time: 0.0,
        });
    }

    fn step_a2a(world: &mut World, dt: f64, ticks: usize) {
        for _ in 0..ticks {
            run(world, dt);
            world.t += dt;
        }
    }

    #[test]
    fn lock_guide_assess_kills_with_certain_pk() {
        let mut world = World::new(11);
        // ~11 km apart.
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(
            &mut shooter,
            &[
                ("aim120", 4, 80_000.0, 1.0, 1_400.0),
                ("aim9", 2, 18_000.0, 1.0, 900.0),
            ],
        );
        detect(&mut shooter, "bandit", 11_000.0);
        world.add_entity(shooter).unwrap();
        world.add_entity(fighter("bandit", "red", 0.1)).unwrap();

        step_a2a(&mut world, 0.1, 1);
        assert_eq!(world.entity(0).a2a.engagements.len(), 1);
        // Min-overkill: the aim9 covers 11 km with less reach to spare.
        assert_eq!(world.entity(0).a2a.engagements[0].weapon, "aim9");

        // Lock (1 s) → launch → guide (TOF ≈ 12 s) → kill.
        step_a2a(&mut world, 0.1, 200);
        assert!(world.entity(1).destroyed);
        assert_eq!(*world.entity(0).a2a.inventory.get("aim9").unwrap(), 1);
        assert_eq!(*world.entity(0).a2a.inventory.get("aim120").unwrap(), 4);

        let results: Vec<_> = world.entity(0).log.iter().map(|r| r.result).collect();
        assert_eq!(
            results,
            vec![EngagementResult::Launch, EngagementResult::Kill]
        );
        assert_eq!(world.entity(1).log[0].result, EngagementResult::KilledBy);
    }

    #[test]
    fn out_of_reach_weapons_are_not_selected() {
        let mut world = World::new(11);
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(&mut shooter, &[("aim9", 2, 18_000.0, 1.0, 900.0)]);
        detect(&mut shooter, "bandit", 60_000.0);
        world.add_entity(shooter).unwrap();
        // ~55 km out: beyond the aim9.
        world.add_entity(fighter("bandit", "red", 0.5)).unwrap();

        step_a2a(&mut world, 0.1, 5);
        assert!(world.entity(0).a2a.engagements.is_empty());
    }

    #[test]
    fn inventory_conservation_under_fire() {
        let mut world = World::new(11);
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(&mut shooter, &[("aim120", 2, 80_000.0, 0.0, 1_400.0)]);
        detect(&mut shooter, "bandit", 11_000.0);
        world.add_entity(shooter).unwrap();
        world.add_entity(fighter("bandit", "red", 0.1)).unwrap();

        // Shoot until dry: every launch decrements, every miss re-engages.
        step_a2a(&mut world, 0.1, 600);
        let e = world.entity(0);
        let launches = e
            .log
            .iter()
            .filter(|r| r.result == EngagementResult::Launch)
            .count() as u32;
        let remaining = *e.a2a.inventory.get("aim120").unwrap();
        assert_eq!(launches + remaining, 2, "loadout conserved");
        assert_eq!(remaining, 0);
        // Dry rails stop acquisition from opening new engagements.
        assert!(e
            .a2a
            .engagements
            .iter()
            .all(|eng| eng.phase != A2aPhase::Lock));
    }

    #[test]
    fn dead_target_erases_lock() {
        let mut world = World::new(11);
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(&mut shooter, &[("aim120", 2, 80_000.0, 1.0, 1_400.0)]);
        detect(&mut shooter, "bandit", 11_000.0);
        world.add_entity(shooter).unwrap();
        world.add_entity(fighter("bandit", "red", 0.1)).unwrap();

        step_a2a(&mut world, 0.1, 1);
        world.entity_mut(1).mark_destroyed();
        step_a2a(&mut world, 0.1, 20);
        assert_eq!(*world.entity(0).a2a.inventory.get("aim120").unwrap(), 2);
        assert!(world.entity(0).log.is_empty());
    }

    #[test]
    fn intercept_handoff_queues_an_engagement_without_radar() {
        let mut world = World::new(11);
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(&mut shooter, &[("aim120", 2, 80_000.0, 1.0, 1_400.0)]);
        shooter.ai = AiKind::Intercept;
        shooter.intercept.target_id = "bandit".into();
        shooter.intercept.engaged = true;
        world.add_entity(shooter).unwrap();
        world.add_entity(fighter("bandit", "red", 0.1)).unwrap();

        step_a2a(&mut world, 0.1, 1);
        assert_eq!(world.entity(0).a2a.engagements.len(), 1);
        assert_eq!(world.entity(0).a2a.engagements[0].target_id, "bandit");
    }

    #[test]
    fn weapons_hold_suppresses_acquisition_and_fire() {
        let mut world = World::new(11);
        let mut shooter = fighter("viper", "blue", 0.0);
        arm(&mut shooter, &[("aim120", 2, 80_000.0, 1.0, 1_400.0)]);
        detect(&mut shooter, "bandit", 11_000.0);
        shooter.rules = EngagementRules::WeaponsHold;
        world.add_entity(shooter).unwrap();
        world.add_entity(fighter("bandit", "red", 0.1)).unwrap();

        step_a2a(&mut world, 0.1, 100);
        assert!(world.entity(0).a2a.engagements.is_empty());
        assert!(world.entity(0).log.is_empty());
        assert!(!world.entity(1).destroyed);
    }
}
