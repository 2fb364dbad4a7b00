//! Kinetic-kill vehicle.
//!
//! Reads the designator the orbital-combat AI wrote, logs LAUNCH on a
//! fresh designation, and rolls Pk once the target is inside kill range.
//! The vehicle is sacrificial: a hit destroys both ends.

use vanguard_core::enums::{EngagementResult, EngagementRules, WeaponKind};
use vanguard_core::World;

pub fn run(world: &mut World, dt: f64) {
    let t = world.t;

    for idx in 0..world.entity_count() {
        {
            let e = world.entity(idx);
            if e.weapon != WeaponKind::KineticKill
                || !e.is_alive()
                || e.rules == EngagementRules::WeaponsHold
            {
                continue;
            }
        }

        {
            let e = world.entity_mut(idx);
            if e.kinetic.cooldown_timer > 0.0 {
                e.kinetic.cooldown_timer = (e.kinetic.cooldown_timer - dt).max(0.0);
                continue;
            }
        }

        let designated = world.entity(idx).combat.weapon_target_id.clone();
        if designated.is_empty() {
            continue;
        }
        let target = world
            .index_of(&designated)
            .filter(|&j| j != idx && world.entity(j).is_alive());
        let Some(j) = target else {
            world.entity_mut(idx).combat.weapon_target_id.clear();
            continue;
        };

        let (target_id, target_name) = {
            let tgt = world.entity(j);
            (tgt.id.clone(), tgt.name.clone())
        };

        // Fresh designation gets a LAUNCH record.
        if world.entity(idx).kinetic.last_target != designated {
            let e = world.entity_mut(idx);
            e.kinetic.last_target = designated.clone();
            e.log_engagement(target_id.clone(), target_name.clone(), EngagementResult::Launch, t);
        }

        let distance = (world.entity(j).pos_eci - world.entity(idx).pos_eci).length();
        if distance > world.entity(idx).kinetic.kill_range {
            continue;
        }

        let pk = world.entity(idx).kinetic.pk;
        let hit = world.rng.bernoulli(pk);
        if hit {
            let (self_id, self_name) = {
                let e = world.entity(idx);
                (e.id.clone(), e.name.clone())
            };
            let (shooter, victim) = world.pair_mut(idx, j);
            victim.mark_destroyed();
            victim.log_engagement(self_id, self_name, EngagementResult::KilledBy, t);
            // The kill vehicle expends itself on impact.
            shooter.mark_destroyed();
            shooter.log_engagement(target_id, target_name, EngagementResult::Kill, t);
        } else {
            let e = world.entity_mut(idx);
            e.kinetic.cooldown_timer = e.kinetic.cooldown_time;
            e.combat.weapon_target_id.clear();
            e.log_engagement(target_id, target_name, EngagementResult::Miss, t);
        }
    }
}
