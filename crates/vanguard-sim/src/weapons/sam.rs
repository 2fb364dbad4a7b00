//! SAM battery kill chain.
//!
//! Per-engagement state machine detect → track → engage → assess with
//! fixed phase timers (engage runs for the missile time-of-flight).
//! Acquisition feeds off same-team radar detections. Per-missile Pk rolls
//! happen at the engage → assess boundary, in engagement-insertion order,
//! missile by missile.

use std::collections::HashSet;

use vanguard_core::constants::{
    SAM_ASSESS_TIME, SAM_DETECT_TIME, SAM_MIN_TARGET_ALTITUDE, SAM_TRACK_TIME,
};
use vanguard_core::entity::SamEngagement;
use vanguard_core::enums::{
    EngagementResult, EngagementRules, PhysicsKind, SamPhase, WeaponKind,
};
use vanguard_core::geo::ecef_to_geodetic;
use vanguard_core::World;

pub fn run(world: &mut World, dt: f64) {
    for idx in 0..world.entity_count() {
        {
            let e = world.entity(idx);
            if e.weapon != WeaponKind::SamBattery
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

/// Walk every engagement through its phase timer; erase completed or
/// invalidated ones. Preserves engagement-insertion order.
fn advance_engagements(world: &mut World, idx: usize, dt: f64) {
    let t = world.t;
    let (self_id, self_name, self_ecef, missile_speed, pk) = {
        let e = world.entity(idx);
        (
            e.id.clone(),
            e.name.clone(),
            e.position_ecef(t),
            e.sam.missile_speed,
            e.sam.pk_per_missile,
        )
    };

    let engagements = std::mem::take(&mut world.entity_mut(idx).sam.engagements);
    let mut retained: Vec<SamEngagement> = Vec::with_capacity(engagements.len());

    for mut eng in engagements {
        eng.phase_timer -= dt;
        if eng.phase_timer > 0.0 {
            retained.push(eng);
            continue;
        }

        match eng.phase {
            SamPhase::Detect => {
                eng.phase = SamPhase::Track;
                eng.phase_timer = SAM_TRACK_TIME;
                retained.push(eng);
            }
            SamPhase::Track => {
                let target = world
                    .index_of(&eng.target_id)
                    .filter(|&j| world.entity(j).is_alive());
                let ready = world.entity(idx).sam.missiles_ready;
                if let (Some(j), true) = (target, ready > 0) {
                    let salvo = world.entity(idx).sam.salvo_size;
                    let fired = salvo.min(ready);
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
                        e.sam.missiles_ready -= fired;
                        for _ in 0..fired {
                            e.log_engagement(
                                target_id.clone(),
                                target_name.clone(),
                                EngagementResult::Launch,
                                t,
                            );
                        }
                    }
                    eng.phase = SamPhase::Engage;
                    eng.phase_timer = if missile_speed > 0.0 {
                        slant / missile_speed
                    } else {
                        0.0
                    };
                    eng.missiles_fired = fired;
                    retained.push(eng);
                }
                // Invalid target or empty rails: engagement erased.
            }
            SamPhase::Engage => {
                // One roll per missile fired, every roll consumed.
                let mut any_hit = false;
                for _ in 0..eng.missiles_fired {
                    if world.rng.bernoulli(pk) {
                        any_hit = true;
                    }
                }

                let target = world.index_of(&eng.target_id);
                let live_target = target.filter(|&j| world.entity(j).is_alive());
                if let (true, Some(j)) = (any_hit, live_target) {
                    let (target_id, target_name) = {
                        let tgt = world.entity(j);
                        (tgt.id.clone(), tgt.name.clone())
                    };
                    let (battery, victim) = world.pair_mut(idx, j);
                    victim.mark_destroyed();
                    victim.log_engagement(
                        self_id.clone(),
                        self_name.clone(),
                        EngagementResult::KilledBy,
                        t,
                    );
                    battery.log_engagement(target_id, target_name, EngagementResult::Kill, t);
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
                eng.phase = SamPhase::Assess;
                eng.phase_timer = SAM_ASSESS_TIME;
                retained.push(eng);
            }
            SamPhase::Assess => {
                // Assessment complete: engagement erased.
            }
        }
    }

    world.entity_mut(idx).sam.engagements = retained;
}

/// Open a detect-phase engagement for every eligible target reported by a
/// same-team radar and not already being worked by this battery.
fn acquire_targets(world: &mut World, idx: usize) {
    let t = world.t;
    let (team, self_ecef, min_range, max_range) = {
        let e = world.entity(idx);
        (
            e.team.clone(),
            e.position_ecef(t),
            e.sam.min_range,
            e.sam.max_range,
        )
    };

    let mut engaged: HashSet<String> = world
        .entity(idx)
        .sam
        .engagements
        .iter()
        .map(|e| e.target_id.clone())
        .collect();
    let mut fresh: Vec<String> = Vec::new();

    for j in 0..world.entity_count() {
        let radar_owner = world.entity(j);
        if radar_owner.team != team || !radar_owner.radar.enabled || !radar_owner.is_alive() {
            continue;
        }
        for detection in &radar_owner.radar.detections {
            if engaged.contains(&detection.target_id) {
                continue;
            }
            let Some(k) = world.index_of(&detection.target_id) else {
                continue;
            };
            let target = world.entity(k);
            if !target.is_alive() || target.physics == PhysicsKind::Static {
                continue;
            }
            let target_ecef = target.position_ecef(t);
            let alt = match target.physics {
                PhysicsKind::OrbitalTwoBody => ecef_to_geodetic(target_ecef).alt_m,
                _ => target.geo.alt_m,
            };
            if alt < SAM_MIN_TARGET_ALTITUDE {
                continue;
            }
            let slant = (target_ecef - self_ecef).length();
            if slant < min_range || slant > max_range {
                continue;
            }
            engaged.insert(detection.target_id.clone());
            fresh.push(detection.target_id.clone());
        }
    }

    let e = world.entity_mut(idx);
    for target_id in fresh {
        e.sam.engagements.push(SamEngagement {
            target_id,
            phase: SamPhase::Detect,
            phase_timer: SAM_DETECT_TIME,
            missiles_fired: 0,
        });
    }
}
