//! Orbital-combat AI.
//!
//! Role-driven target selection over a periodic sensor scan, plus a
//! simple thrust law that burns toward the selected target. When the
//! target closes inside kill range the AI hands it to the weapon system
//! through the designator field instead of burning.

use std::cmp::Ordering;

use glam::DVec3;

use vanguard_core::enums::OrbitalRole;
use vanguard_core::World;

/// Update one orbital-combat entity. Runs its scan-and-select logic every
/// `scan_interval` seconds; between scans the entity coasts.
pub fn update(world: &mut World, idx: usize, dt: f64) {
    {
        let entity = world.entity_mut(idx);
        entity.combat.scan_accum += dt;
        if entity.combat.scan_accum < entity.combat.scan_interval {
            return;
        }
        entity.combat.scan_accum = 0.0;
    }

    let (self_pos, team, role, sensor_range, hva_id, defense_radius, kill_range, max_accel) = {
        let e = world.entity(idx);
        (
            e.pos_eci,
            e.team.clone(),
            e.combat.role,
            e.combat.sensor_range,
            e.combat.hva_id.clone(),
            e.combat.defense_radius,
            e.combat.kill_range,
            e.combat.max_accel,
        )
    };

    // Scan: hostile, alive, inside sensor range. Stable sort keeps the
    // insertion-order tie-break for equal distances.
    let range2 = sensor_range * sensor_range;
    let mut contacts: Vec<(usize, f64)> = Vec::new();
    for j in 0..world.entity_count() {
        if j == idx {
            continue;
        }
        let other = world.entity(j);
        if other.team == team || !other.active || other.destroyed {
            continue;
        }
        let d2 = (other.pos_eci - self_pos).length_squared();
        if d2 <= range2 {
            contacts.push((j, d2));
        }
    }
    contacts.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let target = match role {
        OrbitalRole::Hva | OrbitalRole::None => None,
        OrbitalRole::Attacker => contacts
            .iter()
            .find(|(j, _)| world.entity(*j).combat.role == OrbitalRole::Hva)
            .map(|(j, _)| *j),
        OrbitalRole::Defender => {
            let hva = (!hva_id.is_empty())
                .then(|| world.entity_by_id(&hva_id))
                .flatten();
            match hva {
                Some(hva) if hva.active => {
                    let hva_pos = hva.pos_eci;
                    contacts
                        .iter()
                        .find(|(j, _)| {
                            let c = world.entity(*j);
                            matches!(
                                c.combat.role,
                                OrbitalRole::Attacker | OrbitalRole::Sweep | OrbitalRole::Escort
                            ) && (c.pos_eci - hva_pos).length() <= defense_radius
                        })
                        .map(|(j, _)| *j)
                }
                _ => {
                    // No assigned HVA to defend: stand down.
                    let e = world.entity_mut(idx);
                    e.combat.target_id.clear();
                    e.combat.weapon_target_id.clear();
                    return;
                }
            }
        }
        OrbitalRole::Escort => {
            let pick = contacts
                .iter()
                .find(|(j, _)| {
                    matches!(
                        world.entity(*j).combat.role,
                        OrbitalRole::Defender | OrbitalRole::Sweep
                    )
                })
                .map(|(j, _)| *j);
            if pick.is_none() {
                // Nothing to screen against: form up on the nearest
                // friendly attacker at reduced thrust.
                drift_toward_friendly_attacker(world, idx, self_pos, &team, max_accel, dt);
                return;
            }
            pick
        }
        OrbitalRole::Sweep => contacts
            .iter()
            .find(|(j, _)| {
                matches!(
                    world.entity(*j).combat.role,
                    OrbitalRole::Attacker | OrbitalRole::Escort
                )
            })
            .map(|(j, _)| *j),
    };

    match target {
        Some(j) => {
            let target_id = world.entity(j).id.clone();
            let target_pos = world.entity(j).pos_eci;
            let distance = (target_pos - self_pos).length();
            let entity = world.entity_mut(idx);
            entity.combat.target_id = target_id.clone();
            if distance <= kill_range {
                entity.combat.weapon_target_id = target_id;
            } else {
                entity.combat.weapon_target_id.clear();
                apply_thrust(world, idx, self_pos, target_pos, max_accel, dt);
            }
        }
        None => {
            let entity = world.entity_mut(idx);
            entity.combat.target_id.clear();
            entity.combat.weapon_target_id.clear();
        }
    }
}

/// Burn toward a point: Δv = accel · dt along the line of sight.
fn apply_thrust(
    world: &mut World,
    idx: usize,
    self_pos: DVec3,
    target_pos: DVec3,
    accel: f64,
    dt: f64,
) {
    let rel = target_pos - self_pos;
    if rel.length() < 1.0 {
        return;
    }
    world.entity_mut(idx).vel_eci += rel.normalize() * accel * dt;
}

/// Escort fallback: 30 %-scaled burn toward the nearest friendly attacker.
fn drift_toward_friendly_attacker(
    world: &mut World,
    idx: usize,
    self_pos: DVec3,
    team: &str,
    max_accel: f64,
    dt: f64,
) {
    {
        let entity = world.entity_mut(idx);
        entity.combat.target_id.clear();
        entity.combat.weapon_target_id.clear();
    }

    let mut nearest: Option<(usize, f64)> = None;
    for j in 0..world.entity_count() {
        if j == idx {
            continue;
        }
        let other = world.entity(j);
        if other.team != team
            || !other.is_alive()
            || other.combat.role != OrbitalRole::Attacker
        {
            continue;
        }
        let d2 = (other.pos_eci - self_pos).length_squared();
        if nearest.map_or(true, |(_, best)| d2 < best) {
            nearest = Some((j, d2));
        }
    }

    if let Some((j, _)) = nearest {
        let target_pos = world.entity(j).pos_eci;
        apply_thrust(world, idx, self_pos, target_pos, 0.3 * max_accel, dt);
    }
}
