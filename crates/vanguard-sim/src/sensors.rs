//! Radar sweep system.
//!
//! Each radar accumulates time toward its sweep interval; on expiry the
//! detection list is rebuilt from scratch. Candidates are filtered by
//! team, liveness, slant range, and elevation window before the
//! per-target detection roll. Detection rolls are the first RNG draws of
//! a tick, in entity-insertion order.

use vanguard_core::entity::Detection;
use vanguard_core::enums::PhysicsKind;
use vanguard_core::geo::{ecef_to_geodetic, Geodetic};
use vanguard_core::World;

pub fn run(world: &mut World, dt: f64) {
    let t = world.t;

    for idx in 0..world.entity_count() {
        {
            let entity = world.entity_mut(idx);
            if !entity.radar.enabled || !entity.is_alive() {
                continue;
            }
            entity.radar.sweep_accum += dt;
            if entity.radar.sweep_accum < entity.radar.sweep_interval {
                continue;
            }
            entity.radar.sweep_accum = 0.0;
        }

        let (own_team, own_geo, own_ecef, max_range, min_el, max_el, p_detect) = {
            let e = world.entity(idx);
            (
                e.team.clone(),
                e.geo,
                e.position_ecef(t),
                e.radar.max_range,
                e.radar.min_elevation_deg,
                e.radar.max_elevation_deg,
                e.radar.p_detect,
            )
        };

        // Geometry pass: collect candidates in insertion order.
        let mut candidates: Vec<Detection> = Vec::new();
        for j in 0..world.entity_count() {
            if j == idx {
                continue;
            }
            let target = world.entity(j);
            if target.team == own_team || !target.is_alive() {
                continue;
            }

            let target_ecef = target.position_ecef(t);
            let slant = (target_ecef - own_ecef).length();
            if slant > max_range {
                continue;
            }

            // Orbital targets get a geodetic fix from their rotated ECEF
            // position; everything else already carries one.
            let target_geo: Geodetic = match target.physics {
                PhysicsKind::OrbitalTwoBody => ecef_to_geodetic(target_ecef),
                _ => target.geo,
            };

            let ground = own_geo.haversine_to(&target_geo);
            let d_alt = target_geo.alt_m - own_geo.alt_m;
            let elevation_deg = if ground < 1.0 {
                90.0_f64.copysign(d_alt)
            } else {
                (d_alt / slant).clamp(-1.0, 1.0).asin().to_degrees()
            };
            if elevation_deg < min_el || elevation_deg > max_el {
                continue;
            }

            candidates.push(Detection {
                target_id: target.id.clone(),
                range: slant,
                bearing: own_geo.bearing_to(&target_geo),
                time: t,
            });
        }

        // Detection rolls, one per surviving candidate, in order.
        let mut detections = Vec::new();
        for candidate in candidates {
            if world.rng.bernoulli(p_detect) {
                detections.push(candidate);
            }
        }
        world.entity_mut(idx).radar.detections = detections;
    }
}
