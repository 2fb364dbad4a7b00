//! Scripted event evaluation.
//!
//! Runs last in the tick. Each unfired event checks its trigger against
//! current world state; on fire it latches and applies its action exactly
//! once. `message` actions go to the tracing side channel and leave the
//! simulation untouched.

use tracing::{info, warn};

use vanguard_core::enums::EngagementRules;
use vanguard_core::events::{Action, Trigger};
use vanguard_core::World;

pub fn run(world: &mut World) {
    for k in 0..world.events.len() {
        if world.events[k].fired {
            continue;
        }
        if !trigger_met(world, k) {
            continue;
        }
        world.events[k].fired = true;
        let name = world.events[k].name.clone();
        let action = world.events[k].action.clone();
        apply_action(world, &name, &action);
    }
}

fn trigger_met(world: &World, k: usize) -> bool {
    match &world.events[k].trigger {
        Trigger::Time { at } => world.t >= *at,
        Trigger::Proximity { a, b, range } => {
            let (Some(ea), Some(eb)) = (world.entity_by_id(a), world.entity_by_id(b)) else {
                return false;
            };
            let geodetic = |e: &vanguard_core::Entity| {
                e.physics != vanguard_core::enums::PhysicsKind::OrbitalTwoBody
            };
            let distance = if ea.is_alive() && eb.is_alive() && geodetic(ea) && geodetic(eb) {
                ea.geo.haversine_to(&eb.geo)
            } else {
                (ea.position_ecef(world.t) - eb.position_ecef(world.t)).length()
            };
            distance <= *range
        }
        Trigger::Detection { sensor, target } => world
            .entity_by_id(sensor)
            .map_or(false, |s| {
                s.radar.enabled
                    && s.radar.detections.iter().any(|d| &d.target_id == target)
            }),
    }
}

fn apply_action(world: &mut World, event_name: &str, action: &Action) {
    match action {
        Action::Message { text } => {
            info!(event = event_name, "{text}");
        }
        Action::ChangeRules { target, value } => {
            set_rules(world, event_name, target, value);
        }
        Action::SetState {
            target,
            field,
            value,
        } => match field.as_str() {
            "engagementRules" => set_rules(world, event_name, target, value),
            "active" => {
                let Some(e) = world.entity_by_id_mut(target) else {
                    return;
                };
                // Flags only move one way; a script cannot resurrect.
                if value == "true" && !e.active {
                    warn!(event = event_name, entity = target, "ignoring reactivation");
                } else if value != "true" {
                    e.active = false;
                }
            }
            "destroyed" => {
                let Some(e) = world.entity_by_id_mut(target) else {
                    return;
                };
                if value == "true" {
                    e.destroyed = true;
                } else if e.destroyed {
                    warn!(event = event_name, entity = target, "ignoring resurrection");
                }
            }
            other => {
                warn!(event = event_name, field = other, "unknown set_state field");
            }
        },
    }
}

fn set_rules(world: &mut World, event_name: &str, target: &str, value: &str) {
    let rules = match value {
        "weapons_free" => EngagementRules::WeaponsFree,
        "weapons_hold" => EngagementRules::WeaponsHold,
        "weapons_tight" => EngagementRules::WeaponsTight,
        other => {
            warn!(event = event_name, value = other, "unknown engagement rules");
            return;
        }
    };
    if let Some(e) = world.entity_by_id_mut(target) {
        e.rules = rules;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::entity::Detection;
    use vanguard_core::enums::PhysicsKind;
    use vanguard_core::events::ScriptedEvent;
    use vanguard_core::geo::Geodetic;
    use vanguard_core::Entity;

    fn site(id: &str, lon: f64) -> Entity {
        let mut e = Entity::new(id, id.to_uppercase(), "site", "blue");
        e.physics = PhysicsKind::Static;
        e.geo = Geodetic::new(0.0, lon, 0.0);
        e
    }

    #[test]
    fn time_trigger_fires_once() {
        let mut world = World::new(1);
        world.add_entity(site("a", 0.0)).unwrap();
        world.events.push(ScriptedEvent::new(
            "e1",
            "hold fire",
            Trigger::Time { at: 10.0 },
            Action::ChangeRules {
                target: "a".into(),
                value: "weapons_hold".into(),
            },
        ));

        world.t = 5.0;
        run(&mut world);
        assert!(!world.events[0].fired);
        assert_eq!(world.entity(0).rules, EngagementRules::WeaponsFree);

        world.t = 10.0;
        run(&mut world);
        assert!(world.events[0].fired);
        assert_eq!(world.entity(0).rules, EngagementRules::WeaponsHold);

        // Flip the rules back by hand; the latched event must not re-fire.
        world.entity_mut(0).rules = EngagementRules::WeaponsFree;
        world.t = 20.0;
        run(&mut world);
        assert_eq!(world.entity(0).rules, EngagementRules::WeaponsFree);
    }

    #[test]
    fn proximity_trigger_uses_haversine_for_geodetic_pairs() {
        let mut world = World::new(1);
        world.add_entity(site("a", 0.0)).unwrap();
        world.add_entity(site("b", 1.0)).unwrap(); // ~111 km
        world.events.push(ScriptedEvent::new(
            "e1",
            "close",
            Trigger::Proximity {
                a: "a".into(),
                b: "b".into(),
                range: 120_000.0,
            },
            Action::SetState {
                target: "b".into(),
                field: "destroyed".into(),
                value: "true".into(),
            },
        ));
        run(&mut world);
        assert!(world.events[0].fired);
        assert!(world.entity(1).destroyed);
    }

    #[test]
    fn detection_trigger_reads_current_detections() {
        let mut world = World::new(1);
        let mut sensor = site("radar", 0.0);
        sensor.radar.enabled = true;
        world.add_entity(sensor).unwrap();
        world.add_entity(site("tgt", 1.0)).unwrap();
        world.events.push(ScriptedEvent::new(
            "e1",
            "spotted",
            Trigger::Detection {
                sensor: "radar".into(),
                target: "tgt".into(),
            },
            Action::Message {
                text: "contact".into(),
            },
        ));

        run(&mut world);
        assert!(!world.events[0].fired);

        world.entity_mut(0).radar.detections.push(Detection {
            target_id: "tgt".into(),
            range: 1.0,
            bearing: 0.0,
            time: 0.0,
        });
        run(&mut world);
        assert!(world.events[0].fired);
    }

    #[test]
    fn set_state_cannot_resurrect() {
        let mut world = World::new(1);
        let mut e = site("a", 0.0);
        e.mark_destroyed();
        world.add_entity(e).unwrap();
        world.events.push(ScriptedEvent::new(
            "e1",
            "revive attempt",
            Trigger::Time { at: 0.0 },
            Action::SetState {
                target: "a".into(),
                field: "active".into(),
                value: "true".into(),
            },
        ));
        run(&mut world);
        assert!(world.events[0].fired);
        assert!(!world.entity(0).active, "death flags are monotonic");
    }
}
