//! Built-in scenario presets.
//!
//! Self-contained scenario trees for smoke runs and demos, built from
//! the same document types the JSON reader produces. Each preset is a
//! small, readable battle with a known shape.

use crate::scenario::{
    AiDoc, ComponentsDoc, ControlDoc, ElementsDoc, EntityDoc, EventDoc, InitialStateDoc,
    PhysicsDoc, ScenarioDoc, SensorsDoc, TriggerDoc, WaypointDoc, WeaponsDoc, ActionDoc,
};

/// Look up a preset scenario by name.
pub fn preset(name: &str) -> Option<ScenarioDoc> {
    match name {
        "orbital_skirmish" => Some(orbital_skirmish()),
        "strike_package" => Some(strike_package()),
        "air_patrol" => Some(air_patrol()),
        _ => None,
    }
}

/// Names of all built-in presets.
pub fn preset_names() -> &'static [&'static str] {
    &["orbital_skirmish", "strike_package", "air_patrol"]
}

fn geo_elements(mean_anomaly_deg: f64) -> ElementsDoc {
    ElementsDoc {
        sma: 42_164_000.0,
        ecc: 0.0,
        inc: 0.0,
        raan: 0.0,
        arg_perigee: 0.0,
        mean_anomaly: mean_anomaly_deg,
    }
}

fn orbital_combatant(
    id: &str,
    name: &str,
    team: &str,
    role: &str,
    anomaly_deg: f64,
    hva_id: &str,
) -> EntityDoc {
    EntityDoc {
        id: id.into(),
        name: name.into(),
        kind: "satellite".into(),
        team: team.into(),
        components: ComponentsDoc {
            physics: Some(PhysicsDoc {
                kind: "orbital_2body".into(),
                elements: Some(geo_elements(anomaly_deg)),
                ..Default::default()
            }),
            ai: Some(AiDoc {
                kind: "orbital_combat".into(),
                role: role.into(),
                sensor_range: Some(5_000_000.0),
                defense_radius: Some(1_000_000.0),
                max_accel: Some(2.0),
                kill_range: Some(200_000.0),
                scan_interval: Some(1.0),
                hva_id: hva_id.into(),
                ..Default::default()
            }),
            weapons: (role != "hva").then(|| WeaponsDoc {
                kind: "kinetic_kill".into(),
                pk: Some(0.8),
                kill_range: Some(200_000.0),
                cooldown: Some(15.0),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Guardians versus hunters around a geostationary high-value asset.
/// Red attackers close from a trailing anomaly while a red escort
/// screens them against the blue defenders.
fn orbital_skirmish() -> ScenarioDoc {
    ScenarioDoc {
        entities: vec![
            orbital_combatant("keystone", "Keystone", "blue", "hva", 0.0, ""),
            orbital_combatant("warden-1", "Warden 1", "blue", "defender", 0.3, "keystone"),
            orbital_combatant("warden-2", "Warden 2", "blue", "defender", -0.3, "keystone"),
            orbital_combatant("reaper-1", "Reaper 1", "red", "attacker", 3.0, ""),
            orbital_combatant("reaper-2", "Reaper 2", "red", "attacker", 3.4, ""),
            orbital_combatant("shade-1", "Shade 1", "red", "escort", 3.2, ""),
        ],
        events: vec![EventDoc {
            id: "sim-start".into(),
            name: "skirmish start".into(),
            trigger: TriggerDoc {
                kind: "time".into(),
                time: 0.0,
                ..Default::default()
            },
            action: ActionDoc {
                kind: "message".into(),
                message: "orbital skirmish underway".into(),
                ..Default::default()
            },
        }],
    }
}

/// A two-bomber raid against a SAM site, with a hostile escort sweeping
/// ahead and a friendly interceptor scrambled against the lead bomber.
/// The battery starts cold and goes weapons free when the raid closes
/// inside its engagement ring.
fn strike_package() -> ScenarioDoc {
    let bomber = |id: &str, name: &str, lat: f64| EntityDoc {
        id: id.into(),
        name: name.into(),
        kind: "bomber".into(),
        team: "red".into(),
        initial_state: InitialStateDoc {
            lat,
            lon: 1.8,
            alt: 9_000.0,
            speed: 240.0,
            heading: 270.0,
            ..Default::default()
        },
        components: ComponentsDoc {
            physics: Some(PhysicsDoc {
                kind: "flight3dof".into(),
                config: "bomber_fast".into(),
                ..Default::default()
            }),
            ai: Some(AiDoc {
                kind: "waypoint_patrol".into(),
                waypoints: vec![WaypointDoc {
                    lat: 0.0,
                    lon: 0.0,
                    alt: 9_000.0,
                    speed: 240.0,
                }],
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    ScenarioDoc {
        entities: vec![
            EntityDoc {
                id: "castle".into(),
                name: "Castle".into(),
                kind: "sam_site".into(),
                team: "blue".into(),
                engagement_rules: "weapons_hold".into(),
                components: ComponentsDoc {
                    sensors: Some(SensorsDoc {
                        kind: "radar".into(),
                        max_range: Some(250_000.0),
                        detection_probability: Some(0.95),
                        scan_rate_dps: Some(360.0),
                        ..Default::default()
                    }),
                    weapons: Some(WeaponsDoc {
                        kind: "sam_battery".into(),
                        max_range: Some(140_000.0),
                        min_range: Some(4_000.0),
                        missile_speed: Some(1_200.0),
                        missiles: Some(12),
                        salvo_size: Some(2),
                        pk_per_missile: Some(0.7),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            },
            bomber("raid-1", "Raid 1", 0.05),
            bomber("raid-2", "Raid 2", -0.05),
            EntityDoc {
                id: "flanker-1".into(),
                name: "Flanker 1".into(),
                kind: "fighter".into(),
                team: "red".into(),
                initial_state: InitialStateDoc {
                    lat: 0.0,
                    lon: 2.0,
                    alt: 10_000.0,
                    speed: 300.0,
                    heading: 270.0,
                    ..Default::default()
                },
                components: ComponentsDoc {
                    physics: Some(PhysicsDoc {
                        kind: "flight3dof".into(),
                        config: "su35".into(),
                        ..Default::default()
                    }),
                    ai: Some(AiDoc {
                        kind: "intercept".into(),
                        target_id: "viper-1".into(),
                        engage_range: Some(60_000.0),
                        ..Default::default()
                    }),
                    sensors: Some(SensorsDoc {
                        kind: "radar".into(),
                        max_range: Some(120_000.0),
                        detection_probability: Some(0.85),
                        scan_rate_dps: Some(720.0),
                        ..Default::default()
                    }),
                    weapons: Some(WeaponsDoc {
                        kind: "fighter_loadout".into(),
                        loadout: vec![
                            "r77".into(),
                            "r77".into(),
                            "r73".into(),
                            "r73".into(),
                        ],
                        lock_time: Some(2.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            },
            EntityDoc {
                id: "viper-1".into(),
                name: "Viper 1".into(),
                kind: "fighter".into(),
                team: "blue".into(),
                initial_state: InitialStateDoc {
                    lat: 0.0,
                    lon: 0.3,
                    alt: 8_000.0,
                    speed: 280.0,
                    heading: 90.0,
                    ..Default::default()
                },
                components: ComponentsDoc {
                    physics: Some(PhysicsDoc {
                        kind: "flight3dof".into(),
                        config: "f16".into(),
                        ..Default::default()
                    }),
                    ai: Some(AiDoc {
                        kind: "intercept".into(),
                        target_id: "raid-1".into(),
                        engage_range: Some(70_000.0),
                        ..Default::default()
                    }),
                    sensors: Some(SensorsDoc {
                        kind: "radar".into(),
                        max_range: Some(150_000.0),
                        detection_probability: Some(0.9),
                        scan_rate_dps: Some(720.0),
                        ..Default::default()
                    }),
                    weapons: Some(WeaponsDoc {
                        kind: "fighter_loadout".into(),
                        loadout: vec![
                            "aim120".into(),
                            "aim120".into(),
                            "aim120".into(),
                            "aim9".into(),
                            "aim9".into(),
                        ],
                        lock_time: Some(1.5),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            },
        ],
        events: vec![
            EventDoc {
                id: "raid-warning".into(),
                name: "raid warning".into(),
                trigger: TriggerDoc {
                    kind: "detection".into(),
                    a: "castle".into(),
                    b: "raid-1".into(),
                    ..Default::default()
                },
                action: ActionDoc {
                    kind: "message".into(),
                    message: "raid leader on scope".into(),
                    ..Default::default()
                },
            },
            EventDoc {
                id: "castle-free".into(),
                name: "castle weapons free".into(),
                trigger: TriggerDoc {
                    kind: "proximity".into(),
                    a: "castle".into(),
                    b: "raid-1".into(),
                    range: 130_000.0,
                    ..Default::default()
                },
                action: ActionDoc {
                    kind: "change_rules".into(),
                    target: "castle".into(),
                    value: "weapons_free".into(),
                    ..Default::default()
                },
            },
        ],
    }
}

/// A single aircraft flying the auto-installed racetrack. Useful as a
/// quiet baseline for replay output and flight-model checks.
fn air_patrol() -> ScenarioDoc {
    ScenarioDoc {
        entities: vec![EntityDoc {
            id: "patrol-1".into(),
            name: "Patrol 1".into(),
            kind: "fighter".into(),
            team: "blue".into(),
            initial_state: InitialStateDoc {
                lat: 35.0,
                lon: -117.0,
                alt: 6_000.0,
                speed: 230.0,
                heading: 0.0,
                ..Default::default()
            },
            components: ComponentsDoc {
                physics: Some(PhysicsDoc {
                    kind: "flight3dof".into(),
                    config: "f16".into(),
                    ..Default::default()
                }),
                control: Some(ControlDoc {
                    kind: "player_input".into(),
                }),
                ..Default::default()
            },
            ..Default::default()
        }],
        events: Vec::new(),
    }
}
