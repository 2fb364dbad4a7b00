//! Scenario → world construction.
//!
//! Deserializes the declarative scenario tree and builds the entity
//! records. Malformed component types warn and degrade (unknown aircraft
//! → f16, unknown weapon/AI → ignored); only a duplicate entity id is
//! fatal to the run.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use vanguard_core::entity::{Entity, WeaponSpec, Waypoint};
use vanguard_core::enums::*;
use vanguard_core::error::WorldError;
use vanguard_core::events::{Action, ScriptedEvent, Trigger};
use vanguard_core::geo::Geodetic;
use vanguard_core::World;

use crate::physics::orbital;
use crate::profiles;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ── Input tree ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioDoc {
    pub entities: Vec<EntityDoc>,
    pub events: Vec<EventDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntityDoc {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub team: String,
    #[serde(rename = "initialState")]
    pub initial_state: InitialStateDoc,
    pub components: ComponentsDoc,
    #[serde(rename = "engagementRules")]
    pub engagement_rules: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InitialStateDoc {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub speed: f64,
    /// Degrees clockwise from north.
    pub heading: f64,
    /// Degrees, positive climbing.
    pub gamma: f64,
    pub throttle: f64,
    #[serde(rename = "engineOn")]
    pub engine_on: bool,
}

impl Default for InitialStateDoc {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            alt: 0.0,
            speed: 0.0,
            heading: 0.0,
            gamma: 0.0,
            throttle: 0.7,
            engine_on: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentsDoc {
    pub physics: Option<PhysicsDoc>,
    pub ai: Option<AiDoc>,
    pub sensors: Option<SensorsDoc>,
    pub weapons: Option<WeaponsDoc>,
    pub control: Option<ControlDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhysicsDoc {
    #[serde(rename = "type")]
    pub kind: String,
    pub elements: Option<ElementsDoc>,
    /// Aircraft profile name for flight3dof.
    pub config: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementsDoc {
    /// Semi-major axis (m).
    pub sma: f64,
    pub ecc: f64,
    /// Degrees.
    pub inc: f64,
    /// Degrees.
    pub raan: f64,
    /// Degrees.
    #[serde(rename = "argPerigee")]
    pub arg_perigee: f64,
    /// Degrees.
    #[serde(rename = "meanAnomaly")]
    pub mean_anomaly: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiDoc {
    #[serde(rename = "type")]
    pub kind: String,
    // orbital_combat
    pub role: String,
    #[serde(rename = "sensorRange_m", alias = "sensorRange")]
    pub sensor_range: Option<f64>,
    #[serde(rename = "defenseRadius_m", alias = "defenseRadius")]
    pub defense_radius: Option<f64>,
    #[serde(rename = "maxAccel_mps2", alias = "maxAccel")]
    pub max_accel: Option<f64>,
    #[serde(rename = "killRange_m", alias = "killRange")]
    pub kill_range: Option<f64>,
    #[serde(rename = "scanInterval_s", alias = "scanInterval")]
    pub scan_interval: Option<f64>,
    #[serde(rename = "hvaId")]
    pub hva_id: String,
    // waypoint_patrol
    pub waypoints: Vec<WaypointDoc>,
    #[serde(rename = "loop")]
    pub loop_route: bool,
    // intercept
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub mode: String,
    #[serde(rename = "engageRange_m", alias = "engageRange")]
    pub engage_range: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WaypointDoc {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SensorsDoc {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "maxRange_m", alias = "maxRange")]
    pub max_range: Option<f64>,
    #[serde(rename = "fov_deg", alias = "fov")]
    pub fov_deg: Option<f64>,
    #[serde(rename = "detectionProbability")]
    pub detection_probability: Option<f64>,
    #[serde(rename = "minElevation_deg", alias = "minElevation")]
    pub min_elevation_deg: Option<f64>,
    #[serde(rename = "maxElevation_deg", alias = "maxElevation")]
    pub max_elevation_deg: Option<f64>,
    /// Degrees per second; sweep_interval = 360 / rate.
    #[serde(rename = "scanRate_dps", alias = "scanRate")]
    pub scan_rate_dps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeaponsDoc {
    #[serde(rename = "type")]
    pub kind: String,
    // kinetic_kill
    pub pk: Option<f64>,
    #[serde(rename = "killRange_m", alias = "killRange")]
    pub kill_range: Option<f64>,
    #[serde(rename = "cooldown_s", alias = "cooldown")]
    pub cooldown: Option<f64>,
    // sam_battery
    #[serde(rename = "maxRange_m", alias = "maxRange")]
    pub max_range: Option<f64>,
    #[serde(rename = "minRange_m", alias = "minRange")]
    pub min_range: Option<f64>,
    #[serde(rename = "missileSpeed_mps", alias = "missileSpeed")]
    pub missile_speed: Option<f64>,
    #[serde(rename = "missiles", alias = "missilesReady")]
    pub missiles: Option<u32>,
    #[serde(rename = "salvoSize", alias = "salvo")]
    pub salvo_size: Option<u32>,
    #[serde(rename = "pkPerMissile")]
    pub pk_per_missile: Option<f64>,
    // a2a_missile / fighter_loadout
    pub loadout: Vec<String>,
    #[serde(rename = "lockTime_s", alias = "lockTime")]
    pub lock_time: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlDoc {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventDoc {
    pub id: String,
    pub name: String,
    pub trigger: TriggerDoc,
    pub action: ActionDoc,
}

/// Trigger keys accept both naming conventions: entityA/entityB and
/// entityId/targetId; range_m and range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TriggerDoc {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: f64,
    #[serde(rename = "entityA", alias = "entityId")]
    pub a: String,
    #[serde(rename = "entityB", alias = "targetId")]
    pub b: String,
    #[serde(rename = "range_m", alias = "range")]
    pub range: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionDoc {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "target", alias = "entityId")]
    pub target: String,
    pub field: String,
    pub value: String,
    #[serde(rename = "message", alias = "text")]
    pub message: String,
}

// ── Construction ──────────────────────────────────────────────────────

/// Parse a scenario document from JSON text.
pub fn parse(json: &str) -> Result<ScenarioDoc, ScenarioError> {
    Ok(serde_json::from_str(json)?)
}

/// Build a fresh world from a scenario. Fails only on duplicate ids.
pub fn build_world(doc: &ScenarioDoc, seed: u32) -> Result<World, ScenarioError> {
    let mut world = World::new(seed);
    for entity_doc in &doc.entities {
        world.add_entity(build_entity(entity_doc))?;
    }
    for event_doc in &doc.events {
        if let Some(event) = build_event(event_doc) {
            world.events.push(event);
        }
    }
    Ok(world)
}

fn build_entity(doc: &EntityDoc) -> Entity {
    let name = if doc.name.is_empty() {
        doc.id.clone()
    } else {
        doc.name.clone()
    };
    let mut entity = Entity::new(doc.id.clone(), name, doc.kind.clone(), doc.team.clone());

    entity.rules = match doc.engagement_rules.as_str() {
        "" | "weapons_free" => EngagementRules::WeaponsFree,
        "weapons_hold" => EngagementRules::WeaponsHold,
        "weapons_tight" => EngagementRules::WeaponsTight,
        other => {
            warn!(entity = %doc.id, rules = other, "unknown engagement rules, defaulting");
            EngagementRules::WeaponsFree
        }
    };

    let init = &doc.initial_state;
    entity.geo = Geodetic::new(init.lat, init.lon, init.alt);
    entity.flight.tas = init.speed;
    entity.flight.heading = init.heading.to_radians().rem_euclid(std::f64::consts::TAU);
    entity.flight.gamma = init.gamma.to_radians();
    entity.flight.throttle = init.throttle.clamp(0.0, 1.0);
    entity.flight.engine_on = init.engine_on;

    apply_physics(&mut entity, doc);
    if let Some(ai) = &doc.components.ai {
        apply_ai(&mut entity, ai);
    }
    if let Some(sensors) = &doc.components.sensors {
        apply_sensors(&mut entity, sensors);
    }
    if let Some(weapons) = &doc.components.weapons {
        apply_weapons(&mut entity, weapons);
    }
    if let Some(control) = &doc.components.control {
        apply_control(&mut entity, control);
    }

    entity
}

fn apply_physics(entity: &mut Entity, doc: &EntityDoc) {
    let Some(physics) = &doc.components.physics else {
        // No physics component: a fixed installation.
        entity.physics = PhysicsKind::Static;
        return;
    };
    match physics.kind.as_str() {
        "orbital_2body" => {
            let Some(elements) = &physics.elements else {
                warn!(entity = %doc.id, "orbital entity without elements, leaving inert");
                return;
            };
            entity.physics = PhysicsKind::OrbitalTwoBody;
            entity.elements.sma = elements.sma;
            entity.elements.ecc = elements.ecc;
            entity.elements.inc = elements.inc.to_radians();
            entity.elements.raan = elements.raan.to_radians();
            entity.elements.arg_perigee = elements.arg_perigee.to_radians();
            entity.elements.mean_anomaly = elements.mean_anomaly.to_radians();
            let (r, v) = orbital::state_from_elements(&entity.elements);
            entity.pos_eci = r;
            entity.vel_eci = v;
        }
        "flight3dof" => {
            entity.physics = PhysicsKind::Flight3Dof;
            let config = if physics.config.is_empty() {
                "f16"
            } else {
                physics.config.as_str()
            };
            entity.airframe = profiles::airframe(config);
        }
        "static" => entity.physics = PhysicsKind::Static,
        other => {
            warn!(entity = %doc.id, physics = other, "unknown physics type, ignoring");
        }
    }
}

fn apply_ai(entity: &mut Entity, ai: &AiDoc) {
    match ai.kind.as_str() {
        "orbital_combat" => {
            entity.ai = AiKind::OrbitalCombat;
            entity.combat.role = match ai.role.as_str() {
                "hva" => OrbitalRole::Hva,
                "defender" => OrbitalRole::Defender,
                "attacker" => OrbitalRole::Attacker,
                "escort" => OrbitalRole::Escort,
                "sweep" => OrbitalRole::Sweep,
                "" | "none" => OrbitalRole::None,
                other => {
                    warn!(role = other, "unknown orbital-combat role, using none");
                    OrbitalRole::None
                }
            };
            let d = vanguard_core::entity::CombatState::default();
            entity.combat.sensor_range = ai.sensor_range.unwrap_or(d.sensor_range);
            entity.combat.defense_radius = ai.defense_radius.unwrap_or(d.defense_radius);
            entity.combat.max_accel = ai.max_accel.unwrap_or(d.max_accel);
            entity.combat.kill_range = ai.kill_range.unwrap_or(d.kill_range);
            entity.combat.scan_interval = ai.scan_interval.unwrap_or(d.scan_interval);
            entity.combat.hva_id = ai.hva_id.clone();
        }
        "waypoint_patrol" => {
            entity.ai = AiKind::WaypointPatrol;
            entity.patrol.waypoints = ai
                .waypoints
                .iter()
                .map(|w| Waypoint {
                    lat_deg: w.lat,
                    lon_deg: w.lon,
                    alt_m: w.alt,
                    speed: w.speed,
                })
                .collect();
            entity.patrol.loop_route = ai.loop_route;
        }
        "intercept" => {
            entity.ai = AiKind::Intercept;
            entity.intercept.target_id = ai.target_id.clone();
            entity.intercept.mode = match ai.mode.as_str() {
                "" | "pursuit" => InterceptMode::Pursuit,
                "lead" => InterceptMode::Lead,
                "stern" => InterceptMode::Stern,
                other => {
                    warn!(mode = other, "unknown intercept mode, using pursuit");
                    InterceptMode::Pursuit
                }
            };
            entity.intercept.engage_range = ai.engage_range.unwrap_or(0.0);
        }
        other => {
            warn!(ai = other, "unknown AI type, ignoring");
        }
    }
}

fn apply_sensors(entity: &mut Entity, sensors: &SensorsDoc) {
    if sensors.kind != "radar" {
        warn!(sensor = %sensors.kind, "unknown sensor type, ignoring");
        return;
    }
    let d = vanguard_core::entity::RadarState::default();
    entity.radar.enabled = true;
    entity.radar.max_range = sensors.max_range.unwrap_or(d.max_range);
    entity.radar.fov_deg = sensors.fov_deg.unwrap_or(d.fov_deg);
    entity.radar.p_detect = sensors.detection_probability.unwrap_or(d.p_detect);
    entity.radar.min_elevation_deg = sensors.min_elevation_deg.unwrap_or(d.min_elevation_deg);
    entity.radar.max_elevation_deg = sensors.max_elevation_deg.unwrap_or(d.max_elevation_deg);
    entity.radar.sweep_interval = match sensors.scan_rate_dps {
        Some(rate) if rate > 0.0 => 360.0 / rate,
        _ => d.sweep_interval,
    };
}

fn apply_weapons(entity: &mut Entity, weapons: &WeaponsDoc) {
    match weapons.kind.as_str() {
        "kinetic_kill" => {
            entity.weapon = WeaponKind::KineticKill;
            let d = vanguard_core::entity::KineticState::default();
            entity.kinetic.pk = weapons.pk.unwrap_or(d.pk);
            entity.kinetic.kill_range = weapons.kill_range.unwrap_or(d.kill_range);
            entity.kinetic.cooldown_time = weapons.cooldown.unwrap_or(d.cooldown_time);
        }
        "sam_battery" => {
            entity.weapon = WeaponKind::SamBattery;
            let d = vanguard_core::entity::SamState::default();
            entity.sam.max_range = weapons.max_range.unwrap_or(d.max_range);
            entity.sam.min_range = weapons.min_range.unwrap_or(d.min_range);
            entity.sam.missile_speed = weapons.missile_speed.unwrap_or(d.missile_speed);
            entity.sam.missiles_ready = weapons.missiles.unwrap_or(d.missiles_ready);
            entity.sam.salvo_size = weapons.salvo_size.unwrap_or(d.salvo_size).max(1);
            entity.sam.pk_per_missile = weapons.pk_per_missile.unwrap_or(d.pk_per_missile);
        }
        "a2a_missile" | "fighter_loadout" => {
            entity.weapon = WeaponKind::A2aMissile;
            entity.a2a.loadout = weapons.loadout.clone();
            entity.a2a.lock_time = weapons.lock_time.unwrap_or(entity.a2a.lock_time);
            let mut inventory: BTreeMap<String, u32> = BTreeMap::new();
            for name in &weapons.loadout {
                *inventory.entry(name.clone()).or_insert(0) += 1;
            }
            entity.a2a.inventory = inventory;
            if entity.a2a.specs.is_empty() {
                entity.a2a.specs = default_weapon_catalog();
            }
        }
        other => {
            warn!(weapon = other, "unknown weapon type, ignoring");
        }
    }
}

/// Standard A2A catalog, installed when an entity brings no specs of its
/// own.
pub fn default_weapon_catalog() -> BTreeMap<String, WeaponSpec> {
    let mut specs = BTreeMap::new();
    specs.insert(
        "aim120".to_string(),
        WeaponSpec {
            range: 80_000.0,
            pk: 0.75,
            speed: 1_400.0,
        },
    );
    specs.insert(
        "r77".to_string(),
        WeaponSpec {
            range: 80_000.0,
            pk: 0.70,
            speed: 1_300.0,
        },
    );
    specs.insert(
        "aim9".to_string(),
        WeaponSpec {
            range: 18_000.0,
            pk: 0.85,
            speed: 900.0,
        },
    );
    specs.insert(
        "r73".to_string(),
        WeaponSpec {
            range: 18_000.0,
            pk: 0.80,
            speed: 850.0,
        },
    );
    specs
}

/// `player_input` control degrades to an automated racetrack in headless
/// runs: 50 km ahead, 20 km to the right, back.
fn apply_control(entity: &mut Entity, control: &ControlDoc) {
    if control.kind != "player_input" {
        warn!(control = %control.kind, "unknown control type, ignoring");
        return;
    }
    if entity.ai != AiKind::None {
        return; // explicit AI wins over the auto-patrol
    }

    let heading = entity.flight.heading;
    let right = heading + std::f64::consts::FRAC_PI_2;
    let p0 = entity.geo;
    let p1 = p0.destination(heading, 50_000.0);
    let p2 = p1.destination(right, 20_000.0);
    let p3 = p0.destination(right, 20_000.0);

    let wp = |g: Geodetic| Waypoint {
        lat_deg: g.lat_deg,
        lon_deg: g.lon_deg,
        alt_m: entity.geo.alt_m,
        speed: entity.flight.tas,
    };
    entity.ai = AiKind::WaypointPatrol;
    entity.patrol.waypoints = vec![wp(p1), wp(p2), wp(p3), wp(p0)];
    entity.patrol.loop_route = true;
}

fn build_event(doc: &EventDoc) -> Option<ScriptedEvent> {
    let trigger = match doc.trigger.kind.as_str() {
        "time" => Trigger::Time {
            at: doc.trigger.time,
        },
        "proximity" => Trigger::Proximity {
            a: doc.trigger.a.clone(),
            b: doc.trigger.b.clone(),
            range: doc.trigger.range,
        },
        "detection" => Trigger::Detection {
            sensor: doc.trigger.a.clone(),
            target: doc.trigger.b.clone(),
        },
        other => {
            warn!(event = %doc.id, trigger = other, "unknown trigger type, dropping event");
            return None;
        }
    };
    let action = match doc.action.kind.as_str() {
        "message" => Action::Message {
            text: doc.action.message.clone(),
        },
        "set_state" => Action::SetState {
            target: doc.action.target.clone(),
            field: doc.action.field.clone(),
            value: doc.action.value.clone(),
        },
        "change_rules" => Action::ChangeRules {
            target: doc.action.target.clone(),
            value: doc.action.value.clone(),
        },
        other => {
            warn!(event = %doc.id, action = other, "unknown action type, dropping event");
            return None;
        }
    };
    Some(ScriptedEvent::new(
        doc.id.clone(),
        if doc.name.is_empty() {
            doc.id.clone()
        } else {
            doc.name.clone()
        },
        trigger,
        action,
    ))
}
