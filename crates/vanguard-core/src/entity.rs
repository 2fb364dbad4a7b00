//! The flat entity record.
//!
//! Every simulated object — satellite, aircraft, ground installation — is
//! one `Entity` value. Per-system state lives in embedded plain-data
//! blocks; the kind tags select which systems act on the record. Entities
//! are never removed from the world: death is expressed through the
//! `active`/`destroyed` flags so indices and engagement history survive
//! for the whole run.

use std::collections::BTreeMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::geo::{self, Geodetic};

/// Classical orbital elements cached alongside the ECI state vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (m).
    pub sma: f64,
    /// Eccentricity.
    pub ecc: f64,
    /// Inclination (rad).
    pub inc: f64,
    /// Right ascension of the ascending node (rad).
    pub raan: f64,
    /// Argument of perigee (rad).
    pub arg_perigee: f64,
    /// Mean anomaly (rad).
    pub mean_anomaly: f64,
}

/// 3-DOF flight state: speed/γ/ψ point-mass variables plus pilot controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightState {
    /// True airspeed (m/s).
    pub tas: f64,
    /// Heading (rad, clockwise from north, [0, 2π)).
    pub heading: f64,
    /// Flight-path angle (rad, positive climbing).
    pub gamma: f64,
    /// Bank angle (rad).
    pub bank: f64,
    /// Angle of attack (rad).
    pub alpha: f64,
    /// Mach number (updated by the physics step).
    pub mach: f64,
    /// Throttle setting in [0, 1].
    pub throttle: f64,
    pub engine_on: bool,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            tas: 0.0,
            heading: 0.0,
            gamma: 0.0,
            bank: 0.0,
            alpha: 0.0,
            mach: 0.0,
            throttle: 0.7,
            engine_on: true,
        }
    }
}

/// Fixed airframe parameters (from the aircraft profile table).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Airframe {
    /// Mass (kg).
    pub mass: f64,
    /// Wing reference area (m^2).
    pub wing_area: f64,
    pub aspect_ratio: f64,
    /// Zero-lift drag coefficient.
    pub cd0: f64,
    /// Oswald efficiency factor.
    pub oswald: f64,
    /// Lift-curve slope (per radian).
    pub cl_alpha: f64,
    pub cl_max: f64,
    /// Military (dry) thrust at sea level (N).
    pub thrust_mil: f64,
    /// Afterburner thrust at sea level (N).
    pub thrust_ab: f64,
    pub g_limit: f64,
    /// Maximum angle of attack (rad).
    pub alpha_max: f64,
    /// Idle throttle fraction.
    pub idle_fraction: f64,
}

impl Default for Airframe {
    fn default() -> Self {
        // F-16-class placeholder; scenario construction overwrites this
        // from the profile table for every flight entity.
        Self {
            mass: 12_000.0,
            wing_area: 27.87,
            aspect_ratio: 3.2,
            cd0: 0.018,
            oswald: 0.85,
            cl_alpha: 5.73,
            cl_max: 1.6,
            thrust_mil: 76_300.0,
            thrust_ab: 127_000.0,
            g_limit: 9.0,
            alpha_max: 0.44,
            idle_fraction: 0.05,
        }
    }
}

/// One patrol waypoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
    /// Commanded speed at this leg (m/s); 0 means "hold current speed".
    pub speed: f64,
}

/// Waypoint-patrol AI state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatrolState {
    pub waypoints: Vec<Waypoint>,
    pub current: usize,
    /// Wrap to the first waypoint after the last, else hold the last.
    pub loop_route: bool,
}

/// Intercept AI state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterceptState {
    pub target_id: String,
    pub mode: InterceptMode,
    /// Slant range at which the engagement state flips (m); 0 disables.
    pub engage_range: f64,
    /// false = navigating, true = engaged.
    pub engaged: bool,
}

/// One radar detection, valid until the next sweep completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub target_id: String,
    /// Slant range (m).
    pub range: f64,
    /// Bearing in the radar's local tangent plane (rad, CW from north).
    pub bearing: f64,
    /// World time the sweep recorded this contact (s).
    pub time: f64,
}

/// Radar sensor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarState {
    pub enabled: bool,
    /// Maximum detection range (m).
    pub max_range: f64,
    pub fov_deg: f64,
    pub min_elevation_deg: f64,
    pub max_elevation_deg: f64,
    /// Seconds per full sweep.
    pub sweep_interval: f64,
    /// Accumulated time toward the next sweep (s).
    pub sweep_accum: f64,
    /// Per-sweep detection probability in [0, 1].
    pub p_detect: f64,
    pub detections: Vec<Detection>,
}

impl Default for RadarState {
    fn default() -> Self {
        Self {
            enabled: false,
            max_range: 100_000.0,
            fov_deg: 360.0,
            min_elevation_deg: -90.0,
            max_elevation_deg: 90.0,
            sweep_interval: 1.0,
            sweep_accum: 0.0,
            p_detect: 0.9,
            detections: Vec::new(),
        }
    }
}

/// One SAM engagement working through the kill chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamEngagement {
    pub target_id: String,
    pub phase: SamPhase,
    /// Remaining time in the current phase (s).
    pub phase_timer: f64,
    pub missiles_fired: u32,
}

/// SAM battery weapon state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamState {
    pub max_range: f64,
    pub min_range: f64,
    /// Interceptor fly-out speed (m/s), used for time-of-flight.
    pub missile_speed: f64,
    pub missiles_ready: u32,
    pub salvo_size: u32,
    pub pk_per_missile: f64,
    pub engagements: Vec<SamEngagement>,
}

impl Default for SamState {
    fn default() -> Self {
        Self {
            max_range: 100_000.0,
            min_range: 1_000.0,
            missile_speed: 1_000.0,
            missiles_ready: 0,
            salvo_size: 1,
            pk_per_missile: 0.7,
            engagements: Vec::new(),
        }
    }
}

/// Performance record for one named A2A weapon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub range: f64,
    pub pk: f64,
    pub speed: f64,
}

/// One A2A engagement working through lock → guide → assess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aEngagement {
    pub target_id: String,
    pub phase: A2aPhase,
    pub phase_timer: f64,
    /// Which loadout weapon was committed to this shot.
    pub weapon: String,
}

/// Air-to-air weapon state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aState {
    /// Ordered loadout as declared in the scenario.
    pub loadout: Vec<String>,
    /// Remaining rounds per weapon name.
    pub inventory: BTreeMap<String, u32>,
    /// Performance table per weapon name.
    pub specs: BTreeMap<String, WeaponSpec>,
    pub engagements: Vec<A2aEngagement>,
    /// Seconds to achieve lock before launch.
    pub lock_time: f64,
}

impl Default for A2aState {
    fn default() -> Self {
        Self {
            loadout: Vec::new(),
            inventory: BTreeMap::new(),
            specs: BTreeMap::new(),
            engagements: Vec::new(),
            lock_time: 2.0,
        }
    }
}

/// Orbital-combat AI state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    pub role: OrbitalRole,
    /// Scan radius (m).
    pub sensor_range: f64,
    /// Radius around the assigned HVA a defender will protect (m).
    pub defense_radius: f64,
    /// Thrust authority (m/s^2).
    pub max_accel: f64,
    /// Range at which the weapon designator is set (m).
    pub kill_range: f64,
    /// Seconds between scans.
    pub scan_interval: f64,
    pub scan_accum: f64,
    /// HVA this entity defends (defender role).
    pub hva_id: String,
    /// Current maneuver target.
    pub target_id: String,
    /// Target handed to the weapon system, set when inside kill range.
    pub weapon_target_id: String,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            role: OrbitalRole::None,
            sensor_range: 1_000_000.0,
            defense_radius: 500_000.0,
            max_accel: 1.0,
            kill_range: 100_000.0,
            scan_interval: 1.0,
            scan_accum: 0.0,
            hva_id: String::new(),
            target_id: String::new(),
            weapon_target_id: String::new(),
        }
    }
}

/// Kinetic-kill weapon state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticState {
    pub pk: f64,
    pub kill_range: f64,
    /// Cooldown applied after a miss (s).
    pub cooldown_time: f64,
    pub cooldown_timer: f64,
    /// Last target a LAUNCH was logged against.
    pub last_target: String,
}

impl Default for KineticState {
    fn default() -> Self {
        Self {
            pk: 0.7,
            kill_range: 50_000.0,
            cooldown_time: 10.0,
            cooldown_timer: 0.0,
            last_target: String::new(),
        }
    }
}

/// Append-only engagement-log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub target_id: String,
    pub target_name: String,
    pub result: EngagementResult,
    /// World time the record was appended (s).
    pub time: f64,
}

/// A simulated object. One flat record; systems dispatch on the kind tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Free-form type tag from the scenario ("satellite", "fighter", ...).
    pub kind: String,
    pub team: String,

    /// Participating in the simulation. Once false, never true again.
    pub active: bool,
    /// Killed. Once true, never false again.
    pub destroyed: bool,

    pub physics: PhysicsKind,
    pub ai: AiKind,
    pub weapon: WeaponKind,
    pub rules: EngagementRules,

    /// ECI position (m), orbital entities only.
    pub pos_eci: DVec3,
    /// ECI velocity (m/s), orbital entities only.
    pub vel_eci: DVec3,
    pub elements: OrbitalElements,

    pub geo: Geodetic,

    pub flight: FlightState,
    pub airframe: Airframe,

    pub patrol: PatrolState,
    pub intercept: InterceptState,
    pub radar: RadarState,
    pub sam: SamState,
    pub a2a: A2aState,
    pub combat: CombatState,
    pub kinetic: KineticState,

    /// Append-only engagement history.
    pub log: Vec<EngagementRecord>,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            team: team.into(),
            active: true,
            destroyed: false,
            physics: PhysicsKind::None,
            ai: AiKind::None,
            weapon: WeaponKind::None,
            rules: EngagementRules::default(),
            pos_eci: DVec3::ZERO,
            vel_eci: DVec3::ZERO,
            elements: OrbitalElements::default(),
            geo: Geodetic::default(),
            flight: FlightState::default(),
            airframe: Airframe::default(),
            patrol: PatrolState::default(),
            intercept: InterceptState::default(),
            radar: RadarState::default(),
            sam: SamState::default(),
            a2a: A2aState::default(),
            combat: CombatState::default(),
            kinetic: KineticState::default(),
            log: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.active && !self.destroyed
    }

    /// Kill this entity. Flags only move one way.
    pub fn mark_destroyed(&mut self) {
        self.active = false;
        self.destroyed = true;
    }

    /// Position in ECEF at world time t. Orbital entities rotate their ECI
    /// state by the sidereal angle; everything else converts from geodetic.
    pub fn position_ecef(&self, t: f64) -> DVec3 {
        match self.physics {
            PhysicsKind::OrbitalTwoBody => geo::eci_to_ecef(self.pos_eci, t),
            _ => self.geo.to_ecef(),
        }
    }

    /// Append an engagement-log record.
    pub fn log_engagement(
        &mut self,
        target_id: impl Into<String>,
        target_name: impl Into<String>,
        result: EngagementResult,
        time: f64,
    ) {
        self.log.push(EngagementRecord {
            target_id: target_id.into(),
            target_name: target_name.into(),
            result,
            time,
        });
    }
}
