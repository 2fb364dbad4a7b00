//! Enumeration types used throughout the simulation.
//!
//! Kind tags on the flat entity record replace virtual dispatch: each
//! system matches on its own tag and ignores entities that don't carry it.

use serde::{Deserialize, Serialize};

/// Physics model driving an entity's motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsKind {
    #[default]
    None,
    /// Analytical two-body Kepler propagation in ECI.
    OrbitalTwoBody,
    /// 3-DOF point-mass flight over the ellipsoid.
    Flight3Dof,
    /// Fixed ground installation.
    Static,
}

/// AI behavior attached to an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    #[default]
    None,
    OrbitalCombat,
    WaypointPatrol,
    Intercept,
}

/// Weapon system attached to an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    None,
    /// Sacrificial orbital kinetic-kill vehicle.
    KineticKill,
    /// Ground-based surface-to-air battery.
    SamBattery,
    /// Air-to-air missile loadout.
    A2aMissile,
}

/// Rules-of-engagement policy tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementRules {
    #[default]
    WeaponsFree,
    /// No weapon activity at all while in effect.
    WeaponsHold,
    WeaponsTight,
}

/// Role in the orbital-combat AI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitalRole {
    /// High-value asset; passive, never selects a target.
    Hva,
    /// Protects an assigned HVA inside its defense radius.
    Defender,
    /// Hunts enemy HVAs.
    Attacker,
    /// Screens friendly attackers against defenders and sweeps.
    Escort,
    /// Hunts enemy attackers and escorts.
    Sweep,
    #[default]
    None,
}

/// Guidance mode for the intercept AI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptMode {
    #[default]
    Pursuit,
    Lead,
    Stern,
}

/// SAM kill-chain phase: detect → track → engage → assess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamPhase {
    #[default]
    Detect,
    Track,
    Engage,
    Assess,
}

/// A2A engagement phase: lock → guide → assess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A2aPhase {
    #[default]
    Lock,
    Guide,
    Assess,
}

/// Outcome tag on an engagement-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementResult {
    Launch,
    Kill,
    Miss,
    KilledBy,
}

/// Weapon-family tag attached to harvested engagement records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponClass {
    #[serde(rename = "KKV")]
    Kkv,
    #[serde(rename = "SAM")]
    Sam,
    #[serde(rename = "A2A")]
    A2a,
    #[serde(rename = "UNK")]
    Unk,
}

impl From<WeaponKind> for WeaponClass {
    fn from(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::KineticKill => WeaponClass::Kkv,
            WeaponKind::SamBattery => WeaponClass::Sam,
            WeaponKind::A2aMissile => WeaponClass::A2a,
            WeaponKind::None => WeaponClass::Unk,
        }
    }
}
