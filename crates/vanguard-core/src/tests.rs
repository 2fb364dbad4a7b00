//! Cross-module tests for the core vocabulary.

use crate::entity::Entity;
use crate::enums::*;

#[test]
fn death_flags_only_move_one_way() {
    let mut e = Entity::new("sat-1", "SAT 1", "satellite", "red");
    assert!(e.is_alive());
    e.mark_destroyed();
    assert!(!e.active);
    assert!(e.destroyed);
    assert!(!e.is_alive());
}

#[test]
fn engagement_result_wire_names() {
    assert_eq!(
        serde_json::to_string(&EngagementResult::KilledBy).unwrap(),
        "\"KILLED_BY\""
    );
    assert_eq!(
        serde_json::to_string(&EngagementResult::Launch).unwrap(),
        "\"LAUNCH\""
    );
}

#[test]
fn weapon_class_wire_names() {
    assert_eq!(
        serde_json::to_string(&WeaponClass::from(WeaponKind::KineticKill)).unwrap(),
        "\"KKV\""
    );
    assert_eq!(
        serde_json::to_string(&WeaponClass::from(WeaponKind::SamBattery)).unwrap(),
        "\"SAM\""
    );
    assert_eq!(
        serde_json::to_string(&WeaponClass::from(WeaponKind::A2aMissile)).unwrap(),
        "\"A2A\""
    );
    assert_eq!(
        serde_json::to_string(&WeaponClass::from(WeaponKind::None)).unwrap(),
        "\"UNK\""
    );
}

#[test]
fn engagement_rules_wire_names() {
    assert_eq!(
        serde_json::to_string(&EngagementRules::WeaponsFree).unwrap(),
        "\"weapons_free\""
    );
}

#[test]
fn entity_ecef_dispatches_on_physics_kind() {
    let mut e = Entity::new("g", "G", "site", "blue");
    e.physics = PhysicsKind::Static;
    e.geo = crate::geo::Geodetic::new(0.0, 0.0, 0.0);
    let p = e.position_ecef(0.0);
    // Equator/prime-meridian sits on the +X axis at the semi-major axis.
    assert!((p.x - crate::constants::WGS84_A).abs() < 1e-6);
    assert!(p.y.abs() < 1e-6);
    assert!(p.z.abs() < 1e-6);

    let mut sat = Entity::new("s", "S", "satellite", "blue");
    sat.physics = PhysicsKind::OrbitalTwoBody;
    sat.pos_eci = glam::DVec3::new(42_164_000.0, 0.0, 0.0);
    // At t = 0 GMST is zero, ECI and ECEF coincide.
    assert_eq!(sat.position_ecef(0.0), sat.pos_eci);
}
