//! AI systems — run first in the tick, before physics.
//!
//! None of these consult the RNG; the determinism contract reserves all
//! draws for sensors and weapons.

pub mod intercept;
pub mod orbital_combat;
pub mod waypoint;

use vanguard_core::constants::{MAX_ALPHA_COMMAND, MAX_BANK_COMMAND};
use vanguard_core::entity::FlightState;
use vanguard_core::enums::AiKind;
use vanguard_core::World;

/// Run the AI pass over all entities in insertion order.
pub fn run(world: &mut World, dt: f64) {
    for idx in 0..world.entity_count() {
        if !world.entity(idx).is_alive() {
            continue;
        }
        match world.entity(idx).ai {
            AiKind::OrbitalCombat => orbital_combat::update(world, idx, dt),
            AiKind::WaypointPatrol => waypoint::update(world.entity_mut(idx), dt),
            AiKind::Intercept => intercept::update(world, idx, dt),
            AiKind::None => {}
        }
    }
}

/// Wrap an angle difference into [-π, π].
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI
}

/// Shared steering law for waypoint patrol and intercept: bank toward the
/// commanded bearing, trim angle of attack against the altitude error.
pub(crate) fn steer(flight: &mut FlightState, bearing: f64, alt_error: f64, dt: f64) {
    let heading_error = wrap_pi(bearing - flight.heading);
    let roll_command = (2.0 * heading_error).clamp(-MAX_BANK_COMMAND, MAX_BANK_COMMAND);
    flight.bank += (roll_command - flight.bank) * (3.0 * dt).min(1.0);
    flight.alpha = (0.001 * alt_error).clamp(-MAX_ALPHA_COMMAND, MAX_ALPHA_COMMAND);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_pi_symmetric() {
        assert!((wrap_pi(0.0)).abs() < 1e-12);
        assert!((wrap_pi(3.5 * std::f64::consts::PI) - (-0.5 * std::f64::consts::PI)).abs() < 1e-9);
        assert!((wrap_pi(-3.5 * std::f64::consts::PI) - (0.5 * std::f64::consts::PI)).abs() < 1e-9);
    }

    #[test]
    fn steer_clamps_roll_command() {
        let mut flight = FlightState::default();
        steer(&mut flight, std::f64::consts::PI, 0.0, 10.0);
        assert!(flight.bank.abs() <= MAX_BANK_COMMAND + 1e-12);
    }

    #[test]
    fn steer_trims_alpha_against_altitude_error() {
        let mut flight = FlightState::default();
        steer(&mut flight, 0.0, 50.0, 0.1);
        assert!((flight.alpha - 0.05).abs() < 1e-12);
        steer(&mut flight, 0.0, -10_000.0, 0.1);
        assert_eq!(flight.alpha, -MAX_ALPHA_COMMAND);
    }
}
