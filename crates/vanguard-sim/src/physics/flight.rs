//! 3-DOF point-mass flight dynamics.
//!
//! Speed / flight-path-angle / heading equations integrated by forward
//! Euler, with the US-76 atmosphere supplying density and Mach. Position
//! advances along the great circle; altitude integrates the vertical
//! component. Post-step clamps keep the state inside the controllable
//! envelope.

use std::f64::consts::{PI, TAU};

use vanguard_core::constants::{
    AFTERBURNER_THROTTLE, G0, MAX_FLIGHT_PATH_ANGLE, MIN_AIRSPEED, SEA_LEVEL_DENSITY,
    THRUST_LAPSE_EXPONENT, WAVE_DRAG_ONSET_MACH, WAVE_DRAG_SCALE,
};
use vanguard_core::entity::Entity;

use crate::atmosphere;

/// Advance a flight entity by dt seconds.
pub fn step(entity: &mut Entity, dt: f64) {
    let atmo = atmosphere::sample(entity.geo.alt_m);
    let airframe = entity.airframe;
    let mut flight = entity.flight;

    let v = flight.tas.max(1e-6);
    flight.mach = v / atmo.speed_of_sound;
    let q = 0.5 * atmo.density * v * v;

    let cl = (airframe.cl_alpha * flight.alpha).clamp(-airframe.cl_max, airframe.cl_max);
    let mut cd = airframe.cd0 + cl * cl / (PI * airframe.oswald * airframe.aspect_ratio);
    if flight.mach > WAVE_DRAG_ONSET_MACH {
        cd += WAVE_DRAG_SCALE * (flight.mach - WAVE_DRAG_ONSET_MACH).powi(2);
    }

    let lift = q * airframe.wing_area * cl;
    let drag = q * airframe.wing_area * cd;
    let thrust = if flight.engine_on {
        let base = if flight.throttle <= AFTERBURNER_THROTTLE {
            airframe.thrust_mil
        } else {
            airframe.thrust_ab
        };
        flight.throttle * base * (atmo.density / SEA_LEVEL_DENSITY).powf(THRUST_LAPSE_EXPONENT)
    } else {
        0.0
    };

    let mass = airframe.mass;
    let v_dot = (thrust * flight.alpha.cos() - drag) / mass - G0 * flight.gamma.sin();
    let gamma_dot = if flight.tas > 1.0 {
        (lift * flight.bank.cos() + thrust * flight.alpha.sin()
            - mass * G0 * flight.gamma.cos())
            / (mass * flight.tas)
    } else {
        0.0
    };
    let psi_dot = if flight.tas > 1.0 && flight.gamma.cos().abs() > 0.01 {
        lift * flight.bank.sin() / (mass * flight.tas * flight.gamma.cos())
    } else {
        0.0
    };

    flight.tas += v_dot * dt;
    flight.gamma += gamma_dot * dt;
    flight.heading += psi_dot * dt;

    flight.tas = flight.tas.max(MIN_AIRSPEED);
    flight.gamma = flight
        .gamma
        .clamp(-MAX_FLIGHT_PATH_ANGLE, MAX_FLIGHT_PATH_ANGLE);
    flight.heading = flight.heading.rem_euclid(TAU);

    let ground_distance = flight.tas * flight.gamma.cos() * dt;
    let dest = entity.geo.destination(flight.heading, ground_distance);
    entity.geo.lat_deg = dest.lat_deg;
    entity.geo.lon_deg = dest.lon_deg;
    entity.geo.alt_m = (entity.geo.alt_m + flight.tas * flight.gamma.sin() * dt).max(0.0);

    entity.flight = flight;
}
