//! Two-body orbital propagation.
//!
//! Analytical Kepler propagation in ECI: recover classical elements from
//! the state vector, advance the mean anomaly, solve Kepler's equation by
//! Newton iteration, and reconstruct the state. Degenerate or hyperbolic
//! states fall back to linear propagation; the caller never sees an error.

use glam::{DMat3, DVec3};

use vanguard_core::constants::{KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE, MU_EARTH};
use vanguard_core::entity::{Entity, OrbitalElements};

const SMALL: f64 = 1e-8;

/// Advance an orbital entity by dt seconds.
pub fn propagate(entity: &mut Entity, dt: f64) {
    let r = entity.pos_eci;
    let v = entity.vel_eci;

    // Degenerate state: leave it alone.
    if r.length() < 1_000.0 || v.length() < 0.1 {
        return;
    }

    let energy = v.length_squared() / 2.0 - MU_EARTH / r.length();
    if energy >= 0.0 {
        linear_fallback(entity, dt);
        return;
    }

    match kepler_step(r, v, dt) {
        Some((r2, v2, elements)) => {
            entity.pos_eci = r2;
            entity.vel_eci = v2;
            entity.elements = elements;
        }
        None => linear_fallback(entity, dt),
    }
}

/// Straight-line motion for states Kepler cannot handle.
fn linear_fallback(entity: &mut Entity, dt: f64) {
    entity.pos_eci += entity.vel_eci * dt;
}

/// One Kepler step. Returns None on any non-finite intermediate.
fn kepler_step(r: DVec3, v: DVec3, dt: f64) -> Option<(DVec3, DVec3, OrbitalElements)> {
    let mut el = elements_from_state(r, v)?;
    let n = (MU_EARTH / el.sma.powi(3)).sqrt();
    el.mean_anomaly = (el.mean_anomaly + n * dt).rem_euclid(std::f64::consts::TAU);

    let (r2, v2) = state_from_elements(&el);
    if !(r2.is_finite() && v2.is_finite()) {
        return None;
    }
    Some((r2, v2, el))
}

/// Classical elements from an ECI state vector (elliptical orbits only).
pub fn elements_from_state(r: DVec3, v: DVec3) -> Option<OrbitalElements> {
    let r_mag = r.length();
    let v_mag2 = v.length_squared();

    let energy = v_mag2 / 2.0 - MU_EARTH / r_mag;
    if energy >= 0.0 {
        return None;
    }
    let sma = -MU_EARTH / (2.0 * energy);

    let h = r.cross(v);
    let h_mag = h.length();
    if h_mag < SMALL {
        return None;
    }
    let node = DVec3::Z.cross(h);
    let node_mag = node.length();

    let e_vec = v.cross(h) / MU_EARTH - r / r_mag;
    let ecc = e_vec.length();

    let inc = (h.z / h_mag).clamp(-1.0, 1.0).acos();

    let raan = if node_mag > SMALL {
        let mut raan = (node.x / node_mag).clamp(-1.0, 1.0).acos();
        if node.y < 0.0 {
            raan = std::f64::consts::TAU - raan;
        }
        raan
    } else {
        0.0
    };

    let arg_perigee = if ecc > SMALL {
        if node_mag > SMALL {
            let mut w = (node.dot(e_vec) / (node_mag * ecc)).clamp(-1.0, 1.0).acos();
            if e_vec.z < 0.0 {
                w = std::f64::consts::TAU - w;
            }
            w
        } else {
            // Equatorial: measure perigee from the inertial X axis.
            e_vec.y.atan2(e_vec.x).rem_euclid(std::f64::consts::TAU)
        }
    } else {
        0.0
    };

    // True anomaly; circular orbits measure from the node (or X axis).
    let nu = if ecc > SMALL {
        let mut nu = (e_vec.dot(r) / (ecc * r_mag)).clamp(-1.0, 1.0).acos();
        if r.dot(v) < 0.0 {
            nu = std::f64::consts::TAU - nu;
        }
        nu
    } else if node_mag > SMALL {
        let mut u = (node.dot(r) / (node_mag * r_mag)).clamp(-1.0, 1.0).acos();
        if r.z < 0.0 {
            u = std::f64::consts::TAU - u;
        }
        u
    } else {
        let mut l = (r.x / r_mag).clamp(-1.0, 1.0).acos();
        if r.y < 0.0 {
            l = std::f64::consts::TAU - l;
        }
        l
    };

    // True → eccentric → mean anomaly.
    let denom = 1.0 + ecc * nu.cos();
    let sin_e = (1.0 - ecc * ecc).max(0.0).sqrt() * nu.sin() / denom;
    let cos_e = (ecc + nu.cos()) / denom;
    let ecc_anomaly = sin_e.atan2(cos_e);
    let mean_anomaly =
        (ecc_anomaly - ecc * ecc_anomaly.sin()).rem_euclid(std::f64::consts::TAU);

    let el = OrbitalElements {
        sma,
        ecc,
        inc,
        raan,
        arg_perigee,
        mean_anomaly,
    };
    if el.sma.is_finite() && el.ecc.is_finite() {
        Some(el)
    } else {
        None
    }
}

/// ECI state vector from classical elements.
pub fn state_from_elements(el: &OrbitalElements) -> (DVec3, DVec3) {
    let ecc_anomaly = solve_kepler(el.mean_anomaly, el.ecc);
    let (sin_e, cos_e) = ecc_anomaly.sin_cos();

    let nu = ((1.0 - el.ecc * el.ecc).max(0.0).sqrt() * sin_e).atan2(cos_e - el.ecc);
    let r_mag = el.sma * (1.0 - el.ecc * cos_e);
    let p = el.sma * (1.0 - el.ecc * el.ecc);

    let (sin_nu, cos_nu) = nu.sin_cos();
    let r_pf = DVec3::new(r_mag * cos_nu, r_mag * sin_nu, 0.0);
    let v_scale = (MU_EARTH / p).sqrt();
    let v_pf = DVec3::new(-v_scale * sin_nu, v_scale * (el.ecc + cos_nu), 0.0);

    // Perifocal → ECI: Rz(raan) · Rx(inc) · Rz(arg_perigee).
    let dcm = DMat3::from_rotation_z(el.raan)
        * DMat3::from_rotation_x(el.inc)
        * DMat3::from_rotation_z(el.arg_perigee);

    (dcm * r_pf, dcm * v_pf)
}

/// Solve Kepler's equation M = E − e·sin E by Newton iteration.
pub fn solve_kepler(mean_anomaly: f64, ecc: f64) -> f64 {
    let mut e_anom = mean_anomaly;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = e_anom - ecc * e_anom.sin() - mean_anomaly;
        let fp = 1.0 - ecc * e_anom.cos();
        let delta = f / fp;
        e_anom -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    e_anom
}

/// Orbital period for a semi-major axis (s).
pub fn period(sma: f64) -> f64 {
    std::f64::consts::TAU * (sma.powi(3) / MU_EARTH).sqrt()
}
