//! Geodetic and frame-conversion helpers.
//!
//! Great-circle math runs on the mean-radius sphere; ECEF conversions use
//! the WGS-84 ellipsoid. ECI→ECEF rotates by Greenwich sidereal angle
//! θ = ω_earth · t with GMST ≡ 0 at t = 0.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_M, OMEGA_EARTH, WGS84_A, WGS84_E2};

/// Position on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Latitude in degrees, north positive.
    pub lat_deg: f64,
    /// Longitude in degrees, east positive.
    pub lon_deg: f64,
    /// Altitude above the ellipsoid in meters.
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Great-circle surface distance to another point (meters, haversine).
    pub fn haversine_to(&self, other: &Geodetic) -> f64 {
        let lat1 = self.lat_deg.to_radians();
        let lat2 = other.lat_deg.to_radians();
        let dlat = (other.lat_deg - self.lat_deg).to_radians();
        let dlon = (other.lon_deg - self.lon_deg).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Initial great-circle bearing to another point (radians, CW from north,
    /// wrapped to [0, 2π)).
    pub fn bearing_to(&self, other: &Geodetic) -> f64 {
        let lat1 = self.lat_deg.to_radians();
        let lat2 = other.lat_deg.to_radians();
        let dlon = (other.lon_deg - self.lon_deg).to_radians();
        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        y.atan2(x).rem_euclid(std::f64::consts::TAU)
    }

    /// Great-circle destination point given a bearing and ground distance.
    /// Altitude carries over unchanged.
    pub fn destination(&self, bearing_rad: f64, distance_m: f64) -> Geodetic {
        let lat1 = self.lat_deg.to_radians();
        let lon1 = self.lon_deg.to_radians();
        let delta = distance_m / EARTH_RADIUS_M;
        let lat2 =
            (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing_rad.cos()).asin();
        let lon2 = lon1
            + (bearing_rad.sin() * delta.sin() * lat1.cos())
                .atan2(delta.cos() - lat1.sin() * lat2.sin());
        Geodetic {
            lat_deg: lat2.to_degrees(),
            lon_deg: normalize_lon_deg(lon2.to_degrees()),
            alt_m: self.alt_m,
        }
    }

    /// WGS-84 geodetic → ECEF (meters).
    pub fn to_ecef(&self) -> DVec3 {
        let lat = self.lat_deg.to_radians();
        let lon = self.lon_deg.to_radians();
        let sin_lat = lat.sin();
        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        DVec3::new(
            (n + self.alt_m) * lat.cos() * lon.cos(),
            (n + self.alt_m) * lat.cos() * lon.sin(),
            (n * (1.0 - WGS84_E2) + self.alt_m) * sin_lat,
        )
    }
}

/// ECEF → WGS-84 geodetic (Bowring's closed-form approximation; centimeter
/// accuracy near the surface, more than enough for bearings and replay).
pub fn ecef_to_geodetic(p: DVec3) -> Geodetic {
    let b = WGS84_A * (1.0 - crate::constants::WGS84_F);
    let ep2 = (WGS84_A * WGS84_A - b * b) / (b * b);
    let r = (p.x * p.x + p.y * p.y).sqrt();
    let theta = (p.z * WGS84_A).atan2(r * b);
    let lat = (p.z + ep2 * b * theta.sin().powi(3))
        .atan2(r - WGS84_E2 * WGS84_A * theta.cos().powi(3));
    let lon = p.y.atan2(p.x);
    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = if lat.cos().abs() > 1e-9 {
        r / lat.cos() - n
    } else {
        p.z.abs() - b
    };
    Geodetic {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        alt_m: alt,
    }
}

/// Greenwich sidereal angle at simulated time t (radians).
pub fn gmst_rad(t: f64) -> f64 {
    (OMEGA_EARTH * t).rem_euclid(std::f64::consts::TAU)
}

/// Rotate an ECI vector into ECEF at simulated time t.
pub fn eci_to_ecef(v: DVec3, t: f64) -> DVec3 {
    let theta = gmst_rad(t);
    let (sin_t, cos_t) = theta.sin_cos();
    DVec3::new(
        v.x * cos_t + v.y * sin_t,
        -v.x * sin_t + v.y * cos_t,
        v.z,
    )
}

/// Wrap a longitude into [-180, 180).
fn normalize_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
