//! US Standard Atmosphere 1976.
//!
//! Seven gradient/isothermal layers up to 84 852 m geopotential; above
//! that, density decays exponentially with an 8 500 m scale height.

use vanguard_core::constants::{G0, GAMMA_AIR, R_AIR};

/// Effective Earth radius for the geometric→geopotential conversion (m).
const GEOPOTENTIAL_RADIUS: f64 = 6_356_766.0;

/// Geopotential altitude of the model top (m).
const MODEL_TOP: f64 = 84_852.0;

/// Scale height for the exponential tail above the model top (m).
const TAIL_SCALE_HEIGHT: f64 = 8_500.0;

/// Layer base: (geopotential altitude m, temperature K, lapse K/m, pressure Pa).
const LAYERS: [(f64, f64, f64, f64); 7] = [
    (0.0, 288.15, -0.0065, 101_325.0),
    (11_000.0, 216.65, 0.0, 22_632.06),
    (20_000.0, 216.65, 0.001, 5_474.889),
    (32_000.0, 228.65, 0.0028, 868.0187),
    (47_000.0, 270.65, 0.0, 110.9063),
    (51_000.0, 270.65, -0.0028, 66.938_87),
    (71_000.0, 214.65, -0.002, 3.956_42),
];

/// Atmospheric state at a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmoSample {
    /// Temperature (K).
    pub temperature: f64,
    /// Pressure (Pa).
    pub pressure: f64,
    /// Density (kg/m^3).
    pub density: f64,
    /// Speed of sound (m/s).
    pub speed_of_sound: f64,
}

/// Sample the standard atmosphere at a geometric altitude (m).
pub fn sample(alt_m: f64) -> AtmoSample {
    let alt_m = alt_m.max(0.0);
    let h = GEOPOTENTIAL_RADIUS * alt_m / (GEOPOTENTIAL_RADIUS + alt_m);

    if h > MODEL_TOP {
        // Exponential tail: hold the top-of-model temperature, decay density.
        let top = layered(MODEL_TOP);
        let density = top.density * (-(h - MODEL_TOP) / TAIL_SCALE_HEIGHT).exp();
        let pressure = density * R_AIR * top.temperature;
        return AtmoSample {
            temperature: top.temperature,
            pressure,
            density,
            speed_of_sound: speed_of_sound(top.temperature),
        };
    }

    layered(h)
}

/// Evaluate the 7-layer model at a geopotential altitude within it.
fn layered(h: f64) -> AtmoSample {
    let mut layer = LAYERS[0];
    for candidate in LAYERS.iter().skip(1) {
        if h >= candidate.0 {
            layer = *candidate;
        } else {
            break;
        }
    }
    let (h_base, t_base, lapse, p_base) = layer;

    let (temperature, pressure) = if lapse == 0.0 {
        let p = p_base * (-G0 * (h - h_base) / (R_AIR * t_base)).exp();
        (t_base, p)
    } else {
        let t = t_base + lapse * (h - h_base);
        let p = p_base * (t / t_base).powf(-G0 / (R_AIR * lapse));
        (t, p)
    };

    AtmoSample {
        temperature,
        pressure,
        density: pressure / (R_AIR * temperature),
        speed_of_sound: speed_of_sound(temperature),
    }
}

fn speed_of_sound(temperature: f64) -> f64 {
    (GAMMA_AIR * R_AIR * temperature).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_standard_values() {
        let s = sample(0.0);
        assert!((s.temperature - 288.15).abs() < 1e-9);
        assert!((s.pressure - 101_325.0).abs() < 1e-6);
        assert!((s.density - 1.225).abs() < 0.001, "rho = {}", s.density);
        assert!((s.speed_of_sound - 340.3).abs() < 0.1);
    }

    #[test]
    fn tropopause_values() {
        // 11 km geopotential ≈ 11 019 m geometric.
        let s = sample(11_019.0);
        assert!((s.temperature - 216.65).abs() < 0.05, "T = {}", s.temperature);
        assert!((s.pressure - 22_632.0).abs() < 50.0, "p = {}", s.pressure);
    }

    #[test]
    fn stratosphere_is_thinner_than_troposphere() {
        let lo = sample(5_000.0);
        let hi = sample(25_000.0);
        assert!(hi.density < lo.density / 10.0);
    }

    #[test]
    fn density_is_monotonically_decreasing() {
        let mut last = sample(0.0).density;
        for alt in (1..120).map(|k| k as f64 * 1_000.0) {
            let d = sample(alt).density;
            assert!(d < last, "density not decreasing at {alt} m");
            last = d;
        }
    }

    #[test]
    fn tail_continues_above_model_top() {
        let below = sample(84_000.0);
        let above = sample(100_000.0);
        assert!(above.density > 0.0);
        assert!(above.density < below.density);
        assert!(above.speed_of_sound > 0.0);
    }

    #[test]
    fn negative_altitude_clamps_to_sea_level() {
        assert_eq!(sample(-500.0), sample(0.0));
    }
}
