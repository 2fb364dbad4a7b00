//! Aircraft configuration presets.
//!
//! Named parameter sets for the 3-DOF flight model. Lift slope is listed
//! per degree (the conventional handbook form) and converted to per
//! radian on lookup. Unknown names fall back to the f16 preset.

use std::f64::consts::PI;

use tracing::warn;
use vanguard_core::entity::Airframe;

/// Raw preset: (mass kg, wing area m², aspect ratio, Cd0, Oswald,
/// Cl_α per deg, Cl_max, T_mil N, T_ab N, g limit, max AoA rad, idle).
struct Preset(
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
);

fn preset(name: &str) -> Option<Preset> {
    // Values are representative, not authoritative; they only need to
    // put each type in the right speed/turn/ceiling class.
    let p = match name {
        "f16" => Preset(
            12_000.0, 27.87, 3.2, 0.018, 0.85, 0.10, 1.6, 76_300.0, 127_000.0, 9.0, 0.44, 0.05,
        ),
        "f15" => Preset(
            20_400.0, 56.5, 3.0, 0.021, 0.80, 0.095, 1.5, 129_000.0, 211_400.0, 9.0, 0.42, 0.05,
        ),
        "f22" => Preset(
            26_000.0, 78.0, 2.36, 0.016, 0.82, 0.10, 1.7, 232_000.0, 312_000.0, 9.0, 0.50, 0.05,
        ),
        "f35" => Preset(
            20_100.0, 42.7, 2.68, 0.019, 0.80, 0.095, 1.6, 125_000.0, 191_300.0, 9.0, 0.44, 0.05,
        ),
        "f18" => Preset(
            16_800.0, 38.0, 3.5, 0.020, 0.82, 0.095, 1.6, 124_000.0, 158_000.0, 7.5, 0.44, 0.05,
        ),
        "a10" => Preset(
            14_800.0, 47.0, 6.5, 0.032, 0.78, 0.09, 1.8, 80_600.0, 80_600.0, 5.0, 0.35, 0.06,
        ),
        "mig29" => Preset(
            15_000.0, 38.0, 3.4, 0.019, 0.82, 0.095, 1.6, 100_000.0, 163_000.0, 9.0, 0.45, 0.05,
        ),
        "su27" => Preset(
            23_400.0, 62.0, 3.5, 0.020, 0.80, 0.09, 1.7, 150_000.0, 245_000.0, 9.0, 0.50, 0.05,
        ),
        "su35" => Preset(
            25_300.0, 62.0, 3.5, 0.019, 0.80, 0.09, 1.75, 172_000.0, 284_000.0, 9.0, 0.52, 0.05,
        ),
        "su57" => Preset(
            25_000.0, 78.8, 2.9, 0.017, 0.82, 0.095, 1.7, 186_000.0, 294_000.0, 9.0, 0.52, 0.05,
        ),
        "awacs" => Preset(
            147_400.0, 283.4, 7.0, 0.025, 0.75, 0.09, 1.4, 410_000.0, 410_000.0, 2.5, 0.26, 0.08,
        ),
        "b2" => Preset(
            152_600.0, 478.0, 5.7, 0.008, 0.90, 0.085, 1.3, 308_000.0, 308_000.0, 2.0, 0.24, 0.08,
        ),
        "bomber" => Preset(
            120_000.0, 370.0, 7.5, 0.022, 0.78, 0.085, 1.4, 280_000.0, 280_000.0, 2.5, 0.24, 0.08,
        ),
        "bomber_fast" => Preset(
            86_000.0, 181.2, 5.5, 0.020, 0.78, 0.09, 1.5, 250_000.0, 341_000.0, 3.0, 0.30, 0.06,
        ),
        "c17" => Preset(
            202_000.0, 353.0, 7.2, 0.024, 0.75, 0.085, 1.5, 720_000.0, 720_000.0, 2.0, 0.26, 0.08,
        ),
        "transport" => Preset(
            70_000.0, 162.1, 10.1, 0.026, 0.78, 0.09, 1.8, 180_000.0, 180_000.0, 2.5, 0.30, 0.08,
        ),
        "drone_male" | "mq9" => Preset(
            4_760.0, 24.0, 16.7, 0.030, 0.80, 0.10, 1.4, 8_000.0, 8_000.0, 3.0, 0.30, 0.10,
        ),
        "drone_hale" | "rq4" => Preset(
            14_600.0, 50.2, 25.0, 0.025, 0.85, 0.10, 1.5, 34_000.0, 34_000.0, 3.0, 0.28, 0.10,
        ),
        _ => return None,
    };
    Some(p)
}

/// Look up an airframe by preset name. Unknown names warn and substitute
/// the f16 preset.
pub fn airframe(name: &str) -> Airframe {
    let raw = match preset(name) {
        Some(p) => p,
        None => {
            warn!(config = name, "unknown aircraft config, substituting f16");
            preset("f16").expect("f16 preset exists")
        }
    };
    let Preset(
        mass,
        wing_area,
        aspect_ratio,
        cd0,
        oswald,
        cl_alpha_per_deg,
        cl_max,
        thrust_mil,
        thrust_ab,
        g_limit,
        alpha_max,
        idle_fraction,
    ) = raw;
    Airframe {
        mass,
        wing_area,
        aspect_ratio,
        cd0,
        oswald,
        cl_alpha: cl_alpha_per_deg * 180.0 / PI,
        cl_max,
        thrust_mil,
        thrust_ab,
        g_limit,
        alpha_max,
        idle_fraction,
    }
}
