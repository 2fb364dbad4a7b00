//! Seeded PRNG — mulberry32.
//!
//! Every stochastic decision in the simulation draws from the world's
//! single `SeededRng`. The generator is bit-exact mulberry32 so that runs
//! with the same seed reproduce the same trace across hosts and across
//! implementations in other languages. Systems must consult it in a fixed
//! intra-tick order; see the pipeline.

use serde::{Deserialize, Serialize};

/// 32-bit-state generator producing uniform floats in [0, 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRng {
    seed: u32,
    state: u32,
}

impl SeededRng {
    /// Create a generator. A seed of 0 is treated as 1.
    pub fn new(seed: u32) -> Self {
        let seed = if seed == 0 { 1 } else { seed };
        Self { seed, state: seed }
    }

    /// Reset to a new seed (0 is treated as 1). Resets the internal state.
    pub fn set_seed(&mut self, seed: u32) {
        let seed = if seed == 0 { 1 } else { seed };
        self.seed = seed;
        self.state = seed;
    }

    /// The seed this generator was last set to.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Next uniform float in [0, 1).
    pub fn random(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Bernoulli trial: true with probability p. Consumes exactly one draw.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.random() < p
    }

    /// Uniform float in [a, b). Consumes exactly one draw.
    pub fn uniform(&mut self, a: f64, b: f64) -> f64 {
        a + self.random() * (b - a)
    }

    /// Gaussian sample via Box–Muller. Consumes exactly two draws.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.random().max(f64::MIN_POSITIVE);
        let u2 = self.random();
        let mag = (-2.0 * u1.ln()).sqrt();
        mean + std_dev * mag * (std::f64::consts::TAU * u2).cos()
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference values from the mulberry32 recurrence, seed 1.
    const SEED1_EXPECTED: [f64; 5] = [
        0.627_073_940_588_161_3,
        0.002_735_721_180_215_478,
        0.527_447_039_959_952_2,
        0.981_050_967_471_674_1,
        0.968_377_898_214_384_9,
    ];

    #[test]
    fn known_sequence_seed_1() {
        let mut rng = SeededRng::new(1);
        for (i, expected) in SEED1_EXPECTED.iter().enumerate() {
            let got = rng.random();
            assert_eq!(got, *expected, "draw {i}");
        }
    }

    #[test]
    fn known_sequence_seed_42() {
        let mut rng = SeededRng::new(42);
        assert_eq!(rng.random(), 0.601_103_751_920_163_6);
        assert_eq!(rng.random(), 0.448_290_558_997_541_67);
    }

    #[test]
    fn seed_zero_is_treated_as_one() {
        let mut zero = SeededRng::new(0);
        let mut one = SeededRng::new(1);
        for _ in 0..16 {
            assert_eq!(zero.random(), one.random());
        }
        assert_eq!(zero.seed(), 1);
    }

    #[test]
    fn set_seed_resets_state() {
        let mut rng = SeededRng::new(7);
        let first = rng.random();
        for _ in 0..100 {
            rng.random();
        }
        rng.set_seed(7);
        assert_eq!(rng.random(), first);
    }

    #[test]
    fn range_is_half_open_unit() {
        let mut rng = SeededRng::new(1234);
        for _ in 0..10_000 {
            let x = rng.random();
            assert!((0.0..1.0).contains(&x), "x = {x}");
        }
    }

    #[test]
    fn bernoulli_extremes() {
        let mut rng = SeededRng::new(99);
        for _ in 0..1000 {
            assert!(rng.bernoulli(1.0));
        }
        for _ in 0..1000 {
            assert!(!rng.bernoulli(0.0));
        }
    }

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = SeededRng::new(5);
        for _ in 0..1000 {
            let x = rng.uniform(-3.0, 9.0);
            assert!((-3.0..9.0).contains(&x));
        }
    }

    #[test]
    fn gaussian_consumes_two_draws() {
        let mut a = SeededRng::new(314);
        let mut b = SeededRng::new(314);
        let _ = a.gaussian(0.0, 1.0);
        b.random();
        b.random();
        assert_eq!(a.random(), b.random());
    }

    #[test]
    fn gaussian_roughly_centered() {
        let mut rng = SeededRng::new(2024);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.gaussian(5.0, 2.0)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean = {mean}");
    }
}
