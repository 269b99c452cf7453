//! Deterministic run-level and per-client RNG wrappers.
//!
//! # Determinism strategy
//!
//! Start-time jitter is the only random input of a run.  Its source is never
//! a process-global generator: every run derives its own seed from the sweep
//! seed and the run's axis values,
//!
//!   run_seed = mix(sweep_seed, payload, width, band, …)
//!
//! and every client draws from its own `SmallRng` seeded by
//!
//!   seed = run_seed XOR (client_id * MIXING_CONSTANT)
//!
//! so a run's jitter does not depend on which runs executed before it, in
//! which order, or on which thread.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};

use crate::ClientId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fold `parts` into `seed` with a splitmix64-style finalizer per step.
///
/// Order-sensitive: `derive_seed(s, &[a, b]) != derive_seed(s, &[b, a])` in
/// general, which is what the sweep wants (axes are positional).
pub fn derive_seed(seed: u64, parts: &[u64]) -> u64 {
    parts.iter().fold(seed, |acc, &p| {
        let mut z = acc ^ p.wrapping_add(MIXING_CONSTANT).wrapping_mul(MIXING_CONSTANT);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    })
}

// ── ClientRng ─────────────────────────────────────────────────────────────────

/// Per-client deterministic RNG.
pub struct ClientRng(SmallRng);

impl ClientRng {
    /// Seed deterministically from the run's seed and a client ID.
    pub fn new(run_seed: u64, client: ClientId) -> Self {
        let seed = run_seed ^ (client.0 as u64).wrapping_mul(MIXING_CONSTANT);
        ClientRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Draw from `Normal(mean, std_dev)`.
    ///
    /// Fails when `std_dev` is negative or either parameter is non-finite.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64, NormalError> {
        let dist = Normal::new(mean, std_dev)?;
        Ok(dist.sample(&mut self.0))
    }
}
