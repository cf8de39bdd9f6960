//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(format, strategy, game index)` tuple. Sub-seeds are derived via
//! BLAKE3 hashing, independently of evaluation order, so a batch
//! regenerates identically no matter how its games are scheduled.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic seed tree.
///
/// The master seed is expanded into per-(format, strategy, index)
/// sub-seeds using BLAKE3. Because derivation is hash-based (not
/// order-dependent), the same master seed produces identical sub-seeds
/// regardless of the order in which games are generated.
#[derive(Debug, Clone)]
pub struct SeedTree {
    master_seed: u64,
}

impl SeedTree {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a specific
    /// (format, strategy, index).
    pub fn sub_seed(&self, format_key: &str, strategy: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(format_key.as_bytes());
        hasher.update(&[0]);
        hasher.update(strategy.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// Create a seeded StdRng from a sub-seed.
    pub fn rng_for(&self, format_key: &str, strategy: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(format_key, strategy, index))
    }
}
