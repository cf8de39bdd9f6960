//! Distinct-combination sampling.
//!
//! Both modes share one contract: exactly `k` distinct numbers from the
//! population, sorted ascending. The weighted mode draws one number at a
//! time with replacement and accumulates distinct values, so heavier
//! numbers surface more often while the result stays duplicate-free.
//! The accumulator nearing `k` behaves like a coupon collector; an
//! explicit attempt budget bounds the loop and surfaces
//! [`SampleError::InsufficientPopulation`] instead of spinning forever.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Errors from the sampler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("population of {available} distinct numbers cannot fill {requested} slots")]
    InsufficientPopulation { requested: usize, available: usize },

    #[error("weights must parallel the population ({population} numbers, {weights} weights)")]
    WeightMismatch { population: usize, weights: usize },
}

/// Attempts allowed per slot before the weighted accumulator gives up.
const ATTEMPTS_PER_SLOT: usize = 64;

/// Uniform distinct `k`-subset of `population`, sorted ascending.
///
/// `population` must hold distinct numbers. A short population is an
/// error, never a short result.
pub fn sample_uniform<R: Rng>(
    population: &[u8],
    k: usize,
    rng: &mut R,
) -> Result<Vec<u8>, SampleError> {
    if population.len() < k {
        return Err(SampleError::InsufficientPopulation {
            requested: k,
            available: population.len(),
        });
    }
    let mut picked: Vec<u8> = population.choose_multiple(rng, k).copied().collect();
    picked.sort_unstable();
    Ok(picked)
}

/// Weighted distinct `k`-subset: repeated single weighted draws with
/// replacement, accumulating until `k` distinct numbers are collected.
///
/// `population` must hold distinct numbers; `weights` parallels it.
/// Entries with zero weight are unreachable and do not count toward the
/// available population.
pub fn sample_weighted<R: Rng>(
    population: &[u8],
    weights: &[u32],
    k: usize,
    rng: &mut R,
) -> Result<Vec<u8>, SampleError> {
    if population.len() != weights.len() {
        return Err(SampleError::WeightMismatch {
            population: population.len(),
            weights: weights.len(),
        });
    }
    let available = weights.iter().filter(|&&w| w > 0).count();
    if available < k {
        return Err(SampleError::InsufficientPopulation {
            requested: k,
            available,
        });
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let dist = WeightedIndex::new(weights.iter().copied())
        .expect("at least k nonzero weights checked above");

    let budget = ATTEMPTS_PER_SLOT * k.max(population.len());
    let mut picked: Vec<u8> = Vec::with_capacity(k);
    for _ in 0..budget {
        let n = population[dist.sample(rng)];
        if picked.contains(&n) {
            continue;
        }
        picked.push(n);
        if picked.len() == k {
            picked.sort_unstable();
            return Ok(picked);
        }
    }

    Err(SampleError::InsufficientPopulation {
        requested: k,
        available,
    })
}
