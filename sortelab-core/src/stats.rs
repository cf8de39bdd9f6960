//! Draw statistics — the aggregate numbers the product surfaces
//! alongside generation.
//!
//! Pure functions over a draw history: per-number frequency, the last
//! recorded contest, and the per-draw prime and even distributions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AnchorSet, HistoricalDraw};
use crate::format::LotteryFormat;
use crate::frequency::FrequencyTable;

/// Frequency of one number across the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
}

/// Aggregate statistics for one format's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStatistics {
    pub format: String,
    pub draw_count: usize,
    /// Highest contest on record; 0 when the history is empty.
    pub last_contest: u32,
    /// Per-number frequency, ascending by number; only drawn numbers.
    pub frequency: Vec<NumberFrequency>,
    /// How many draws contained exactly N primes.
    pub primes_per_draw: BTreeMap<usize, u32>,
    /// How many draws contained exactly N even numbers.
    pub evens_per_draw: BTreeMap<usize, u32>,
}

impl DrawStatistics {
    /// Compute all statistics from a format's draw history.
    ///
    /// Per-draw distributions skip records whose canonical view does
    /// not hold the expected ball count (malformed imports).
    pub fn compute(format: &LotteryFormat, draws: &[HistoricalDraw]) -> Self {
        let table = FrequencyTable::from_draws(format, draws, &AnchorSet::empty());
        let mut frequency: Vec<NumberFrequency> = table
            .numbers()
            .iter()
            .zip(table.counts())
            .map(|(&number, &count)| NumberFrequency { number, count })
            .collect();
        frequency.sort_by_key(|f| f.number);

        let mut primes_per_draw: BTreeMap<usize, u32> = BTreeMap::new();
        let mut evens_per_draw: BTreeMap<usize, u32> = BTreeMap::new();
        for draw in draws {
            let numbers = draw.canonical(format);
            if numbers.len() != format.canonical_len() {
                continue;
            }
            let primes = numbers.iter().filter(|&&n| is_prime(n)).count();
            let evens = numbers.iter().filter(|&&n| n % 2 == 0).count();
            *primes_per_draw.entry(primes).or_insert(0) += 1;
            *evens_per_draw.entry(evens).or_insert(0) += 1;
        }

        Self {
            format: format.key.clone(),
            draw_count: draws.len(),
            last_contest: draws.iter().map(|d| d.contest_id).max().unwrap_or(0),
            frequency,
            primes_per_draw,
            evens_per_draw,
        }
    }
}

pub(crate) fn is_prime(n: u8) -> bool {
    let n = n as u32;
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}
