//! Historical profile: the statistical envelope premium candidates are
//! scored against.
//!
//! Computed once per premium request from all historical draws of a
//! format: an interquartile sum range, the modal parity splits, and how
//! many quadrants of the number range a typical draw touches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GeneratedGame, HistoricalDraw};
use crate::format::LotteryFormat;

/// Distinct-quadrant coverage assumed when there is no history.
const DEFAULT_QUADRANT_TARGET: usize = 3;

/// Statistical envelope derived from a format's full draw history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalProfile {
    /// (p25, p75) of per-draw sums; (0.0, 0.0) with no history.
    pub sum_range: (f64, f64),
    /// The two most common (even, odd) pairs; empty with no history.
    pub parity_modes: Vec<(usize, usize)>,
    /// Modal distinct-quadrant count; defaults to 3 with no history.
    pub quadrant_target: usize,
}

impl HistoricalProfile {
    /// Build the profile over the canonical view of `draws`.
    pub fn from_draws(format: &LotteryFormat, draws: &[HistoricalDraw]) -> Self {
        let canonical: Vec<&[u8]> = draws.iter().map(|d| d.canonical(format)).collect();

        let mut sums: Vec<f64> = canonical
            .iter()
            .map(|ns| ns.iter().map(|&n| n as u32).sum::<u32>() as f64)
            .collect();
        sums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let sum_range = if sums.is_empty() {
            (0.0, 0.0)
        } else {
            (percentile_sorted(&sums, 25.0), percentile_sorted(&sums, 75.0))
        };

        let mut parity_counts: HashMap<(usize, usize), u32> = HashMap::new();
        for ns in &canonical {
            let even = ns.iter().filter(|&&n| n % 2 == 0).count();
            *parity_counts.entry((even, ns.len() - even)).or_insert(0) += 1;
        }
        let mut ranked: Vec<((usize, usize), u32)> = parity_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let parity_modes: Vec<(usize, usize)> =
            ranked.into_iter().take(2).map(|(pair, _)| pair).collect();

        // Index = distinct quadrants touched (1..=4); 0 stays unused.
        let mut quadrant_counts = [0u32; 5];
        for ns in &canonical {
            quadrant_counts[distinct_quadrants(format, ns)] += 1;
        }
        let quadrant_target = quadrant_counts
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, &count)| count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(touched, _)| touched)
            .unwrap_or(DEFAULT_QUADRANT_TARGET);

        Self {
            sum_range,
            parity_modes,
            quadrant_target,
        }
    }

    /// Score a candidate 0..=3 against the profile.
    ///
    /// +1 per criterion: sum inside the envelope (inclusive), parity
    /// pair among the modes, quadrant coverage at or above target.
    pub fn score(&self, format: &LotteryFormat, game: &GeneratedGame) -> u8 {
        let mut score = 0;
        let sum = game.sum() as f64;
        if sum >= self.sum_range.0 && sum <= self.sum_range.1 {
            score += 1;
        }
        if self.parity_modes.contains(&game.parity()) {
            score += 1;
        }
        if distinct_quadrants(format, game.numbers()) >= self.quadrant_target {
            score += 1;
        }
        score
    }
}

/// Quadrant of a number: the range splits into four contiguous bands of
/// width `ceil(max_num / 4)`, the last band absorbing the remainder.
pub fn quadrant_of(format: &LotteryFormat, n: u8) -> usize {
    let width = (format.max_num as usize).div_ceil(4);
    (((n - format.min_num) as usize) / width).min(3)
}

/// How many distinct quadrants the numbers touch (0 for an empty slice).
pub fn distinct_quadrants(format: &LotteryFormat, numbers: &[u8]) -> usize {
    let mut seen = [false; 4];
    for &n in numbers {
        if format.contains(n) {
            seen[quadrant_of(format, n)] = true;
        }
    }
    seen.iter().filter(|&&s| s).count()
}

/// Percentile of a sorted slice using linear interpolation.
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
