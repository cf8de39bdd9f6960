//! Strategy generators: one game at a time, each strategy assembling
//! its own population and weights before handing off to the sampler.
//!
//! Windowing is the caller's responsibility: `draws` must already be
//! restricted to the window the strategy should see (hot/cold/mixed get
//! the recent window, general and Monte Carlo the full history). Any
//! strategy whose population ends up empty falls back to uniform
//! sampling instead of failing the request.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::{AnchorSet, GeneratedGame, HistoricalDraw};
use crate::format::LotteryFormat;
use crate::frequency::FrequencyTable;
use crate::sampler::{sample_uniform, sample_weighted, SampleError};

/// Weighted trials in the Monte Carlo refinement stage.
pub const MONTE_CARLO_TRIALS: usize = 100_000;

/// Fixed chunking for the parallel trial tally. Seeding is per chunk
/// index, so the tally is identical regardless of thread count.
const MONTE_CARLO_CHUNKS: usize = 16;

/// A game-synthesis strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform over the format universe, history ignored.
    Uniform,
    /// Weighted by full-history frequency.
    General,
    /// Weighted by recent-window frequency.
    Hot,
    /// Uniform over numbers absent from the recent window.
    Cold,
    /// Half weighted from the hot set, half uniform from the cold set.
    Mixed,
    /// Frequency-weighted simulation refined over 100,000 trials.
    MonteCarlo,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Uniform,
        Strategy::General,
        Strategy::Hot,
        Strategy::Cold,
        Strategy::Mixed,
        Strategy::MonteCarlo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Uniform => "uniform",
            Strategy::General => "general",
            Strategy::Hot => "hot",
            Strategy::Cold => "cold",
            Strategy::Mixed => "mixed",
            Strategy::MonteCarlo => "monte_carlo",
        }
    }

    /// Whether the strategy reads only the recent window of history.
    pub fn is_windowed(&self) -> bool {
        matches!(self, Strategy::Hot | Strategy::Cold | Strategy::Mixed)
    }
}

impl std::str::FromStr for Strategy {
    type Err = ConfigError;

    /// Accepts the canonical names plus the legacy Portuguese aliases
    /// the product shipped with.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" | "aleatorio" => Ok(Strategy::Uniform),
            "general" | "geral" => Ok(Strategy::General),
            "hot" | "quentes" => Ok(Strategy::Hot),
            "cold" | "frias" => Ok(Strategy::Cold),
            "mixed" | "mistas" => Ok(Strategy::Mixed),
            "monte_carlo" | "monte-carlo" | "montecarlo" => Ok(Strategy::MonteCarlo),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Generate one game for `strategy`.
///
/// `size` is the full game size including anchors; `draws` must already
/// carry the strategy's window.
pub fn generate_one<R: Rng>(
    format: &LotteryFormat,
    strategy: Strategy,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    match strategy {
        Strategy::Uniform => uniform_game(format, size, anchors, rng),
        // Hot differs from general only in the window the caller applied.
        Strategy::General | Strategy::Hot => weighted_game(format, draws, size, anchors, rng),
        Strategy::Cold => cold_game(format, draws, size, anchors, rng),
        Strategy::Mixed => mixed_game(format, draws, size, anchors, rng),
        Strategy::MonteCarlo => monte_carlo_game(format, draws, size, anchors, rng),
    }
}

fn finish(anchors: &AnchorSet, mut picked: Vec<u8>) -> GeneratedGame {
    picked.extend_from_slice(anchors.numbers());
    GeneratedGame::new(picked)
}

fn uniform_game<R: Rng>(
    format: &LotteryFormat,
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    let population: Vec<u8> = format
        .universe()
        .into_iter()
        .filter(|&n| !anchors.contains(n))
        .collect();
    let picked = sample_uniform(&population, size - anchors.len(), rng)?;
    Ok(finish(anchors, picked))
}

fn weighted_game<R: Rng>(
    format: &LotteryFormat,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    let table = FrequencyTable::from_draws(format, draws, anchors);
    if table.is_empty() {
        return uniform_game(format, size, anchors, rng);
    }
    let picked = sample_weighted(table.numbers(), table.counts(), size - anchors.len(), rng)?;
    Ok(finish(anchors, picked))
}

fn cold_game<R: Rng>(
    format: &LotteryFormat,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    let k = size - anchors.len();
    let table = FrequencyTable::from_draws(format, draws, anchors);
    // With no history the cold set is the whole universe, which is the
    // uniform strategy by another name.
    let cold = table.cold_set(format, anchors, k);
    let picked = sample_uniform(&cold, k, rng)?;
    Ok(finish(anchors, picked))
}

fn mixed_game<R: Rng>(
    format: &LotteryFormat,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    let table = FrequencyTable::from_draws(format, draws, anchors);
    if table.is_empty() {
        return uniform_game(format, size, anchors, rng);
    }

    let k = size - anchors.len();
    let hot_k = k.div_ceil(2).min(table.len());
    let cold_k = k - hot_k;

    let mut picked = sample_weighted(table.numbers(), table.counts(), hot_k, rng)?;

    let cold_pool = table.cold_set(format, anchors, cold_k);
    let cold_picked = sample_uniform(&cold_pool, cold_k.min(cold_pool.len()), rng)?;
    for n in cold_picked {
        if !picked.contains(&n) {
            picked.push(n);
        }
    }

    if picked.len() < k {
        // Top up from the union of both sets.
        let mut union: Vec<u8> = table.numbers().to_vec();
        for &n in &cold_pool {
            if !union.contains(&n) {
                union.push(n);
            }
        }
        union.retain(|n| !picked.contains(n));
        let top_up = sample_uniform(&union, k - picked.len(), rng)?;
        picked.extend(top_up);
    }

    Ok(finish(anchors, picked))
}

/// Monte Carlo refinement: simulate [`MONTE_CARLO_TRIALS`] weighted
/// draws from the historical distribution, tally how often each number
/// appears, then take one weighted sample from the *simulated* counts.
///
/// The two-stage shape smooths the historical weights: frequent numbers
/// keep their edge, but the per-trial randomness stops any single
/// number from dominating the final distribution.
fn monte_carlo_game<R: Rng>(
    format: &LotteryFormat,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    rng: &mut R,
) -> Result<GeneratedGame, SampleError> {
    let table = FrequencyTable::from_draws(format, draws, anchors);
    if table.is_empty() {
        return uniform_game(format, size, anchors, rng);
    }

    let k = size - anchors.len();
    if table.len() < k {
        return Err(SampleError::InsufficientPopulation {
            requested: k,
            available: table.len(),
        });
    }

    let simulated = simulate_tally(&table, k, rng);

    let mut sim_numbers: Vec<u8> = Vec::with_capacity(table.len());
    let mut sim_weights: Vec<u32> = Vec::with_capacity(table.len());
    for (i, &hits) in simulated.iter().enumerate() {
        if hits > 0 {
            sim_numbers.push(table.numbers()[i]);
            sim_weights.push(hits);
        }
    }

    let picked = sample_weighted(&sim_numbers, &sim_weights, k, rng)?;
    Ok(finish(anchors, picked))
}

/// Run the trials in parallel chunks, each chunk seeded from the
/// caller's RNG up front so the merged tally is reproducible.
fn simulate_tally<R: Rng>(table: &FrequencyTable, k: usize, rng: &mut R) -> Vec<u32> {
    let chunk_seeds: Vec<u64> = (0..MONTE_CARLO_CHUNKS).map(|_| rng.gen()).collect();
    let trials_per_chunk = MONTE_CARLO_TRIALS / MONTE_CARLO_CHUNKS;
    let dist = WeightedIndex::new(table.counts().iter().copied())
        .expect("table is non-empty with nonzero counts");

    chunk_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tally = vec![0u32; table.len()];
            for _ in 0..trials_per_chunk {
                for _ in 0..k {
                    tally[dist.sample(&mut rng)] += 1;
                }
            }
            tally
        })
        .reduce(
            || vec![0u32; table.len()],
            |mut acc, tally| {
                for (a, t) in acc.iter_mut().zip(tally) {
                    *a += t;
                }
                acc
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatRegistry;

    fn megasena() -> LotteryFormat {
        FormatRegistry::builtin().get("megasena").unwrap().clone()
    }

    fn draws(rows: &[&[u8]]) -> Vec<HistoricalDraw> {
        rows.iter()
            .enumerate()
            .map(|(i, ns)| HistoricalDraw::new(i as u32 + 1, ns.to_vec()))
            .collect()
    }

    fn check_game(game: &GeneratedGame, format: &LotteryFormat, size: usize, anchors: &AnchorSet) {
        assert_eq!(game.len(), size);
        assert!(game.numbers().windows(2).all(|w| w[0] < w[1]));
        assert!(game.numbers().iter().all(|&n| format.contains(n)));
        for &a in anchors.numbers() {
            assert!(game.contains(a), "anchor {a} missing from {game}");
        }
    }

    #[test]
    fn every_strategy_upholds_the_game_contract() {
        let format = megasena();
        let history = draws(&[
            &[4, 8, 15, 16, 23, 42],
            &[1, 2, 3, 4, 5, 6],
            &[10, 20, 30, 40, 50, 60],
        ]);
        let anchors = AnchorSet::from_numbers(&[7, 21], &format);
        let mut rng = StdRng::seed_from_u64(42);

        for strategy in Strategy::ALL {
            let game = generate_one(&format, strategy, &history, 6, &anchors, &mut rng)
                .unwrap_or_else(|e| panic!("{strategy} failed: {e}"));
            check_game(&game, &format, 6, &anchors);
        }
    }

    #[test]
    fn strategies_fall_back_to_uniform_on_empty_history() {
        let format = megasena();
        let mut rng = StdRng::seed_from_u64(7);

        for strategy in Strategy::ALL {
            let game = generate_one(&format, strategy, &[], 6, &AnchorSet::empty(), &mut rng)
                .unwrap_or_else(|e| panic!("{strategy} failed on empty history: {e}"));
            check_game(&game, &format, 6, &AnchorSet::empty());
        }
    }

    #[test]
    fn general_only_emits_numbers_from_history() {
        let format = megasena();
        let history = draws(&[&[4, 8, 15, 16, 23, 42], &[1, 2, 3, 4, 5, 6]]);
        let seen: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 8, 15, 16, 23, 42];
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let game = generate_one(
                &format,
                Strategy::General,
                &history,
                6,
                &AnchorSet::empty(),
                &mut rng,
            )
            .unwrap();
            assert!(game.numbers().iter().all(|n| seen.contains(n)));
        }
    }

    #[test]
    fn cold_only_emits_unseen_numbers() {
        let format = megasena();
        let history = draws(&[&[1, 2, 3, 4, 5, 6], &[10, 20, 30, 40, 50, 60]]);
        let table = FrequencyTable::from_draws(&format, &history, &AnchorSet::empty());
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let game = generate_one(
                &format,
                Strategy::Cold,
                &history,
                6,
                &AnchorSet::empty(),
                &mut rng,
            )
            .unwrap();
            assert!(
                game.numbers().iter().all(|&n| table.count_of(n) == 0),
                "cold game {game} contains a drawn number"
            );
        }
    }

    #[test]
    fn mixed_splits_between_hot_and_cold() {
        let format = megasena();
        let history = draws(&[&[1, 2, 3, 4, 5, 6], &[1, 2, 3, 7, 8, 9]]);
        let table = FrequencyTable::from_draws(&format, &history, &AnchorSet::empty());
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..50 {
            let game = generate_one(
                &format,
                Strategy::Mixed,
                &history,
                8,
                &AnchorSet::empty(),
                &mut rng,
            )
            .unwrap();
            let hot = game
                .numbers()
                .iter()
                .filter(|&&n| table.count_of(n) > 0)
                .count();
            let cold = game.len() - hot;
            assert!(hot <= 4, "at most ceil(8/2) hot numbers, got {hot}");
            assert!(cold >= 4, "at least floor(8/2) cold numbers, got {cold}");
        }
    }

    #[test]
    fn monte_carlo_is_deterministic_for_a_seed() {
        let format = megasena();
        let history = draws(&[&[4, 8, 15, 16, 23, 42], &[1, 2, 3, 4, 5, 6]]);

        let mut rng1 = StdRng::seed_from_u64(21);
        let mut rng2 = StdRng::seed_from_u64(21);
        let g1 = generate_one(
            &format,
            Strategy::MonteCarlo,
            &history,
            6,
            &AnchorSet::empty(),
            &mut rng1,
        )
        .unwrap();
        let g2 = generate_one(
            &format,
            Strategy::MonteCarlo,
            &history,
            6,
            &AnchorSet::empty(),
            &mut rng2,
        )
        .unwrap();
        assert_eq!(g1, g2);
    }

    #[test]
    fn monte_carlo_degenerate_history_errors_instead_of_hanging() {
        let format = megasena();
        // Only three distinct numbers ever drawn; a six-slot game is
        // impossible and must fail fast.
        let history = draws(&[&[1, 1, 1, 2, 2, 3]]);
        let mut rng = StdRng::seed_from_u64(23);
        let err = generate_one(
            &format,
            Strategy::MonteCarlo,
            &history,
            6,
            &AnchorSet::empty(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SampleError::InsufficientPopulation { .. }));
    }

    #[test]
    fn monte_carlo_tally_covers_all_trials() {
        let format = megasena();
        let history = draws(&[&[4, 8, 15, 16, 23, 42], &[1, 2, 3, 4, 5, 6]]);
        let table = FrequencyTable::from_draws(&format, &history, &AnchorSet::empty());
        let mut rng = StdRng::seed_from_u64(5);

        let tally = simulate_tally(&table, 6, &mut rng);
        let total: u64 = tally.iter().map(|&t| t as u64).sum();
        assert_eq!(total, (MONTE_CARLO_TRIALS * 6) as u64);
        // Number 4 has twice the weight of any other; it must lead.
        let idx_of_4 = table.numbers().iter().position(|&n| n == 4).unwrap();
        let max = tally.iter().max().unwrap();
        assert_eq!(tally[idx_of_4], *max);
    }

    #[test]
    fn strategy_parses_canonical_names_and_aliases() {
        assert_eq!("hot".parse::<Strategy>().unwrap(), Strategy::Hot);
        assert_eq!("quentes".parse::<Strategy>().unwrap(), Strategy::Hot);
        assert_eq!("aleatorio".parse::<Strategy>().unwrap(), Strategy::Uniform);
        assert_eq!(
            "monte-carlo".parse::<Strategy>().unwrap(),
            Strategy::MonteCarlo
        );
        assert!("lucky".parse::<Strategy>().is_err());
    }
}
