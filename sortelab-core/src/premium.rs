//! Premium generation: oversample, filter, score, tie-break.
//!
//! A pool of candidates is drawn from the full-history weighted
//! population, exact historical repeats are discarded, survivors are
//! scored against the [`HistoricalProfile`], and the winner is picked
//! uniformly among the top scorers. The uniform tie-break is deliberate:
//! candidates tied on the profile carry no further signal to
//! discriminate on, so selection must not add a bias of its own.

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{AnchorSet, GeneratedGame, HistoricalDraw};
use crate::format::LotteryFormat;
use crate::frequency::FrequencyTable;
use crate::profile::HistoricalProfile;
use crate::sampler::{sample_uniform, sample_weighted, SampleError};

/// Distinct candidates drawn before scoring.
pub const CANDIDATE_POOL_SIZE: usize = 200;

/// Whole-pool retry budget while collecting distinct candidates.
const POOL_ATTEMPTS: usize = CANDIDATE_POOL_SIZE * 50;

/// Retry budget for the never-drawn uniform fallback.
const NOVEL_GAME_ATTEMPTS: usize = 10_000;

/// Result of a premium request: the winning game plus the selection
/// diagnostics a caller may want to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumGame {
    pub game: GeneratedGame,
    /// Profile score of the winner, 0..=3.
    pub score: u8,
    /// Candidates that survived historical-duplicate exclusion.
    pub pool_size: usize,
    /// Candidates sharing the winning score.
    pub tied_at_top: usize,
    pub profile: HistoricalProfile,
}

/// Generate one premium game at the format's draw size.
pub fn premium_game<R: Rng>(
    format: &LotteryFormat,
    draws: &[HistoricalDraw],
    rng: &mut R,
) -> Result<PremiumGame, SampleError> {
    let profile = HistoricalProfile::from_draws(format, draws);
    let historical: HashSet<GeneratedGame> = draws
        .iter()
        .map(|d| GeneratedGame::new(d.canonical(format).to_vec()))
        .collect();

    let table = FrequencyTable::from_draws(format, draws, &AnchorSet::empty());
    let (numbers, weights) = table.universe_weights(format);
    let k = format.draw_size;

    let mut pool: BTreeSet<GeneratedGame> = BTreeSet::new();
    let mut attempts = 0;
    while pool.len() < CANDIDATE_POOL_SIZE {
        attempts += 1;
        if attempts > POOL_ATTEMPTS {
            return Err(SampleError::InsufficientPopulation {
                requested: CANDIDATE_POOL_SIZE,
                available: pool.len(),
            });
        }
        pool.insert(GeneratedGame::new(sample_weighted(
            &numbers, &weights, k, rng,
        )?));
    }

    let survivors: Vec<GeneratedGame> = pool
        .into_iter()
        .filter(|g| !historical.contains(g))
        .collect();

    if survivors.is_empty() {
        // Every candidate repeats a past draw: hand back the first
        // uniformly drawn game that has never occurred, unscored.
        let universe = format.universe();
        for _ in 0..NOVEL_GAME_ATTEMPTS {
            let game = GeneratedGame::new(sample_uniform(&universe, k, rng)?);
            if !historical.contains(&game) {
                return Ok(PremiumGame {
                    game,
                    score: 0,
                    pool_size: 0,
                    tied_at_top: 0,
                    profile,
                });
            }
        }
        return Err(SampleError::InsufficientPopulation {
            requested: 1,
            available: 0,
        });
    }

    let scores: Vec<u8> = survivors
        .iter()
        .map(|g| profile.score(format, g))
        .collect();
    let best = *scores.iter().max().expect("survivors are non-empty");
    let tied: Vec<&GeneratedGame> = survivors
        .iter()
        .zip(&scores)
        .filter(|(_, &s)| s == best)
        .map(|(g, _)| g)
        .collect();

    let winner = (*tied.choose(rng).expect("tied set is non-empty")).clone();

    Ok(PremiumGame {
        game: winner,
        score: best,
        pool_size: survivors.len(),
        tied_at_top: tied.len(),
        profile,
    })
}
