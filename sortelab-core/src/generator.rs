//! Public entry points — wire a draw store, the format registry, and
//! the strategy generators together for one request.
//!
//! Three entry points:
//! - [`generate`]: a batch of distinct games under any strategy.
//! - [`generate_premium`]: one profile-scored game at the draw size.
//! - [`generate_monte_carlo`]: one simulation-refined game at the draw size.
//!
//! Each call fetches its own snapshot of history up front and computes
//! in memory from there; requests share no state.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::{ConfigError, GenerationRequest};
use crate::domain::{AnchorSet, GeneratedGame, HistoricalDraw};
use crate::format::{FormatError, FormatRegistry, LotteryFormat};
use crate::premium::{premium_game, PremiumGame};
use crate::rng::SeedTree;
use crate::sampler::SampleError;
use crate::store::{DrawStore, StoreError};
use crate::strategy::{generate_one, Strategy};

/// Whole-game regeneration attempts per slot while deduplicating a batch.
const BATCH_ATTEMPTS_PER_GAME: usize = 200;

/// Errors from the generation entry points.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("format '{0}' uses positional digits and has no pool-style games")]
    UnsupportedShape(String),

    #[error("{strategy} generation for '{format}' ran out of candidates: {source}")]
    Sampling {
        strategy: &'static str,
        format: String,
        #[source]
        source: SampleError,
    },

    #[error(
        "{strategy} generation for '{format}' could not assemble {requested} distinct games (got {assembled})"
    )]
    BatchExhausted {
        strategy: &'static str,
        format: String,
        requested: usize,
        assembled: usize,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Generate `request.count` distinct games.
pub fn generate(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    request: &GenerationRequest,
) -> Result<Vec<GeneratedGame>, GenerateError> {
    let format = registry.get(&request.format)?;
    require_pool_shape(format)?;
    request.validate(format)?;

    let size = request.resolved_size(format);
    let anchors = AnchorSet::parse(&request.anchors, format);
    let draws = fetch_history(store, format, request.strategy, request.window)?;
    let seeds = SeedTree::new(resolve_seed(request.seed));

    generate_batch(
        format,
        request.strategy,
        &draws,
        size,
        &anchors,
        request.count,
        &seeds,
    )
}

/// Generate one premium game at the format's draw size.
pub fn generate_premium(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    format_key: &str,
    seed: Option<u64>,
) -> Result<PremiumGame, GenerateError> {
    let format = registry.get(format_key)?;
    require_pool_shape(format)?;

    let draws = store.list_draws(&format.key, None)?;
    let mut rng = StdRng::seed_from_u64(resolve_seed(seed));
    premium_game(format, &draws, &mut rng).map_err(|source| GenerateError::Sampling {
        strategy: "premium",
        format: format.key.clone(),
        source,
    })
}

/// Generate one Monte-Carlo-refined game at the format's draw size.
pub fn generate_monte_carlo(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    format_key: &str,
    anchors: &[String],
    seed: Option<u64>,
) -> Result<GeneratedGame, GenerateError> {
    let format = registry.get(format_key)?;
    require_pool_shape(format)?;

    let anchors = AnchorSet::parse(anchors, format);
    let draws = store.list_draws(&format.key, None)?;
    let mut rng = StdRng::seed_from_u64(resolve_seed(seed));
    generate_one(
        format,
        Strategy::MonteCarlo,
        &draws,
        format.draw_size,
        &anchors,
        &mut rng,
    )
    .map_err(|source| GenerateError::Sampling {
        strategy: Strategy::MonteCarlo.label(),
        format: format.key.clone(),
        source,
    })
}

fn require_pool_shape(format: &LotteryFormat) -> Result<(), GenerateError> {
    if format.shape.supports_pool_games() {
        Ok(())
    } else {
        Err(GenerateError::UnsupportedShape(format.key.clone()))
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

/// Fetch the history snapshot a strategy needs. Uniform reads nothing;
/// windowed strategies see only the most recent `window` contests.
fn fetch_history(
    store: &dyn DrawStore,
    format: &LotteryFormat,
    strategy: Strategy,
    window: usize,
) -> Result<Vec<HistoricalDraw>, StoreError> {
    match strategy {
        Strategy::Uniform => Ok(Vec::new()),
        Strategy::General | Strategy::MonteCarlo => store.list_draws(&format.key, None),
        Strategy::Hot | Strategy::Cold | Strategy::Mixed => {
            store.list_draws(&format.key, Some(window))
        }
    }
}

/// Collect `count` distinct games, regenerating on collision. Every
/// game index gets its own sub-seeded RNG, so batches reproduce from
/// the master seed alone.
fn generate_batch(
    format: &LotteryFormat,
    strategy: Strategy,
    draws: &[HistoricalDraw],
    size: usize,
    anchors: &AnchorSet,
    count: usize,
    seeds: &SeedTree,
) -> Result<Vec<GeneratedGame>, GenerateError> {
    let mut games: BTreeSet<GeneratedGame> = BTreeSet::new();

    for index in 0..count {
        let mut rng = seeds.rng_for(&format.key, strategy.label(), index as u64);
        let mut attempts = 0;
        loop {
            let game = generate_one(format, strategy, draws, size, anchors, &mut rng).map_err(
                |source| GenerateError::Sampling {
                    strategy: strategy.label(),
                    format: format.key.clone(),
                    source,
                },
            )?;
            if games.insert(game) {
                break;
            }
            attempts += 1;
            if attempts >= BATCH_ATTEMPTS_PER_GAME {
                return Err(GenerateError::BatchExhausted {
                    strategy: strategy.label(),
                    format: format.key.clone(),
                    requested: count,
                    assembled: games.len(),
                });
            }
        }
    }

    Ok(games.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store_with_history() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            "megasena",
            vec![
                HistoricalDraw::new(1, vec![4, 8, 15, 16, 23, 42]),
                HistoricalDraw::new(2, vec![1, 2, 3, 4, 5, 6]),
            ],
        );
        store
    }

    #[test]
    fn unknown_format_is_fatal() {
        let store = MemoryStore::new();
        let registry = FormatRegistry::builtin();
        let request = GenerationRequest::new("powerball", Strategy::Uniform);
        let err = generate(&store, &registry, &request).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Format(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn batch_is_deterministic_for_a_seed() {
        let store = store_with_history();
        let registry = FormatRegistry::builtin();
        let mut request = GenerationRequest::new("megasena", Strategy::General);
        request.count = 5;
        request.seed = Some(42);

        let batch1 = generate(&store, &registry, &request).unwrap();
        let batch2 = generate(&store, &registry, &request).unwrap();
        assert_eq!(batch1, batch2);
        assert_eq!(batch1.len(), 5);
    }

    #[test]
    fn batch_games_are_distinct() {
        let store = store_with_history();
        let registry = FormatRegistry::builtin();
        let mut request = GenerationRequest::new("megasena", Strategy::Uniform);
        request.count = 20;
        request.seed = Some(1);

        let batch = generate(&store, &registry, &request).unwrap();
        let unique: BTreeSet<&GeneratedGame> = batch.iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn batch_exhaustion_reports_strategy_and_format() {
        // Lotofácil at size 20 over a 25-number range has C(25,20) =
        // 53130 games, but general strategy over a 2-draw history sees
        // far fewer numbers than 20, so sampling fails with context.
        let mut store = MemoryStore::new();
        store.insert(
            "lotofacil",
            vec![HistoricalDraw::new(
                1,
                vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            )],
        );
        let registry = FormatRegistry::builtin();
        let mut request = GenerationRequest::new("lotofacil", Strategy::General);
        request.size = Some(20);
        request.seed = Some(2);

        let err = generate(&store, &registry, &request).unwrap_err();
        match err {
            GenerateError::Sampling {
                strategy, format, ..
            } => {
                assert_eq!(strategy, "general");
                assert_eq!(format, "lotofacil");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn positional_format_cannot_generate_pool_games() {
        let digits = LotteryFormat::new(
            "supersete",
            "Super Sete",
            0,
            9,
            7,
            7,
            7,
            crate::format::DrawShape::PositionalDigits { columns: 7 },
        )
        .unwrap();
        let registry = FormatRegistry::builtin().with_format(digits);
        let store = MemoryStore::new();
        let request = GenerationRequest::new("supersete", Strategy::Uniform);

        let err = generate(&store, &registry, &request).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedShape(key) if key == "supersete"));
    }

    #[test]
    fn premium_entry_point_uses_the_draw_size() {
        let store = store_with_history();
        let registry = FormatRegistry::builtin();
        let premium = generate_premium(&store, &registry, "megasena", Some(42)).unwrap();
        assert_eq!(premium.game.len(), 6);
    }

    #[test]
    fn monte_carlo_entry_point_honors_anchors() {
        let store = store_with_history();
        let registry = FormatRegistry::builtin();
        let anchors = vec!["7".to_string(), "21".to_string()];
        let game =
            generate_monte_carlo(&store, &registry, "megasena", &anchors, Some(42)).unwrap();
        assert_eq!(game.len(), 6);
        assert!(game.contains(7));
        assert!(game.contains(21));
    }
}
