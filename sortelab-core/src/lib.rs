//! SorteLab Core — lottery formats, draw statistics, and the
//! number-synthesis engine.
//!
//! This crate contains the whole engine:
//! - Format registry with per-format rules and draw-shape capabilities
//! - Frequency engine over historical draws (full or windowed)
//! - Weighted sampler with distinct-set accumulation and retry budgets
//! - Six generation strategies (uniform, general, hot, cold, mixed,
//!   Monte Carlo refinement)
//! - Historical profile analyzer and the premium scorer/selector
//! - Draw history store abstraction (memory and CSV backed)
//!
//! The engine is synchronous and stateless across calls: each request
//! fetches its own history snapshot and computes in memory. It performs
//! no I/O beyond what the configured [`store::DrawStore`] does.

pub mod config;
pub mod domain;
pub mod format;
pub mod frequency;
pub mod generator;
pub mod premium;
pub mod profile;
pub mod rng;
pub mod sampler;
pub mod stats;
pub mod store;
pub mod strategy;

pub use config::{ConfigError, GenerationRequest, DEFAULT_WINDOW};
pub use domain::{AnchorSet, GeneratedGame, HistoricalDraw, MAX_ANCHORS};
pub use format::{DrawShape, FormatError, FormatRegistry, LotteryFormat};
pub use frequency::FrequencyTable;
pub use generator::{generate, generate_monte_carlo, generate_premium, GenerateError};
pub use premium::{PremiumGame, CANDIDATE_POOL_SIZE};
pub use profile::HistoricalProfile;
pub use sampler::{sample_uniform, sample_weighted, SampleError};
pub use stats::{DrawStatistics, NumberFrequency};
pub use store::{CsvStore, DrawStore, MemoryStore, StoreError};
pub use strategy::{Strategy, MONTE_CARLO_TRIALS};
