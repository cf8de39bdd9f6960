//! SorteLab CLI — game generation and draw statistics commands.
//!
//! Commands:
//! - `generate` — a batch of games under any strategy, from flags or a TOML request file
//! - `premium` — one profile-scored game at the format's draw size
//! - `monte-carlo` — one simulation-refined game at the format's draw size
//! - `stats` — frequency and per-draw statistics for a format
//! - `formats` — list the supported formats

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use sortelab_core::{
    generate, generate_monte_carlo, generate_premium, CsvStore, DrawStatistics, DrawStore,
    FormatRegistry, GenerationRequest, PremiumGame, Strategy,
};

#[derive(Parser)]
#[command(
    name = "sortelab",
    about = "SorteLab CLI — lottery game synthesis from draw history"
)]
struct Cli {
    /// Directory holding `<format>.csv` draw history files.
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of games.
    Generate {
        /// Path to a TOML request file (mutually exclusive with flags).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Format key: megasena, quina, lotofacil, duplasena.
        #[arg(long)]
        format: Option<String>,

        /// Strategy: uniform, general, hot, cold, mixed, monte_carlo.
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Games to generate.
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Numbers per game. Defaults to the format's draw size.
        #[arg(long)]
        size: Option<usize>,

        /// Anchor number forced into every game (repeatable, max 3).
        #[arg(long = "anchor")]
        anchors: Vec<String>,

        /// Recent-contest window for hot/cold/mixed.
        #[arg(long, default_value_t = sortelab_core::DEFAULT_WINDOW)]
        window: usize,

        /// Master seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Emit JSON instead of plain lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate one profile-scored game.
    Premium {
        /// Format key.
        #[arg(long)]
        format: String,

        /// Master seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Emit JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate one Monte-Carlo-refined game.
    MonteCarlo {
        /// Format key.
        #[arg(long)]
        format: String,

        /// Anchor number forced into the game (repeatable, max 3).
        #[arg(long = "anchor")]
        anchors: Vec<String>,

        /// Master seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show draw statistics for a format.
    Stats {
        /// Format key.
        #[arg(long)]
        format: String,

        /// Emit JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the supported formats.
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = CsvStore::new(&cli.data_dir);
    let registry = FormatRegistry::builtin();

    match cli.command {
        Commands::Generate {
            config,
            format,
            strategy,
            count,
            size,
            anchors,
            window,
            seed,
            json,
        } => {
            let request = build_request(
                config, format, strategy, count, size, anchors, window, seed,
            )?;
            run_generate(&store, &registry, &request, json)
        }
        Commands::Premium { format, seed, json } => run_premium(&store, &registry, &format, seed, json),
        Commands::MonteCarlo {
            format,
            anchors,
            seed,
        } => run_monte_carlo(&store, &registry, &format, &anchors, seed),
        Commands::Stats { format, json } => run_stats(&store, &registry, &format, json),
        Commands::Formats => run_formats(&registry),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_request(
    config: Option<PathBuf>,
    format: Option<String>,
    strategy: Option<Strategy>,
    count: usize,
    size: Option<usize>,
    anchors: Vec<String>,
    window: usize,
    seed: Option<u64>,
) -> Result<GenerationRequest> {
    if let Some(path) = config {
        if format.is_some() || strategy.is_some() {
            bail!("--config and --format/--strategy are mutually exclusive");
        }
        return Ok(GenerationRequest::from_file(&path)?);
    }

    let (Some(format), Some(strategy)) = (format, strategy) else {
        bail!("either --config or both --format and --strategy are required");
    };

    let mut request = GenerationRequest::new(&format, strategy);
    request.count = count;
    request.size = size;
    request.anchors = anchors;
    request.window = window;
    request.seed = seed;
    Ok(request)
}

fn run_generate(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    request: &GenerationRequest,
    json: bool,
) -> Result<()> {
    let games = generate(store, registry, request)?;

    if json {
        let rendered: Vec<String> = games.iter().map(|g| g.to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    println!(
        "{} x {} ({} strategy)",
        games.len(),
        request.format,
        request.strategy
    );
    for game in &games {
        println!("  {game}");
    }
    Ok(())
}

fn run_premium(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    format: &str,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let premium = generate_premium(store, registry, format, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&premium)?);
        return Ok(());
    }

    print_premium(format, &premium);
    Ok(())
}

fn print_premium(format: &str, premium: &PremiumGame) {
    println!();
    println!("=== Premium Game ({format}) ===");
    println!("Game:            {}", premium.game);
    println!("Score:           {}/3", premium.score);
    println!("Candidate pool:  {}", premium.pool_size);
    println!("Tied at top:     {}", premium.tied_at_top);
    println!();
    println!("--- Profile ---");
    println!(
        "Sum envelope:    {:.1} to {:.1}",
        premium.profile.sum_range.0, premium.profile.sum_range.1
    );
    let modes: Vec<String> = premium
        .profile
        .parity_modes
        .iter()
        .map(|(e, o)| format!("{e} even / {o} odd"))
        .collect();
    println!(
        "Parity modes:    {}",
        if modes.is_empty() {
            "(no history)".to_string()
        } else {
            modes.join(", ")
        }
    );
    println!("Quadrant target: {}", premium.profile.quadrant_target);
    println!();
}

fn run_monte_carlo(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    format: &str,
    anchors: &[String],
    seed: Option<u64>,
) -> Result<()> {
    let game = generate_monte_carlo(store, registry, format, anchors, seed)?;
    println!("{game}");
    Ok(())
}

fn run_stats(
    store: &dyn DrawStore,
    registry: &FormatRegistry,
    format_key: &str,
    json: bool,
) -> Result<()> {
    let format = registry.get(format_key)?;
    let draws = store.list_draws(&format.key, None)?;
    let stats = DrawStatistics::compute(format, &draws);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("=== {} ===", format.name);
    println!("Draws on record: {}", stats.draw_count);
    println!("Last contest:    {}", stats.last_contest);

    if stats.frequency.is_empty() {
        println!();
        println!("No draw history. Run generation with the uniform strategy,");
        println!(
            "or place a {}.csv history file in the data directory.",
            format.key
        );
        return Ok(());
    }

    println!();
    println!("{:<8} {:>6}", "Number", "Count");
    println!("{}", "-".repeat(15));
    for entry in &stats.frequency {
        println!("{:<8} {:>6}", format!("{:02}", entry.number), entry.count);
    }

    println!();
    println!("{:<16} {:>6}", "Primes per draw", "Draws");
    println!("{}", "-".repeat(23));
    for (primes, count) in &stats.primes_per_draw {
        println!("{:<16} {:>6}", primes, count);
    }

    println!();
    println!("{:<16} {:>6}", "Evens per draw", "Draws");
    println!("{}", "-".repeat(23));
    for (evens, count) in &stats.evens_per_draw {
        println!("{:<16} {:>6}", evens, count);
    }

    Ok(())
}

fn run_formats(registry: &FormatRegistry) -> Result<()> {
    println!(
        "{:<12} {:<12} {:<10} {:<6} {:<12}",
        "Key", "Name", "Range", "Draw", "Selectable"
    );
    println!("{}", "-".repeat(54));
    for format in registry.iter() {
        println!(
            "{:<12} {:<12} {:<10} {:<6} {:<12}",
            format.key,
            format.name,
            format!("{}-{}", format.min_num, format.max_num),
            format.draw_size,
            format!("{}-{}", format.min_selectable, format.max_selectable),
        );
    }
    Ok(())
}
