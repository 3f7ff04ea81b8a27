use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connect_n::ai::EngineConfig;
use connect_n::arena::{run_match, ArenaConfig, Contender, OpponentKind};
use connect_n::config::AppConfig;

/// Pit the search engine against a random player or a weaker engine.
#[derive(Parser)]
#[command(name = "arena", about = "Play headless connect-N matches")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games
    #[arg(long)]
    games: Option<usize>,

    /// Override the engine's search depth
    #[arg(long)]
    depth: Option<i32>,

    /// Override the engine's mistake rate
    #[arg(long)]
    mistake_rate: Option<f64>,

    /// Opponent: random or engine
    #[arg(long)]
    opponent: Option<String>,

    /// Override the opponent engine's search depth
    #[arg(long)]
    opponent_depth: Option<i32>,

    /// Base seed for both sides
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.arena.games = games;
    }
    if let Some(depth) = cli.depth {
        app_config.engine.depth = depth;
    }
    if let Some(rate) = cli.mistake_rate {
        app_config.engine.mistake_rate = rate;
    }
    if let Some(opponent) = cli.opponent.as_deref() {
        app_config.arena.opponent = match opponent {
            "random" => OpponentKind::Random,
            "engine" => OpponentKind::Engine,
            other => bail!("unknown opponent '{}' (expected 'random' or 'engine')", other),
        };
    }
    if let Some(depth) = cli.opponent_depth {
        app_config.arena.opponent_depth = depth;
    }
    if let Some(seed) = cli.seed {
        app_config.engine.seed = Some(seed);
    }
    app_config.validate().context("invalid settings")?;

    let engine = Contender::Engine(app_config.engine.clone());
    let opponent = opponent_for(&app_config.arena, &app_config.engine, cli.seed);

    println!(
        "{} vs {} over {} games on a {}x{} board (connect {})",
        engine.name(),
        opponent.name(),
        app_config.arena.games,
        app_config.arena.width,
        app_config.arena.height,
        app_config.arena.win_condition,
    );

    let stats = run_match(&engine, &opponent, &app_config.arena)?;

    println!(
        "{}: {} wins ({:.1}%)",
        engine.name(),
        stats.a_wins,
        stats.a_win_rate() * 100.0
    );
    println!(
        "{}: {} wins ({:.1}%)",
        opponent.name(),
        stats.b_wins,
        stats.b_win_rate() * 100.0
    );
    println!("Draws: {} ({:.1}%)", stats.draws, stats.draw_rate() * 100.0);
    println!("Average game length: {:.1} moves", stats.average_length());

    Ok(())
}

fn opponent_for(arena: &ArenaConfig, engine: &EngineConfig, seed: Option<u64>) -> Contender {
    // Offset so the two sides never share a random stream.
    let seed = seed.map(|s| s.wrapping_add(1_000_003));
    match arena.opponent {
        OpponentKind::Random => Contender::Random { seed },
        OpponentKind::Engine => Contender::Engine(EngineConfig {
            name: "Opponent".to_string(),
            depth: arena.opponent_depth,
            mistake_rate: arena.opponent_mistake_rate,
            seed,
            ..engine.clone()
        }),
    }
}
