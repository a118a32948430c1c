//! Terminal runner (default binary).
//!
//! `play` runs a live, recorded match; `replay` plays the saved session back
//! in the terminal; `verify` re-simulates it headlessly; `ranking` prints
//! stored results. Logs go to a file because the terminal belongs to the
//! renderer.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tetris_replay::core::{time_seed, Match, Player, ReplaySession};
use tetris_replay::engine::{simulate, GameController, LoopConfig, MatchSummary};
use tetris_replay::frontend::{run_terminal, ChannelObserver};
use tetris_replay::store::{
    JsonFileReplayStore, JsonlMatchStore, MatchStore, ReplayStore, StorageConfig,
};
use tetris_replay::term::TerminalRenderer;

/// Falling-block puzzle with deterministic replays
#[derive(Parser, Debug)]
#[command(name = "tetris-replay")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Replay session file (overrides TETRIS_REPLAY_PATH)
    #[arg(long, global = true)]
    replay_path: Option<PathBuf>,

    /// Match results file (overrides TETRIS_RESULTS_PATH)
    #[arg(long, global = true)]
    results_path: Option<PathBuf>,

    /// Log file; filter with TETRIS_LOG
    #[arg(long, global = true, default_value = "tetris-replay.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a live match and record it
    Play {
        #[arg(long, default_value = "player")]
        player: String,

        /// Fixed seed; defaults to the current time
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play back the saved session
    Replay {
        #[arg(long, default_value = "player")]
        player: String,
    },

    /// Re-simulate the saved session without a terminal and print the outcome
    Verify {
        #[arg(long, default_value = "player")]
        player: String,
    },

    /// Show the best stored results
    Ranking {
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Only this player's results
        #[arg(long)]
        player: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let mut storage = StorageConfig::from_env();
    if let Some(path) = cli.replay_path {
        storage.replay_path = path;
    }
    if let Some(path) = cli.results_path {
        storage.results_path = path;
    }
    let config = LoopConfig::from_env();

    let command = cli.command.unwrap_or(Command::Play {
        player: "player".to_string(),
        seed: None,
    });
    match command {
        Command::Play { player, seed } => {
            play(&storage, config, Player::new(player), seed.unwrap_or_else(time_seed))
        }
        Command::Replay { player } => replay(&storage, config, Player::new(player)),
        Command::Verify { player } => verify(&storage, &config, Player::new(player)),
        Command::Ranking { limit, player } => ranking(&storage, limit, player.as_deref()),
    }
}

fn init_tracing(path: &Path) -> Result<()> {
    let log_file =
        File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("TETRIS_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn play(storage: &StorageConfig, config: LoopConfig, player: Player, seed: u64) -> Result<()> {
    let game = Match::new(format!("match-{seed}"), player, seed);
    let controller = GameController::new(game, config)
        .with_match_store(Arc::new(JsonlMatchStore::new(&storage.results_path)))
        .with_replay_store(Arc::new(JsonFileReplayStore::new(&storage.replay_path)));
    let summary = run_controller(controller, "PLAY")?;

    if summary.replay_saved {
        println!("Replay saved to {}", storage.replay_path.display());
    }
    print_summary(&summary);
    Ok(())
}

fn replay(storage: &StorageConfig, config: LoopConfig, player: Player) -> Result<()> {
    let session = match JsonFileReplayStore::new(&storage.replay_path).load() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "no playable replay, starting a live match");
            eprintln!("Cannot load replay ({e}); starting a new match.");
            return play(storage, config, player, time_seed());
        }
    };

    info!(seed = session.seed, events = session.len(), "replay loaded");
    let game = Match::new(format!("replay-{}", session.seed), player, session.seed);
    let controller = GameController::new(game, config).playback(session);
    let summary = run_controller(controller, "REPLAY")?;
    print_summary(&summary);
    Ok(())
}

fn run_controller(controller: GameController, mode: &str) -> Result<MatchSummary> {
    let (observer, rx) = ChannelObserver::channel();
    let handle = controller
        .with_observer(observer)
        .spawn()
        .context("start game loop")?;
    let name = handle.player().name;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run_terminal(&mut term, &handle, &rx, &name, mode);
    // Always try to restore terminal state.
    let _ = term.exit();

    handle.stop();
    let summary = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop panicked"))?;
    if let Err(e) = &result {
        error!(error = ?e, "terminal loop failed");
    }
    result.map(|()| summary)
}

fn verify(storage: &StorageConfig, config: &LoopConfig, player: Player) -> Result<()> {
    let session: ReplaySession = JsonFileReplayStore::new(&storage.replay_path)
        .load()
        .with_context(|| format!("load replay {}", storage.replay_path.display()))?;
    let sim = simulate(&session, player, config);
    let game = &sim.game;

    println!("seed      {}", session.seed);
    println!("events    {}/{}", sim.events_applied, session.len());
    println!("steps     {}", sim.steps);
    println!("score     {}", game.score());
    println!("level     {}", game.level());
    println!("lines     {}", game.lines());
    println!("game over {}", game.is_game_over());
    if !sim.complete {
        println!("warning: session ended before all events were applied");
    }
    Ok(())
}

fn ranking(storage: &StorageConfig, limit: usize, player: Option<&str>) -> Result<()> {
    let store = JsonlMatchStore::new(&storage.results_path);
    let records = match player {
        Some(name) => {
            let player = Player::new(name);
            let stats = store.player_stats(player.id)?;
            println!(
                "{}: {} matches, best {}, {} lines",
                player.name, stats.matches, stats.best_score, stats.total_lines
            );
            store.player_scores(player.id, limit)?
        }
        None => store.top_scores(limit)?,
    };

    for (rank, record) in records.iter().enumerate() {
        println!(
            "{:>3}. {:<16} {:>8}  L{:<3} {:>4} lines  {}",
            rank + 1,
            record.player_name,
            record.score,
            record.level,
            record.lines,
            record.finished_at.format("%Y-%m-%d %H:%M"),
        );
    }
    if records.is_empty() {
        println!("No results yet.");
    }
    Ok(())
}

fn print_summary(summary: &MatchSummary) {
    println!(
        "{} - score {} level {} lines {}{}",
        summary.player.name,
        summary.snapshot.score,
        summary.snapshot.level,
        summary.snapshot.lines,
        if summary.game_over() { " (game over)" } else { "" },
    );
}
