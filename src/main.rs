//! Base Candy — headless match-three driver: plays hinted swaps and reports the session.

use anyhow::Result;
use basecandy::game::{Game, GameEvent, SessionPhase};
use basecandy::highscores::{self, Leaderboard};
use basecandy::{EngineConfig, SeededRandom};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = EngineConfig {
        rows: args.rows,
        cols: args.cols,
        kinds: args.kinds,
        fill_attempt_cap: args.fill_attempts,
        shuffle_attempt_cap: args.shuffle_attempts,
        session_secs: args.time_limit,
        ..EngineConfig::default()
    };
    let seed = args.seed.unwrap_or_else(highscores::now_secs);
    info!(seed, "starting session");
    let mut game = Game::new(config, SeededRandom::new(seed))?;
    for ev in game.take_pending_events() {
        report(&ev);
    }
    if args.board {
        print!("{}", game.grid());
    }

    let mut moves = 0;
    while game.phase() == SessionPhase::Running && moves < args.moves {
        let Some((a, b)) = game.hint() else {
            println!("no productive swap left");
            break;
        };
        let outcome = game.attempt_swap(a, b);
        moves += 1;
        println!("move {moves}: {a} <-> {b}");
        for ev in &outcome.events {
            report(ev);
        }
        if args.board {
            print!("{}", game.grid());
        }
        game.tick(args.secs_per_move);
    }

    let summary = game.summary();
    println!("final score: {}", summary.score);
    println!("{}", summary.compliment);

    if !args.no_save {
        let path = highscores::config_path();
        let mut board = Leaderboard::load(&path);
        match board.record(summary.score, &args.name, highscores::now_secs()) {
            Some(rank) => println!("rank #{rank}"),
            None => println!("not in the top {}", highscores::MAX_RECORDS),
        }
        board.save(&path)?;
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

fn report(ev: &GameEvent) {
    match ev {
        GameEvent::Match { kind, cells, points } => {
            println!("  {kind} x{} +{points}", cells.len());
        }
        GameEvent::Special { kind, at, spawned } => match spawned {
            Some(tile) => println!("  {kind}: {} created at {at}", tile.asset_name()),
            None => println!("  {kind} effect at {at}"),
        },
        GameEvent::Combo { passes, bonus } => println!("  {passes}x COMBO! +{bonus}"),
        GameEvent::Invalid { a, b } => println!("  invalid swap {a} <-> {b}"),
        GameEvent::Rejected { reason } => println!("  rejected: {reason:?}"),
        GameEvent::NoMove => println!("  no moves available"),
        GameEvent::Shuffle { attempts, degraded } => {
            println!("  shuffled ({attempts} attempts{})", if *degraded { ", degraded" } else { "" });
        }
        GameEvent::FillDegraded { attempts } => {
            println!("  starting board kept a match after {attempts} attempts");
        }
    }
}

/// Plays a Base Candy session headlessly by always taking the first available swap.
#[derive(Debug, Parser)]
#[command(
    name = "basecandy",
    version,
    about = "Headless match-three session: swaps, cascades, combos and reshuffles.",
    long_about = "Base Candy is a match-three puzzle engine.\n\n\
        Swap adjacent tiles to line up three or more of the same base. A run of four leaves a \
        super tile, five a mega tile; matching power tiles clears rows, columns or whole areas. \
        Cascades that resolve more than once pay a combo bonus.\n\n\
        This driver plays the first productive swap each turn and prints what happened."
)]
pub struct Args {
    /// Board rows.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub rows: usize,

    /// Board columns.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub cols: usize,

    /// Number of base kinds in play (2..=6).
    #[arg(short, long, default_value = "6", value_name = "N")]
    pub kinds: usize,

    /// RNG seed. Defaults to the current time.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Maximum number of swaps to play.
    #[arg(short, long, default_value = "30", value_name = "N")]
    pub moves: u32,

    /// Session length in seconds.
    #[arg(long, default_value = "60", value_name = "SECS")]
    pub time_limit: u32,

    /// Simulated seconds spent per move.
    #[arg(long, default_value = "2", value_name = "SECS")]
    pub secs_per_move: u32,

    /// Attempts at a match-free starting board before accepting one with a match.
    #[arg(long, default_value = "100", value_name = "N")]
    pub fill_attempts: u32,

    /// Attempts at a playable reshuffle (no match, at least one move) before giving up.
    #[arg(long, default_value = "50", value_name = "N")]
    pub shuffle_attempts: u32,

    /// Print the board after every move.
    #[arg(short, long)]
    pub board: bool,

    /// Leaderboard name.
    #[arg(short, long, default_value = "Anonymous")]
    pub name: String,

    /// Do not write the score to the leaderboard.
    #[arg(long)]
    pub no_save: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
