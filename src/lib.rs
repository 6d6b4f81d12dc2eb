//! Base Candy: a match-three puzzle engine.
//!
//! Players swap adjacent tiles to line up three or more of the same base. Runs that mix in
//! super and mega tiles trigger area clears; cleared columns collapse and refill, and each
//! extra resolution pass in one cascade pays a combo bonus. When no swap can produce a match
//! the board is reshuffled.
//!
//! The engine is headless. A front-end drives a [`game::Game`] through
//! [`game::Game::attempt_swap`] (or `begin_swap` + `advance` to pace animations) and reacts
//! to the returned [`game::GameEvent`]s.

pub mod cascade;
pub mod config;
pub mod deadlock;
pub mod game;
pub mod grid;
pub mod highscores;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod tile;

pub use config::{ConfigError, EngineConfig};
pub use game::{Game, GameEvent, SwapOutcome};
pub use grid::{Cell, Grid, Position};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use tile::{Base, Tier, Tile};
