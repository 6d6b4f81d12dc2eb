//! Game session: swap validation, cascade stepping, score, pause, clock and hints.
//!
//! All mutation happens through `&mut self`, and a swap is only accepted while no cascade is
//! in flight. Abnormal outcomes come back as [`GameEvent`]s rather than errors.

use crate::cascade::{Cascade, CascadeState, CascadeStep};
use crate::config::{ConfigError, EngineConfig};
use crate::deadlock::{ShuffleOutcome, find_hint, resolve_deadlock};
use crate::grid::{Grid, Position};
use crate::matcher::{MatchKind, has_any_match, has_match_at};
use crate::rng::{RandomSource, SeededRandom};
use crate::tile::Tile;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A cascade is still resolving.
    Busy,
    Paused,
    /// The session clock ran out.
    Over,
}

/// Something a front-end may want to animate, play a sound for, or show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Match {
        kind: MatchKind,
        cells: Vec<Position>,
        points: u32,
    },
    /// A power effect fired, or a power tile was created (`spawned`).
    Special {
        kind: MatchKind,
        at: Position,
        spawned: Option<Tile>,
    },
    Combo { passes: u32, bonus: u32 },
    /// The swap was not adjacent, or produced no match, and has been undone.
    Invalid { a: Position, b: Position },
    Rejected { reason: RejectReason },
    /// The settled board had no productive swap.
    NoMove,
    Shuffle { attempts: u32, degraded: bool },
    /// Starting board still holds a match after the fill attempt cap.
    FillDegraded { attempts: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapOutcome {
    pub accepted: bool,
    pub events: Vec<GameEvent>,
}

impl SwapOutcome {
    fn rejected(events: Vec<GameEvent>) -> Self {
        Self {
            accepted: false,
            events,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Over,
}

/// A freshly generated starting board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub grid: Grid,
    pub attempts: u32,
    /// True if the attempt cap ran out and the board still holds a match.
    pub degraded: bool,
}

/// Generate a random board with no pre-existing match, retrying up to the configured cap.
pub fn initialize<R: RandomSource>(config: &EngineConfig, rng: &mut R) -> Fill {
    let mut grid = Grid::new(config.rows, config.cols);
    let mut attempts = 0;
    loop {
        grid.fill_random(rng, config.kinds);
        attempts += 1;
        if !has_any_match(&grid) {
            return Fill {
                grid,
                attempts,
                degraded: false,
            };
        }
        if attempts >= config.fill_attempt_cap {
            warn!(attempts, "fill attempt cap reached, starting with a match on the board");
            return Fill {
                grid,
                attempts,
                degraded: true,
            };
        }
    }
}

/// End-of-game message for a final score.
pub fn compliment(score: u32) -> &'static str {
    match score {
        0..200 => "Nice try! Keep practicing.",
        200..500 => "Good job! You're getting the hang of it.",
        500..1000 => "Impressive! You're a Base Candy master.",
        _ => "Legendary score! You're crushing it.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub compliment: &'static str,
}

pub struct Game<R = SeededRandom> {
    config: EngineConfig,
    grid: Grid,
    rng: R,
    score: u32,
    cascade: Option<Cascade>,
    paused: bool,
    phase: SessionPhase,
    time_left: u32,
    idle_secs: u32,
    pending: Vec<GameEvent>,
}

impl<R: RandomSource> Game<R> {
    /// Start a session on a freshly generated board.
    pub fn new(config: EngineConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let fill = initialize(&config, &mut rng);
        let mut game = Self::assemble(config, fill.grid, rng);
        if fill.degraded {
            game.pending.push(GameEvent::FillDegraded {
                attempts: fill.attempts,
            });
        }
        info!(rows = game.config.rows, cols = game.config.cols, "session started");
        Ok(game)
    }

    /// Start a session on a given board. The board dimensions override `config`.
    pub fn with_grid(mut config: EngineConfig, grid: Grid, rng: R) -> Result<Self, ConfigError> {
        config.rows = grid.rows();
        config.cols = grid.cols();
        config.validate()?;
        Ok(Self::assemble(config, grid, rng))
    }

    fn assemble(config: EngineConfig, grid: Grid, rng: R) -> Self {
        Self {
            time_left: config.session_secs,
            config,
            grid,
            rng,
            score: 0,
            cascade: None,
            paused: false,
            phase: SessionPhase::Running,
            idle_secs: 0,
            pending: Vec::new(),
        }
    }

    /// Throw the board away and start over with a new one, zero score and a full clock.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let fill = initialize(&self.config, &mut self.rng);
        self.grid = fill.grid;
        self.score = 0;
        self.cascade = None;
        self.paused = false;
        self.phase = SessionPhase::Running;
        self.time_left = self.config.session_secs;
        self.idle_secs = 0;
        self.pending.clear();
        info!("session reset");
        if fill.degraded {
            vec![GameEvent::FillDegraded {
                attempts: fill.attempts,
            }]
        } else {
            Vec::new()
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_score(&self) -> u32 {
        self.score
    }

    pub fn is_busy(&self) -> bool {
        self.cascade.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Cascade state; `Idle` when no cascade is in flight.
    pub fn cascade_state(&self) -> CascadeState {
        self.cascade.as_ref().map_or(CascadeState::Idle, Cascade::state)
    }

    /// Events raised outside a swap (e.g. a degraded starting fill).
    pub fn take_pending_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    fn gate(&self) -> Option<RejectReason> {
        if self.phase == SessionPhase::Over {
            Some(RejectReason::Over)
        } else if self.paused {
            Some(RejectReason::Paused)
        } else if self.is_busy() {
            Some(RejectReason::Busy)
        } else {
            None
        }
    }

    /// Validate and commit a swap, leaving the cascade ready to be stepped with [`Self::advance`].
    pub fn begin_swap(&mut self, a: Position, b: Position) -> SwapOutcome {
        let mut events = self.take_pending_events();
        if let Some(reason) = self.gate() {
            events.push(GameEvent::Rejected { reason });
            return SwapOutcome::rejected(events);
        }
        if !self.grid.contains(a) || !self.grid.contains(b) || !a.is_adjacent(b) {
            events.push(GameEvent::Invalid { a, b });
            return SwapOutcome::rejected(events);
        }
        self.grid.swap(a, b);
        if !has_match_at(&self.grid, &[a, b]) {
            self.grid.swap(a, b);
            debug!(%a, %b, "swap produced no match");
            events.push(GameEvent::Invalid { a, b });
            return SwapOutcome::rejected(events);
        }
        debug!(%a, %b, "swap accepted");
        self.cascade = Some(Cascade::new(self.config.kinds));
        self.idle_secs = 0;
        SwapOutcome {
            accepted: true,
            events,
        }
    }

    /// Perform one cascade step. Returns no events when nothing is in flight.
    pub fn advance(&mut self) -> Vec<GameEvent> {
        let Some(cascade) = self.cascade.as_mut() else {
            return Vec::new();
        };
        let mut events = Vec::new();
        match cascade.step(&mut self.grid, &mut self.rng) {
            CascadeStep::Resolved {
                matches, points, ..
            } => {
                self.score += points;
                for m in matches {
                    let at = m
                        .resolution
                        .spawned
                        .map_or(m.cells[m.cells.len() / 2], |(pos, _)| pos);
                    let special = m.resolution.special;
                    let spawned = m.resolution.spawned.map(|(_, t)| t);
                    events.push(GameEvent::Match {
                        kind: m.kind,
                        cells: m.cells,
                        points: m.resolution.points,
                    });
                    if special {
                        events.push(GameEvent::Special {
                            kind: m.kind,
                            at,
                            spawned,
                        });
                    }
                }
            }
            CascadeStep::Collapsed { .. } => {}
            CascadeStep::Settled { passes, bonus } => {
                if passes > 1 {
                    self.score += bonus;
                    info!(passes, bonus, "combo");
                    events.push(GameEvent::Combo { passes, bonus });
                }
                self.cascade = None;
                self.check_deadlock(&mut events);
            }
        }
        events
    }

    fn check_deadlock(&mut self, events: &mut Vec<GameEvent>) {
        let outcome = resolve_deadlock(
            &mut self.grid,
            &mut self.rng,
            self.config.shuffle_attempt_cap,
        );
        let (attempts, degraded) = match outcome {
            ShuffleOutcome::NotNeeded => return,
            ShuffleOutcome::Shuffled { attempts } => (attempts, false),
            ShuffleOutcome::Degraded { attempts } => (attempts, true),
        };
        events.push(GameEvent::NoMove);
        events.push(GameEvent::Shuffle { attempts, degraded });
    }

    /// Swap and run the resulting cascade to completion.
    pub fn attempt_swap(&mut self, a: Position, b: Position) -> SwapOutcome {
        let mut outcome = self.begin_swap(a, b);
        while outcome.accepted && self.is_busy() {
            outcome.events.extend(self.advance());
        }
        outcome
    }

    /// Flip the pause gate. Resuming restarts the hint countdown. Returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.idle_secs = 0;
        }
        self.paused
    }

    /// Advance the session clock. Ignored while paused or after the session ended.
    /// Returns true once the session is over.
    pub fn tick(&mut self, elapsed_secs: u32) -> bool {
        if self.paused || self.phase == SessionPhase::Over {
            return self.phase == SessionPhase::Over;
        }
        self.time_left = self.time_left.saturating_sub(elapsed_secs);
        self.idle_secs = self.idle_secs.saturating_add(elapsed_secs);
        if self.time_left == 0 {
            self.phase = SessionPhase::Over;
            info!(score = self.score, "time up");
        }
        self.phase == SessionPhase::Over
    }

    /// True if the player has been idle long enough for a hint.
    pub fn hint_due(&self) -> bool {
        self.gate().is_none() && self.idle_secs >= self.config.hint_delay_secs
    }

    /// A productive swap, if one exists and the session is accepting input.
    pub fn hint(&mut self) -> Option<(Position, Position)> {
        if self.gate().is_some() {
            return None;
        }
        find_hint(&mut self.grid)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            score: self.score,
            compliment: compliment(self.score),
        }
    }
}
