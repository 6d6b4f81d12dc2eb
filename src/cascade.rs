//! Cascade driver: resolve every match, collapse, rescan, until the board settles.
//!
//! The driver is stepped one pass at a time so a front-end can pace animations between
//! a resolution pass and the collapse that follows it.

use crate::grid::{Grid, Position};
use crate::matcher::{MatchKind, find_all_matches};
use crate::resolver::{Resolution, resolve};
use crate::rng::RandomSource;
use crate::tile::Base;
use tracing::{debug, warn};

/// Bonus per resolution pass beyond the first.
pub const COMBO_BONUS: u32 = 50;

/// Hard stop for pathological random sources that refill into matches forever.
const MAX_PASSES: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeState {
    #[default]
    Idle,
    Resolving,
    Collapsing,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub kind: MatchKind,
    pub base: Base,
    pub cells: Vec<Position>,
    pub resolution: Resolution,
}

/// Outcome of a single [`Cascade::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeStep {
    /// One resolution pass: every deduplicated match on the board was applied.
    Resolved {
        pass: u32,
        matches: Vec<ResolvedMatch>,
        points: u32,
    },
    /// Columns compacted and refilled.
    Collapsed { spawned: usize },
    /// No match left. `bonus` is the combo award, zero for a single pass.
    Settled { passes: u32, bonus: u32 },
}

/// Summary of a cascade run to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub passes: u32,
    pub match_points: u32,
    pub combo_bonus: u32,
    pub matches: Vec<ResolvedMatch>,
}

impl CascadeReport {
    pub fn total_points(&self) -> u32 {
        self.match_points + self.combo_bonus
    }
}

pub fn combo_bonus(passes: u32) -> u32 {
    passes.saturating_sub(1) * COMBO_BONUS
}

#[derive(Debug, Clone)]
pub struct Cascade {
    state: CascadeState,
    passes: u32,
    kinds: usize,
}

impl Cascade {
    /// New driver; refills draw from the first `kinds` bases, which must be at least two.
    pub fn new(kinds: usize) -> Self {
        assert!(kinds >= 2, "a cascade needs at least two base kinds, got {kinds}");
        Self {
            state: CascadeState::Idle,
            passes: 0,
            kinds,
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Number of resolution passes so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn is_settled(&self) -> bool {
        self.state == CascadeState::Settled
    }

    /// Advance by exactly one resolution or collapse pass. Once settled, keeps returning `Settled`.
    pub fn step<R: RandomSource>(&mut self, grid: &mut Grid, rng: &mut R) -> CascadeStep {
        match self.state {
            CascadeState::Idle | CascadeState::Resolving => self.resolve_pass(grid, rng),
            CascadeState::Collapsing => {
                let spawned = grid.collapse(rng, self.kinds);
                self.state = CascadeState::Resolving;
                debug!(spawned, "collapsed");
                CascadeStep::Collapsed { spawned }
            }
            CascadeState::Settled => self.settled(),
        }
    }

    fn resolve_pass<R: RandomSource>(&mut self, grid: &mut Grid, rng: &mut R) -> CascadeStep {
        self.state = CascadeState::Resolving;
        let found = find_all_matches(grid, None);
        if found.is_empty() {
            self.state = CascadeState::Settled;
            return self.settled();
        }
        if self.passes >= MAX_PASSES {
            warn!(passes = self.passes, "cascade pass cap reached, settling with matches on board");
            self.state = CascadeState::Settled;
            return self.settled();
        }
        self.passes += 1;
        let mut points = 0;
        let matches: Vec<ResolvedMatch> = found
            .into_iter()
            .map(|m| {
                let resolution = resolve(&m, grid, rng);
                points += resolution.points;
                ResolvedMatch {
                    kind: m.kind,
                    base: m.base,
                    cells: m.cells,
                    resolution,
                }
            })
            .collect();
        debug!(pass = self.passes, matches = matches.len(), points, "resolved");
        self.state = CascadeState::Collapsing;
        CascadeStep::Resolved {
            pass: self.passes,
            matches,
            points,
        }
    }

    fn settled(&self) -> CascadeStep {
        CascadeStep::Settled {
            passes: self.passes,
            bonus: combo_bonus(self.passes),
        }
    }

    /// Drive the cascade until it settles.
    pub fn run_to_settled<R: RandomSource>(&mut self, grid: &mut Grid, rng: &mut R) -> CascadeReport {
        let mut report = CascadeReport::default();
        loop {
            match self.step(grid, rng) {
                CascadeStep::Resolved {
                    matches, points, ..
                } => {
                    report.match_points += points;
                    report.matches.extend(matches);
                }
                CascadeStep::Collapsed { .. } => {}
                CascadeStep::Settled { passes, bonus } => {
                    report.passes = passes;
                    report.combo_bonus = bonus;
                    return report;
                }
            }
        }
    }
}

/// Run a fresh cascade on `grid` to completion.
pub fn run_cascade<R: RandomSource>(grid: &mut Grid, rng: &mut R, kinds: usize) -> CascadeReport {
    Cascade::new(kinds).run_to_settled(grid, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::has_any_match;
    use crate::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn bonus_is_zero_for_one_pass_and_grows_after() {
        assert_eq!(combo_bonus(0), 0);
        assert_eq!(combo_bonus(1), 0);
        assert_eq!(combo_bonus(2), 50);
        assert_eq!(combo_bonus(4), 150);
    }

    #[test]
    fn quiet_board_settles_immediately() {
        let mut g = Grid::from_text(
            "a e
             e a",
        );
        let mut c = Cascade::new(6);
        assert_eq!(
            c.step(&mut g, &mut ScriptedRandom::zeros()),
            CascadeStep::Settled { passes: 0, bonus: 0 }
        );
        assert!(c.is_settled());
    }

    #[test]
    fn steps_alternate_resolve_and_collapse() {
        // Refill cycles e, o, s, z so the three new tiles in row 0 never line up.
        let mut g = Grid::from_text(
            "e o s z
             a a a o
             o s z e",
        );
        let mut rng = ScriptedRandom::new(vec![4, 2, 5, 3]);
        let mut c = Cascade::new(6);

        let CascadeStep::Resolved { pass, points, matches } = c.step(&mut g, &mut rng) else {
            panic!("expected a resolution pass");
        };
        assert_eq!((pass, points, matches.len()), (1, 30, 1));
        assert_eq!(c.state(), CascadeState::Collapsing);

        assert_eq!(c.step(&mut g, &mut rng), CascadeStep::Collapsed { spawned: 3 });
        assert_eq!(c.state(), CascadeState::Resolving);
        assert_eq!(g.empty_count(), 0);
    }

    #[test]
    #[should_panic(expected = "at least two base kinds")]
    fn single_kind_palette_is_refused() {
        let _ = Cascade::new(1);
    }

    #[test]
    fn random_boards_settle_without_matches() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..20 {
            let mut g = Grid::random(8, 8, 6, &mut rng);
            let report = run_cascade(&mut g, &mut rng, 6);
            assert!(!has_any_match(&g));
            assert_eq!(g.empty_count(), 0);
            assert_eq!(report.combo_bonus, combo_bonus(report.passes));
        }
    }
}
