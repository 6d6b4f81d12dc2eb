//! Deadlock detection (is any single swap productive?), hints and reshuffling.

use crate::grid::{Cell, Grid, Position};
use crate::matcher::{has_any_match, has_match_at};
use crate::rng::RandomSource;
use tracing::{info, warn};

/// True if swapping `a` and `b` would create a match touching either of them.
/// The grid is restored before returning.
pub fn swap_would_match(grid: &mut Grid, a: Position, b: Position) -> bool {
    grid.swap(a, b);
    let hit = has_match_at(grid, &[a, b]);
    grid.swap(a, b);
    hit
}

/// Candidate swaps in probe order: for each cell row-major, its right neighbour, then the one below.
fn forward_pairs(rows: usize, cols: usize) -> impl Iterator<Item = (Position, Position)> {
    (0..rows).flat_map(move |r| {
        (0..cols).flat_map(move |c| {
            let here = Position::new(r, c);
            let right = (c + 1 < cols).then(|| (here, Position::new(r, c + 1)));
            let down = (r + 1 < rows).then(|| (here, Position::new(r + 1, c)));
            right.into_iter().chain(down)
        })
    })
}

/// First productive swap in probe order, if any.
pub fn find_hint(grid: &mut Grid) -> Option<(Position, Position)> {
    forward_pairs(grid.rows(), grid.cols()).find(|&(a, b)| swap_would_match(grid, a, b))
}

pub fn has_valid_move(grid: &mut Grid) -> bool {
    find_hint(grid).is_some()
}

/// Result of [`resolve_deadlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOutcome {
    /// A move already existed; nothing was touched.
    NotNeeded,
    /// Tiles were permuted until the board held no match and at least one productive swap.
    Shuffled { attempts: u32 },
    /// The attempt cap ran out; the last permutation stands even though it holds a match
    /// or still has no move.
    Degraded { attempts: u32 },
}

/// Permute every tile across the occupied cells. Empty cells stay where they are.
pub fn shuffle_tiles<R: RandomSource>(grid: &mut Grid, rng: &mut R) {
    let occupied: Vec<Position> = grid.positions().filter(|&p| !grid.is_empty(p)).collect();
    let mut tiles: Vec<Cell> = occupied.iter().map(|&p| grid.get(p)).collect();
    rng.shuffle(&mut tiles);
    for (pos, cell) in occupied.into_iter().zip(tiles) {
        grid.set(pos, cell);
    }
}

/// If no move exists, reshuffle until the board is playable again: no match on it, and some
/// swap that makes one. Gives up after `attempt_cap` permutations.
pub fn resolve_deadlock<R: RandomSource>(grid: &mut Grid, rng: &mut R, attempt_cap: u32) -> ShuffleOutcome {
    if has_valid_move(grid) {
        return ShuffleOutcome::NotNeeded;
    }
    info!("no moves available, shuffling");
    let mut attempts = 0;
    loop {
        shuffle_tiles(grid, rng);
        attempts += 1;
        if !has_any_match(grid) && has_valid_move(grid) {
            return ShuffleOutcome::Shuffled { attempts };
        }
        if attempts >= attempt_cap {
            warn!(attempts, "shuffle attempt cap reached, keeping an unresolved board");
            return ShuffleOutcome::Degraded { attempts };
        }
    }
}
