//! Per-match clear effects. The resolver touches only the grid; the caller owns the score.

use crate::grid::{Cell, Grid, Position};
use crate::matcher::{ClassifiedMatch, MatchKind};
use crate::rng::RandomSource;
use crate::tile::{Tier, Tile};
use std::collections::BTreeSet;

const NORMAL_POINTS: u32 = 10;
const FIVE_RUN_POINTS: u32 = 25;
const SUPER_SUPER_POINTS: u32 = 8;
const SUPER_MEGA_POINTS: u32 = 15;
const MEGA_MEGA_POINTS: u32 = 25;
const LINE_POINTS: u32 = 5;
const RECT_POINTS: u32 = 6;

/// Rows x columns of the blast around a mega-normal match.
const RECT_SIZE: (usize, usize) = (3, 4);

/// What one resolved match did to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub points: u32,
    /// Cells that went from tile to empty.
    pub cleared: usize,
    /// Power tile left behind by a four- or five-run.
    pub spawned: Option<(Position, Tile)>,
    /// True for anything beyond a plain three-run.
    pub special: bool,
}

impl Resolution {
    fn clear(&mut self, grid: &mut Grid, pos: Position, points: u32) {
        if grid.clear(pos) {
            self.points += points;
            self.cleared += 1;
        }
    }

    fn clear_all(&mut self, grid: &mut Grid, cells: &[Position], points: u32) {
        for &pos in cells {
            self.clear(grid, pos, points);
        }
    }
}

/// Apply the effect of one classified match and return what it awarded.
pub fn resolve<R: RandomSource>(m: &ClassifiedMatch, grid: &mut Grid, rng: &mut R) -> Resolution {
    let mut res = Resolution::default();
    match m.kind {
        MatchKind::Normal if m.len() <= 3 => {
            res.clear_all(grid, &m.cells, NORMAL_POINTS);
        }
        MatchKind::Normal => {
            let (tier, points) = if m.len() == 4 {
                (Tier::Super, NORMAL_POINTS)
            } else {
                (Tier::Mega, FIVE_RUN_POINTS)
            };
            let center = m.center();
            for &pos in m.cells.iter().filter(|&&p| p != center) {
                res.clear(grid, pos, points);
            }
            let tile = Tile::normal(m.base).promoted(tier);
            grid.set(center, Cell::Tile(tile));
            res.spawned = Some((center, tile));
            res.special = true;
        }
        MatchKind::SuperSuper => {
            res.clear_all(grid, &m.cells, SUPER_SUPER_POINTS);
            let blast: BTreeSet<Position> = m
                .cells
                .iter()
                .flat_map(|&p| grid.neighbourhood(p, 1))
                .collect();
            for pos in blast {
                res.clear(grid, pos, SUPER_SUPER_POINTS);
            }
            res.special = true;
        }
        MatchKind::NormalSuper => {
            res.clear_all(grid, &m.cells, NORMAL_POINTS);
            clear_random_lines(&mut res, grid, rng, 2);
            res.special = true;
        }
        MatchKind::NormalMega => {
            res.clear_all(grid, &m.cells, NORMAL_POINTS);
            clear_random_lines(&mut res, grid, rng, 3);
            res.special = true;
        }
        MatchKind::MegaNormal => {
            res.clear_all(grid, &m.cells, NORMAL_POINTS);
            clear_rect_around(&mut res, grid, m.center());
            res.special = true;
        }
        MatchKind::SuperMega => {
            res.clear_all(grid, &m.cells, SUPER_MEGA_POINTS);
            clear_random_lines(&mut res, grid, rng, 5);
            res.special = true;
        }
        MatchKind::MegaMega => {
            res.clear_all(grid, &m.cells, MEGA_MEGA_POINTS);
            clear_random_lines(&mut res, grid, rng, 4);
            res.special = true;
        }
    }
    res
}

/// Clear `n` distinct random rows, then `n` distinct random columns (capped at the grid size).
fn clear_random_lines<R: RandomSource>(res: &mut Resolution, grid: &mut Grid, rng: &mut R, n: usize) {
    let mut rows: Vec<usize> = (0..grid.rows()).collect();
    rng.shuffle(&mut rows);
    for &r in rows.iter().take(n) {
        for c in 0..grid.cols() {
            res.clear(grid, Position::new(r, c), LINE_POINTS);
        }
    }
    let mut cols: Vec<usize> = (0..grid.cols()).collect();
    rng.shuffle(&mut cols);
    for &c in cols.iter().take(n) {
        for r in 0..grid.rows() {
            res.clear(grid, Position::new(r, c), LINE_POINTS);
        }
    }
}

fn clear_rect_around(res: &mut Resolution, grid: &mut Grid, center: Position) {
    let (h, w) = RECT_SIZE;
    let r0 = center.row.saturating_sub(h / 2);
    let r1 = (r0 + h - 1).min(grid.rows() - 1);
    let c0 = center.col.saturating_sub(w / 2);
    let c1 = (c0 + w - 1).min(grid.cols() - 1);
    for r in r0..=r1 {
        for c in c0..=c1 {
            res.clear(grid, Position::new(r, c), RECT_POINTS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_all_matches;
    use crate::rng::ScriptedRandom;
    use crate::tile::Base;

    fn p(r: usize, c: usize) -> Position {
        Position::new(r, c)
    }

    fn only_match(g: &Grid) -> ClassifiedMatch {
        let ms = find_all_matches(g, None);
        assert_eq!(ms.len(), 1, "expected one match, got {ms:?}");
        ms.into_iter().next().unwrap()
    }

    /// 7x7 board with no same-base neighbours and no `a` tiles, with `tiles` planted
    /// left to right in row 3 from column 2.
    fn planted(tiles: &[Tier]) -> Grid {
        let palette = [Base::Base, Base::Optimism, Base::Zksync, Base::Ethereum, Base::Solana];
        let mut g = Grid::new(7, 7);
        let cells: Vec<Position> = g.positions().collect();
        for pos in cells {
            let base = palette[(pos.row + 2 * pos.col) % palette.len()];
            g.set(pos, Cell::Tile(Tile::normal(base)));
        }
        for (i, &tier) in tiles.iter().enumerate() {
            g.set(p(3, 2 + i), Cell::Tile(Tile::new(Base::Arbitrum, tier)));
        }
        g
    }

    /// Cells still holding a tile after the first `n` rows and columns from a zeros()
    /// shuffle of 0..7 ([1, 2, .., 6, 0]) were cleared.
    fn assert_lines_cleared(g: &Grid, n: usize) {
        for pos in g.positions() {
            let hit = (1..=n).contains(&pos.row) || (1..=n).contains(&pos.col);
            assert_eq!(g.is_empty(pos), hit, "{pos} after clearing {n} lines:\n{g}");
        }
    }

    #[test]
    fn normal_mega_clears_three_rows_and_three_columns() {
        let mut g = planted(&[Tier::Normal, Tier::Normal, Tier::Mega]);
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::NormalMega);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_lines_cleared(&g, 3);
        // matched 3 at 10; rows 1..=3 add 18 cells, columns 1..=3 another 12, all at 5
        assert_eq!(res.cleared, 33);
        assert_eq!(res.points, 3 * 10 + 30 * 5);
        assert!(res.special);
    }

    #[test]
    fn super_mega_clears_five_rows_and_five_columns() {
        let mut g = planted(&[Tier::Super, Tier::Mega]);
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::SuperMega);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_lines_cleared(&g, 5);
        // matched 2 at 15; rows 1..=5 add 33 cells, columns 1..=5 another 10
        assert_eq!(res.cleared, 45);
        assert_eq!(res.points, 2 * 15 + 43 * 5);
        assert_eq!(g.empty_count(), 45);
    }

    #[test]
    fn mega_pair_clears_four_rows_and_four_columns() {
        let mut g = planted(&[Tier::Mega, Tier::Mega]);
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::MegaMega);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_lines_cleared(&g, 4);
        // matched 2 at 25; rows 1..=4 add 26 cells, columns 1..=4 another 12
        assert_eq!(res.cleared, 40);
        assert_eq!(res.points, 2 * 25 + 38 * 5);
    }

    #[test]
    fn three_run_clears_three_for_thirty() {
        let mut g = Grid::from_text(
            "a a a e
             e o s z",
        );
        let m = only_match(&g);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_eq!(res.points, 30);
        assert_eq!(res.cleared, 3);
        assert!(!res.special);
        assert_eq!(g.empty_count(), 3);
    }

    #[test]
    fn four_run_leaves_super_at_center() {
        let mut g = Grid::from_text(
            "s s s s o
             e o z a e",
        );
        let m = only_match(&g);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_eq!(res.points, 30);
        assert_eq!(res.cleared, 3);
        assert_eq!(g.tile(p(0, 2)), Some(Tile::new(Base::Solana, Tier::Super)));
        assert_eq!(res.spawned, Some((p(0, 2), Tile::new(Base::Solana, Tier::Super))));
        assert_eq!(g.empty_count(), 3);
    }

    #[test]
    fn five_run_leaves_mega_at_center() {
        let mut g = Grid::from_text(
            "z z z z z
             e o s a e",
        );
        let m = only_match(&g);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        assert_eq!(res.points, 4 * 25);
        assert_eq!(g.tile(p(0, 2)), Some(Tile::new(Base::Zksync, Tier::Mega)));
    }

    #[test]
    fn super_pair_blasts_neighbourhood_once() {
        let mut g = Grid::from_text(
            "e o s z
             o A A e
             s z e o
             z e o s",
        );
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::SuperSuper);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        // rows 0..=2, cols 0..=3 -> 12 cells
        assert_eq!(res.cleared, 12);
        assert_eq!(res.points, 12 * 8);
        assert!((0..4).all(|c| !g.is_empty(p(3, c))));
    }

    #[test]
    fn mega_normal_clears_three_by_four_rect() {
        let mut g = Grid::from_text(
            "e o s z e o
             o s z e o s
             s z a A* e z
             z e o s z e
             e o s z e o",
        );
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::MegaNormal);
        assert_eq!(m.center(), p(2, 3));
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        // matched cells at 10, then rows 1..=3 x cols 1..=4 minus the two already empty at 6
        assert_eq!(res.cleared, 12);
        assert_eq!(res.points, 2 * 10 + 10 * 6);
        assert!(!g.is_empty(p(2, 0)));
        assert!(!g.is_empty(p(2, 5)));
        assert!(g.is_empty(p(1, 1)));
        assert!(g.is_empty(p(3, 4)));
    }

    #[test]
    fn normal_super_clears_two_rows_and_two_columns() {
        let mut g = Grid::from_text(
            "e o s z e
             o a A a o
             s z e o s
             z e o s z
             e o s z e",
        );
        let m = only_match(&g);
        assert_eq!(m.kind, MatchKind::NormalSuper);
        let res = resolve(&m, &mut g, &mut ScriptedRandom::zeros());
        // zeros() shuffles [0..5] to [1, 2, 3, 4, 0]: rows 1 and 2, then columns 1 and 2
        assert!((0..5).all(|c| g.is_empty(p(1, c)) && g.is_empty(p(2, c))));
        assert!((0..5).all(|r| g.is_empty(p(r, 1)) && g.is_empty(p(r, 2))));
        assert_eq!(g.empty_count(), 16);
        assert_eq!(res.points, 3 * 10 + 13 * 5);
    }
}
