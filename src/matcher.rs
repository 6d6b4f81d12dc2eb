//! Match detection: same-base runs along rows and columns, classified by tier mix.

use crate::grid::{Grid, Position};
use crate::tile::{Base, Tier};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Maximal contiguous same-base sequence of at least two tiles along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub axis: Axis,
    pub base: Base,
    pub cells: Vec<Position>,
}

/// Resolution type of a run, derived from the tiers of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Normal,
    SuperSuper,
    MegaMega,
    SuperMega,
    NormalSuper,
    NormalMega,
    MegaNormal,
}

impl MatchKind {
    /// Shortest run that still counts as this kind.
    pub fn min_len(self) -> usize {
        match self {
            Self::Normal | Self::NormalSuper | Self::NormalMega => 3,
            Self::SuperSuper | Self::MegaMega | Self::SuperMega | Self::MegaNormal => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::SuperSuper => "super-super",
            Self::MegaMega => "mega-mega",
            Self::SuperMega => "super-mega",
            Self::NormalSuper => "normal-super",
            Self::NormalMega => "normal-mega",
            Self::MegaNormal => "mega-normal",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMatch {
    pub kind: MatchKind,
    pub base: Base,
    /// Run positions in scan order (left to right, or top to bottom).
    pub cells: Vec<Position>,
}

impl ClassifiedMatch {
    /// Middle cell; for even lengths the later of the two middle cells.
    pub fn center(&self) -> Position {
        self.cells[self.cells.len() / 2]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn touches(&self, positions: &[Position]) -> bool {
        self.cells.iter().any(|p| positions.contains(p))
    }
}

/// All runs of length >= 2: every row left to right, then every column top to bottom.
/// Empty cells break runs. Horizontal and vertical runs may share positions.
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let mut runs = Vec::new();
    for r in 0..grid.rows() {
        scan_line(
            grid,
            Axis::Horizontal,
            (0..grid.cols()).map(|c| Position::new(r, c)),
            &mut runs,
        );
    }
    for c in 0..grid.cols() {
        scan_line(
            grid,
            Axis::Vertical,
            (0..grid.rows()).map(|r| Position::new(r, c)),
            &mut runs,
        );
    }
    runs
}

fn scan_line(
    grid: &Grid,
    axis: Axis,
    line: impl Iterator<Item = Position>,
    out: &mut Vec<Run>,
) {
    let mut current: Option<(Base, Vec<Position>)> = None;
    for pos in line {
        let base = grid.tile(pos).map(|t| t.base);
        if let (Some((b, cells)), Some(base)) = (current.as_mut(), base) {
            if *b == base {
                cells.push(pos);
                continue;
            }
        }
        flush(axis, current.take(), out);
        current = base.map(|b| (b, vec![pos]));
    }
    flush(axis, current, out);
}

fn flush(axis: Axis, run: Option<(Base, Vec<Position>)>, out: &mut Vec<Run>) {
    if let Some((base, cells)) = run {
        if cells.len() >= 2 {
            out.push(Run { axis, base, cells });
        }
    }
}

/// Classify a run by the tiers it contains. `None` if no rule applies or the run is too short.
pub fn classify(run: &Run, grid: &Grid) -> Option<ClassifiedMatch> {
    let (mut normal, mut sup, mut mega) = (0usize, 0usize, 0usize);
    for &pos in &run.cells {
        match grid.tile(pos)?.tier {
            Tier::Normal => normal += 1,
            Tier::Super => sup += 1,
            Tier::Mega => mega += 1,
        }
    }
    let kind = match (normal, sup, mega) {
        (_, 0, 0) => MatchKind::Normal,
        (0, _, 0) => MatchKind::SuperSuper,
        (0, 0, _) => MatchKind::MegaMega,
        (0, _, _) => MatchKind::SuperMega,
        (2, 1, 0) => MatchKind::NormalSuper,
        (2, 0, 1) => MatchKind::NormalMega,
        (n, _, m) if n > 0 && m > 0 => MatchKind::MegaNormal,
        _ => return None,
    };
    (run.cells.len() >= kind.min_len()).then(|| ClassifiedMatch {
        kind,
        base: run.base,
        cells: run.cells.clone(),
    })
}

/// Every classified match on the board, optionally restricted to those touching one of
/// `filter`, deduplicated so no two returned matches share a position. Earlier matches in
/// scan order win.
pub fn find_all_matches(grid: &Grid, filter: Option<&[Position]>) -> Vec<ClassifiedMatch> {
    let mut claimed: HashSet<Position> = HashSet::new();
    let mut out = Vec::new();
    for run in find_runs(grid) {
        let Some(m) = classify(&run, grid) else {
            continue;
        };
        if let Some(f) = filter {
            if !f.is_empty() && !m.touches(f) {
                continue;
            }
        }
        if m.cells.iter().any(|p| claimed.contains(p)) {
            continue;
        }
        claimed.extend(m.cells.iter().copied());
        out.push(m);
    }
    out
}

/// True if the board holds at least one classified match.
pub fn has_any_match(grid: &Grid) -> bool {
    find_runs(grid).iter().any(|r| classify(r, grid).is_some())
}

/// True if some match touches either of the given positions.
pub fn has_match_at(grid: &Grid, positions: &[Position]) -> bool {
    find_runs(grid)
        .iter()
        .filter(|r| r.cells.iter().any(|p| positions.contains(p)))
        .any(|r| classify(r, grid).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(r: usize, c: usize) -> Position {
        Position::new(r, c)
    }

    fn kind_of(row: &str) -> Option<MatchKind> {
        let g = Grid::from_text(row);
        let runs = find_runs(&g);
        let h = runs.iter().find(|r| r.axis == Axis::Horizontal)?;
        classify(h, &g).map(|m| m.kind)
    }

    #[test]
    fn runs_are_maximal_and_split_by_base() {
        let g = Grid::from_text("a a e e e s");
        let runs = find_runs(&g);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].cells, vec![p(0, 0), p(0, 1)]);
        assert_eq!(runs[1].cells, vec![p(0, 2), p(0, 3), p(0, 4)]);
    }

    #[test]
    fn empty_cells_break_runs() {
        let g = Grid::from_text("a . a a");
        let runs = find_runs(&g);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].cells, vec![p(0, 2), p(0, 3)]);
    }

    #[test]
    fn mixed_tiers_share_a_run() {
        let g = Grid::from_text("a A A* a");
        let runs = find_runs(&g);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].cells.len(), 4);
    }

    #[test]
    fn classification_table() {
        assert_eq!(kind_of("a a a"), Some(MatchKind::Normal));
        assert_eq!(kind_of("a a s"), None);
        assert_eq!(kind_of("A A s"), Some(MatchKind::SuperSuper));
        assert_eq!(kind_of("A* A* s"), Some(MatchKind::MegaMega));
        assert_eq!(kind_of("A A* s"), Some(MatchKind::SuperMega));
        assert_eq!(kind_of("a A a"), Some(MatchKind::NormalSuper));
        assert_eq!(kind_of("a a A*"), Some(MatchKind::NormalMega));
        assert_eq!(kind_of("a A* s"), Some(MatchKind::MegaNormal));
        assert_eq!(kind_of("a a a A*"), Some(MatchKind::MegaNormal));
        assert_eq!(kind_of("a A A* s"), Some(MatchKind::MegaNormal));
        // normal + super outside the exact 2+1 mix has no rule
        assert_eq!(kind_of("a A s"), None);
        assert_eq!(kind_of("a a a A"), None);
    }

    #[test]
    fn center_rounds_toward_later_cell() {
        let g = Grid::from_text("a a a a");
        let m = classify(&find_runs(&g)[0], &g).unwrap();
        assert_eq!(m.center(), p(0, 2));
    }

    #[test]
    fn crossing_runs_first_found_wins() {
        let g = Grid::from_text(
            "e a e
             a a a
             e a e",
        );
        let ms = find_all_matches(&g, None);
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].cells, vec![p(1, 0), p(1, 1), p(1, 2)]);
    }

    #[test]
    fn filter_restricts_to_touching_matches() {
        let g = Grid::from_text(
            "a a a s
             e o z s
             e o z s",
        );
        assert_eq!(find_all_matches(&g, None).len(), 2);
        let only = find_all_matches(&g, Some(&[p(2, 3)]));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].base, Base::Solana);
        assert!(find_all_matches(&g, Some(&[p(1, 1)])).is_empty());
        assert!(has_match_at(&g, &[p(0, 0)]));
        assert!(!has_match_at(&g, &[p(1, 1)]));
    }
}
