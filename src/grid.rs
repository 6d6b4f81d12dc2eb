//! Playfield: fixed-size grid of cells, plus gravity and refill.

use crate::rng::RandomSource;
use crate::tile::{Base, Tier, Tile};
use std::fmt;

/// Board coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if the two positions share an edge.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Single cell: either empty or holding a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Tile(Tile),
}

impl Cell {
    pub fn tile(self) -> Option<Tile> {
        match self {
            Self::Tile(t) => Some(t),
            Self::Empty => None,
        }
    }
}

/// Random normal tile drawn from the first `kinds` bases.
pub fn random_tile<R: RandomSource>(rng: &mut R, kinds: usize) -> Tile {
    let kinds = kinds.clamp(1, Base::ALL.len());
    Tile::normal(Base::ALL[rng.below(kinds)])
}

/// Row-major grid of cells. Out-of-range access is a caller bug and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Grid filled with random normal tiles. May contain matches; see [`crate::game::initialize`].
    pub fn random<R: RandomSource>(rows: usize, cols: usize, kinds: usize, rng: &mut R) -> Self {
        let mut grid = Self::new(rows, cols);
        grid.fill_random(rng, kinds);
        grid
    }

    /// Parse a whitespace-separated board: `a` normal, `A` super, `A*` mega, `.` empty.
    /// Glyphs are the [`Base::glyph`] letters. Intended for fixtures and tests.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<Vec<Cell>> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.split_whitespace().map(parse_token).collect())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, Vec::len);
        assert!(
            lines.iter().all(|l| l.len() == cols),
            "ragged board text"
        );
        Self {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {pos} outside {}x{} grid",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    #[inline]
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.get(pos).tile()
    }

    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Exchange two cells in place.
    pub fn swap(&mut self, a: Position, b: Position) {
        let (i, j) = (self.index(a), self.index(b));
        self.cells.swap(i, j);
    }

    /// Empty a cell. Returns false if it was already empty.
    pub fn clear(&mut self, pos: Position) -> bool {
        let i = self.index(pos);
        let was_tile = self.cells[i] != Cell::Empty;
        self.cells[i] = Cell::Empty;
        was_tile
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Position::new(r, c)))
    }

    /// Positions within Chebyshev distance `radius` of `pos` (including `pos`), clipped to the grid.
    pub fn neighbourhood(&self, pos: Position, radius: usize) -> Vec<Position> {
        let r0 = pos.row.saturating_sub(radius);
        let r1 = (pos.row + radius).min(self.rows - 1);
        let c0 = pos.col.saturating_sub(radius);
        let c1 = (pos.col + radius).min(self.cols - 1);
        (r0..=r1)
            .flat_map(|r| (c0..=c1).map(move |c| Position::new(r, c)))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// Overwrite every cell with a random normal tile.
    pub fn fill_random<R: RandomSource>(&mut self, rng: &mut R, kinds: usize) {
        for cell in &mut self.cells {
            *cell = Cell::Tile(random_tile(rng, kinds));
        }
    }

    /// Compact one column's tiles downward, keeping their order, and refill the cells left
    /// open at the top with random normal tiles. Returns the number of tiles spawned.
    pub fn collapse_column<R: RandomSource>(&mut self, col: usize, rng: &mut R, kinds: usize) -> usize {
        assert!(col < self.cols, "column {col} outside grid of {} columns", self.cols);
        let mut write = self.rows;
        for r in (0..self.rows).rev() {
            let pos = Position::new(r, col);
            if let Cell::Tile(t) = self.get(pos) {
                write -= 1;
                if write != r {
                    self.set(Position::new(write, col), Cell::Tile(t));
                    self.set(pos, Cell::Empty);
                }
            }
        }
        for r in 0..write {
            self.set(Position::new(r, col), Cell::Tile(random_tile(rng, kinds)));
        }
        write
    }

    /// Collapse and refill every column. Returns the total number of tiles spawned.
    pub fn collapse<R: RandomSource>(&mut self, rng: &mut R, kinds: usize) -> usize {
        (0..self.cols)
            .map(|c| self.collapse_column(c, rng, kinds))
            .sum()
    }
}

fn parse_token(tok: &str) -> Cell {
    if tok == "." {
        return Cell::Empty;
    }
    let mut chars = tok.chars();
    let glyph = chars.next().unwrap_or('.');
    let rest: String = chars.collect();
    let base = Base::ALL
        .into_iter()
        .find(|b| b.glyph() == glyph.to_ascii_lowercase())
        .unwrap_or_else(|| panic!("unknown tile glyph {tok:?}"));
    let tier = match (glyph.is_ascii_uppercase(), rest.as_str()) {
        (false, "") => Tier::Normal,
        (true, "") => Tier::Super,
        (true, "*") => Tier::Mega,
        _ => panic!("malformed tile token {tok:?}"),
    };
    Cell::Tile(Tile::new(base, tier))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c > 0 {
                    f.write_str(" ")?;
                }
                match self.get(Position::new(r, c)) {
                    Cell::Empty => f.write_str(".")?,
                    Cell::Tile(t) => write!(f, "{t}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
