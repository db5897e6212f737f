/// Column-major playfield.
///
/// Cells are addressed `[x][y]` with `0 <= x < width`, `0 <= y < height`,
/// the same orientation the packed level format fills. Storage is one flat
/// vector of exactly `width * height` tiles.
///
/// All reads go through `get()`, which treats anything outside the grid as
/// `None`, so move resolution never indexes out of range even on levels
/// without a closed wall border.

use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Step by a unit vector. `None` when the result would be negative.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Position> {
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(Position { x, y })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid { width, height, cells: vec![Tile::Empty; width * height] }
    }

    /// Build from tiles in fill order: flat index `p` lands on
    /// `(p % width, p / width)`.
    /// Returns `None` unless `flat.len() == width * height`.
    pub fn from_fill_order(width: usize, height: usize, flat: Vec<Tile>) -> Option<Self> {
        if flat.len() != width * height {
            return None;
        }
        let mut grid = Grid::new(width, height);
        for (p, tile) in flat.into_iter().enumerate() {
            let i = grid.index(p % width, p / width);
            grid.cells[i] = tile;
        }
        Some(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    /// Tile at `pos`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Tile> {
        if self.contains(pos) {
            Some(self.cells[self.index(pos.x, pos.y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if self.contains(pos) {
            let i = self.index(pos.x, pos.y);
            self.cells[i] = tile;
        }
    }

    /// Number of cells holding exactly `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Tiles in fill order (row by row, x fastest).
    pub fn fill_order(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.len()).map(move |p| self.cells[self.index(p % self.width, p / self.width)])
    }
}
