/// Test helpers: build packed levels from string diagrams.
/// Legend:  '#'=Wall  '$'=Box  '*'=PlacedBox  '.'=Goal  '@'=Player  ' '=Empty
/// Short rows are padded with Empty.

use crate::domain::grid::{Grid, Position};
use crate::domain::tile::Tile;

use super::codec;
use super::level::{Level, LevelDef, LevelSet, Viewport};

pub fn level_from(rows: &[&str]) -> Level {
    let height = rows.len();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut flat = Vec::with_capacity(width * height);
    let mut player = Position::new(0, 0);
    for (y, row) in rows.iter().enumerate() {
        for x in 0..width {
            let ch = row.as_bytes().get(x).copied().unwrap_or(b' ');
            if ch == b'@' {
                player = Position::new(x, y);
            }
            flat.push(match ch {
                b'#' => Tile::Wall,
                b'$' => Tile::Box,
                b'*' => Tile::PlacedBox,
                b'.' => Tile::Goal,
                _    => Tile::Empty,
            });
        }
    }
    let grid = Grid::from_fill_order(width, height, flat).expect("rectangular diagram");
    Level::new(grid, player)
}

pub fn packed(rows: &[&str]) -> Vec<u8> {
    codec::encode(&level_from(rows)).expect("diagram fits the packed format")
}

pub fn level_set(levels: &[&[&str]]) -> LevelSet {
    let defs = levels
        .iter()
        .enumerate()
        .map(|(i, rows)| LevelDef { name: format!("L{i}"), data: packed(rows) })
        .collect();
    LevelSet::new(defs, Viewport::default()).expect("non-empty level set")
}
