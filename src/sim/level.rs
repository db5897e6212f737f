/// Levels: the decoded playfield, its display transform, and the level set.
///
/// ## Sources
///   Built-in packed buffers (see `codec` for the format). Buffers are
///   immutable and looked up by index; a level is decoded afresh every time
///   it is entered, restarted by undo, or advanced to after a win.
///
/// ## Display transform
///   A uniform scale + centering offset fitting `width x height` tiles of
///   `tile_size` pixels into a fixed viewport. Pure function of its inputs;
///   game logic never reads it.

use crate::domain::grid::{Grid, Position};
use crate::domain::rules;

use super::codec::{self, LevelError};

/// A decoded level: grid plus player start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub player: Position,
}

impl Level {
    pub fn new(grid: Grid, player: Position) -> Self {
        Level { grid, player }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn boxes_left(&self) -> usize {
        rules::boxes_left(&self.grid)
    }
}

// ══════════════════════════════════════════════════════════════
// Display transform
// ══════════════════════════════════════════════════════════════

/// Target surface the level is fitted into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub tile_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 1900.0, height: 1000.0, tile_size: 64.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    /// Uniform zoom factor (same horizontally and vertically).
    pub scale: f64,
    /// Screen offset of the grid's top-left corner.
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayTransform {
    /// Fit `width x height` tiles into the viewport, centering along the
    /// axis with slack. The tighter axis decides the scale and gets no offset.
    pub fn fit(width: usize, height: usize, viewport: &Viewport) -> Self {
        let level_w = viewport.tile_size * width as f64;
        let level_h = viewport.tile_size * height as f64;
        if level_w <= 0.0 || level_h <= 0.0 {
            return DisplayTransform { scale: 1.0, offset_x: 0.0, offset_y: 0.0 };
        }

        let factor_w = viewport.width / level_w;
        let factor_h = viewport.height / level_h;

        if factor_w > factor_h {
            DisplayTransform {
                scale: factor_h,
                offset_x: (viewport.width - factor_h * level_w) / 2.0,
                offset_y: 0.0,
            }
        } else {
            DisplayTransform {
                scale: factor_w,
                offset_x: 0.0,
                offset_y: (viewport.height - factor_w * level_h) / 2.0,
            }
        }
    }

    /// Screen position of the top-left corner of tile `(x, y)`.
    pub fn tile_origin(&self, x: usize, y: usize, tile_size: f64) -> (f64, f64) {
        (
            self.offset_x + x as f64 * tile_size * self.scale,
            self.offset_y + y as f64 * tile_size * self.scale,
        )
    }
}

// ══════════════════════════════════════════════════════════════
// Level set
// ══════════════════════════════════════════════════════════════

/// Runtime level entry (name + packed buffer).
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub data: Vec<u8>,
}

/// Ordered, immutable collection of packed levels.
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<LevelDef>,
    viewport: Viewport,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelDef>, viewport: Viewport) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyLevelSet);
        }
        Ok(LevelSet { levels, viewport })
    }

    /// The levels bundled with the game.
    pub fn embedded(viewport: Viewport) -> Self {
        LevelSet { levels: embedded_levels(), viewport }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn max_index(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.max_index())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.levels.get(index).map(|l| l.name.as_str())
    }

    /// Decode the level at `index` from its packed buffer.
    pub fn decode(&self, index: usize) -> Result<Level, LevelError> {
        let def = self.levels.get(index).ok_or(LevelError::NoSuchLevel { index })?;
        codec::decode(&def.data)
    }
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Warehouse", &LEVEL_WAREHOUSE),
        make_embedded("Loading Dock", &LEVEL_LOADING_DOCK),
        make_embedded("Ten Crates", &LEVEL_TEN_CRATES),
        make_embedded("Long Corridor", &LEVEL_LONG_CORRIDOR),
        make_embedded("Crossroads", &LEVEL_CROSSROADS),
    ]
}

fn make_embedded(name: &str, data: &[u8]) -> LevelDef {
    LevelDef { name: name.to_string(), data: data.to_vec() }
}

// ```
//   ####
// ###  #
// #  $ #
// # #. ##
// # *   #
// # @ ###
// #####
// ```
const LEVEL_WAREHOUSE: [u8; 19] = [
    0x07, 0x07, 0x82, 0x91, 0x2C, 0x04, 0x18, 0x10, 0x20, 0x82, 0xC2, 0x50, 0xF2, 0x43, 0x27,
    0x30, 0x00, 0x02, 0x05,
];

// ```
// #######
// #     #
// # .$. #
// # $@$ #
// # .$. #
// #     #
// #######
// ```
const LEVEL_LOADING_DOCK: [u8; 17] = [
    0x07, 0x07, 0xE6, 0xC8, 0x43, 0x26, 0x10, 0x84, 0x10, 0x84, 0x32, 0x61, 0x0D, 0x9C, 0x80,
    0x03, 0x03,
];

// ```
// ############
// #..  #     ###
// #..  # $  $  #
// #..  #$####  #
// #..    @ ##  #
// #..  # #  $ ##
// ###### ##$ $ #
//   # $  $ $ $ #
//   #    #     #
//   ############
// ```
const LEVEL_TEN_CRATES: [u8; 43] = [
    0x0E, 0x0A, 0xF6, 0x58, 0x0C, 0x68, 0x0D, 0x94, 0xC6, 0x80, 0x85, 0x02, 0x82, 0x18, 0xD0,
    0x15, 0x4C, 0x10, 0xC6, 0xC2, 0x18, 0x21, 0x8D, 0x01, 0x06, 0x04, 0x39, 0x10, 0xA0, 0x81,
    0x80, 0x85, 0x02, 0x08, 0x20, 0x60, 0x34, 0x1B, 0x0C, 0x1E, 0xCA, 0x07, 0x04,
];

// ```
//     #####
//     #   #
//     #$  #
//   ###  $##
//   #  $ $ #
// ### # ## #   ######
// #   # ## #####  ..#
// # $  $          ..#
// ##### ### #@##  ..#
//     #     #########
//     #######
// ```
const LEVEL_LONG_CORRIDOR: [u8; 47] = [
    0x13, 0x0B, 0xA2, 0xDF, 0x2C, 0x32, 0x1F, 0x2C, 0x2A, 0x03, 0xE4, 0x92, 0xC0, 0xA1, 0xF2,
    0x03, 0x02, 0x08, 0x1F, 0x25, 0x04, 0x42, 0x0C, 0x9A, 0xC8, 0x44, 0x22, 0xD8, 0x23, 0x42,
    0x14, 0x0B, 0xC1, 0x1B, 0x11, 0x28, 0x22, 0x18, 0x23, 0x1A, 0x0D, 0x9E, 0xD1, 0xAF, 0x00,
    0x0B, 0x08,
];

// ```
//         ########
//         #     @#
//         # $#$ ##
//         # $  $#
//         ##$ $ #
// ######### $ # ###
// #....  ## $  $  #
// ##...    $  $   #
// #....  ##########
// ########
// ```
const LEVEL_CROSSROADS: [u8; 37] = [
    0x11, 0x0A, 0xE3, 0x9F, 0x0E, 0x07, 0xC2, 0x11, 0x42, 0x1F, 0x08, 0x50, 0x23, 0xE0, 0x85,
    0x04, 0x0C, 0x1E, 0x84, 0x08, 0xA6, 0xB4, 0x10, 0x85, 0x02, 0x82, 0x59, 0xD4, 0x28, 0x14,
    0x90, 0xD6, 0x83, 0xDF, 0x7C, 0x0E, 0x01,
];

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::Tile;

    fn set() -> LevelSet {
        LevelSet::embedded(Viewport::default())
    }

    #[test]
    fn every_embedded_level_decodes_with_exact_tile_count() {
        let levels = set();
        for i in 0..levels.len() {
            let level = levels.decode(i).unwrap_or_else(|e| panic!("level {i}: {e}"));
            assert_eq!(level.grid.len(), level.width() * level.height(), "level {i}");
            assert!(level.grid.contains(level.player), "level {i}");
        }
    }

    #[test]
    fn embedded_levels_match_their_diagrams() {
        let levels = set();
        let expected = [
            // (width, height, player, boxes, goals incl. placed)
            (7, 7, (2, 5), 1, 2),
            (7, 7, (3, 3), 4, 4),
            (14, 10, (7, 4), 10, 10),
            (19, 11, (11, 8), 6, 6),
            (17, 10, (14, 1), 11, 11),
        ];
        for (i, &(w, h, (px, py), boxes, goals)) in expected.iter().enumerate() {
            let level = levels.decode(i).unwrap();
            assert_eq!((level.width(), level.height()), (w, h), "level {i}");
            assert_eq!(level.player, Position::new(px, py), "level {i}");
            assert_eq!(level.boxes_left(), boxes, "level {i}");
            let g = &level.grid;
            assert_eq!(g.count(Tile::Goal) + g.count(Tile::PlacedBox), goals, "level {i}");
            // the player never starts inside a wall or a box
            assert!(g.get(level.player).unwrap().is_walkable(), "level {i}");
        }
    }

    #[test]
    fn every_embedded_level_has_a_closed_border_row() {
        let levels = set();
        for i in 0..levels.len() {
            let level = levels.decode(i).unwrap();
            let top_walls = (0..level.width())
                .filter(|&x| level.grid.get(Position::new(x, 0)) == Some(Tile::Wall))
                .count();
            assert!(top_walls > 0, "level {i}");
        }
    }

    #[test]
    fn decode_rejects_unknown_index() {
        assert_eq!(set().decode(99).unwrap_err(), LevelError::NoSuchLevel { index: 99 });
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = LevelSet::new(vec![], Viewport::default()).unwrap_err();
        assert_eq!(err, LevelError::EmptyLevelSet);
    }

    #[test]
    fn clamp_keeps_index_in_range() {
        let levels = set();
        assert_eq!(levels.clamp(0), 0);
        assert_eq!(levels.clamp(levels.max_index() + 3), levels.max_index());
    }

    // ── Display transform ──

    #[test]
    fn wide_viewport_fits_height_and_centers_horizontally() {
        let vp = Viewport::default(); // 1900 x 1000, 64px tiles
        let t = DisplayTransform::fit(10, 10, &vp); // 640 x 640
        assert!((t.scale - 1000.0 / 640.0).abs() < 1e-9);
        assert!((t.offset_x - (1900.0 - 1000.0) / 2.0).abs() < 1e-9);
        assert_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn wide_level_fits_width_and_centers_vertically() {
        let vp = Viewport { width: 1000.0, height: 1000.0, tile_size: 10.0 };
        let t = DisplayTransform::fit(50, 20, &vp); // 500 x 200
        assert!((t.scale - 2.0).abs() < 1e-9);
        assert_eq!(t.offset_x, 0.0);
        assert!((t.offset_y - 300.0).abs() < 1e-9);
        let (x, y) = t.tile_origin(1, 1, vp.tile_size);
        assert!((x - 20.0).abs() < 1e-9);
        assert!((y - 320.0).abs() < 1e-9);
    }
}
