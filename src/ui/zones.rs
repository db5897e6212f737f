/// Named screen regions for mouse control.
///
/// The screen is split into a 20x10 lattice of sectors, numbered from 1.
/// Each command owns one sector:
///
/// ```text
///   (1,1)  Undo          (19,1) Previous   (20,1) Next
///   (19,8) Up
///   (18,9) Left          (20,9) Right
///   (19,10) Down
/// ```
///
/// A terminal cell belongs to the sector whose half-open span `[min, max)`
/// contains it, so every cell maps to exactly one sector.

use crate::domain::entity::Command;

pub const SECTORS_X: u16 = 20;
pub const SECTORS_Y: u16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenZone {
    pub command: Command,
    /// 1-based sector column.
    pub sx: u16,
    /// 1-based sector row.
    pub sy: u16,
    pub glyph: &'static str,
}

pub const ZONES: [ScreenZone; 7] = [
    ScreenZone { command: Command::MoveRight, sx: 20, sy: 9, glyph: "▶" },
    ScreenZone { command: Command::MoveLeft, sx: 18, sy: 9, glyph: "◀" },
    ScreenZone { command: Command::MoveUp, sx: 19, sy: 8, glyph: "▲" },
    ScreenZone { command: Command::MoveDown, sx: 19, sy: 10, glyph: "▼" },
    ScreenZone { command: Command::Undo, sx: 1, sy: 1, glyph: "↶" },
    ScreenZone { command: Command::NextLevel, sx: 20, sy: 1, glyph: "»" },
    ScreenZone { command: Command::PreviousLevel, sx: 19, sy: 1, glyph: "«" },
];

/// Sector containing the terminal cell `(col, row)` on a `cols` x `rows`
/// screen, or `None` if the cell is off screen.
pub fn sector_at(col: u16, row: u16, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if cols == 0 || rows == 0 || col >= cols || row >= rows {
        return None;
    }
    let sx = (u32::from(col) * u32::from(SECTORS_X) / u32::from(cols)) as u16 + 1;
    let sy = (u32::from(row) * u32::from(SECTORS_Y) / u32::from(rows)) as u16 + 1;
    Some((sx, sy))
}

/// Command bound to the region under `(col, row)`, if any.
pub fn hit(col: u16, row: u16, cols: u16, rows: u16) -> Option<Command> {
    let (sx, sy) = sector_at(col, row, cols, rows)?;
    ZONES.iter().find(|z| z.sx == sx && z.sy == sy).map(|z| z.command)
}

impl ScreenZone {
    /// Top-left terminal cell of this region: the first cell `sector_at`
    /// maps into it.
    pub fn origin(&self, cols: u16, rows: u16) -> (u16, u16) {
        (span_start(self.sx, SECTORS_X, cols), span_start(self.sy, SECTORS_Y, rows))
    }

    /// Middle cell of this region, where its glyph is drawn.
    pub fn center(&self, cols: u16, rows: u16) -> (u16, u16) {
        let (x0, y0) = self.origin(cols, rows);
        let x1 = span_start(self.sx + 1, SECTORS_X, cols);
        let y1 = span_start(self.sy + 1, SECTORS_Y, rows);
        (x0 + x1.saturating_sub(x0 + 1) / 2, y0 + y1.saturating_sub(y0 + 1) / 2)
    }
}

/// Smallest cell `c` with `c * sectors / cells >= sector - 1`.
fn span_start(sector: u16, sectors: u16, cells: u16) -> u16 {
    let k = u32::from(sector.saturating_sub(1));
    let n = u32::from(cells);
    let s = u32::from(sectors);
    ((k * n + s - 1) / s) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_first_and_last_sector() {
        assert_eq!(sector_at(0, 0, 80, 24), Some((1, 1)));
        assert_eq!(sector_at(79, 23, 80, 24), Some((20, 10)));
        assert_eq!(sector_at(80, 0, 80, 24), None);
        assert_eq!(sector_at(0, 0, 0, 0), None);
    }

    #[test]
    fn spans_are_half_open() {
        // 80 columns: 4 cells per sector
        assert_eq!(sector_at(3, 0, 80, 24).map(|s| s.0), Some(1));
        assert_eq!(sector_at(4, 0, 80, 24).map(|s| s.0), Some(2));
    }

    #[test]
    fn hit_finds_each_region() {
        let (cols, rows) = (80, 20);
        for zone in ZONES {
            let (c, r) = zone.origin(cols, rows);
            assert_eq!(sector_at(c, r, cols, rows), Some((zone.sx, zone.sy)), "{:?}", zone.command);
            assert_eq!(hit(c, r, cols, rows), Some(zone.command));
        }
    }

    #[test]
    fn top_row_controls() {
        // 100x30 screen: sectors are 5 cols by 3 rows
        assert_eq!(hit(0, 0, 100, 30), Some(Command::Undo));
        assert_eq!(hit(96, 1, 100, 30), Some(Command::NextLevel));
        assert_eq!(hit(91, 2, 100, 30), Some(Command::PreviousLevel));
        assert_eq!(hit(50, 15, 100, 30), None);
    }

    #[test]
    fn arrow_cluster() {
        assert_eq!(hit(95, 24, 100, 30), Some(Command::MoveRight));
        assert_eq!(hit(85, 24, 100, 30), Some(Command::MoveLeft));
        assert_eq!(hit(90, 21, 100, 30), Some(Command::MoveUp));
        assert_eq!(hit(90, 27, 100, 30), Some(Command::MoveDown));
        // centre of the cluster is not a region
        assert_eq!(hit(90, 24, 100, 30), None);
    }

    #[test]
    fn center_stays_inside_region() {
        for (cols, rows) in [(80, 24), (100, 30), (123, 41)] {
            for zone in ZONES {
                let (c, r) = zone.center(cols, rows);
                assert_eq!(hit(c, r, cols, rows), Some(zone.command), "{cols}x{rows} {:?}", zone.command);
            }
        }
        // 80x24: Undo spans rows 0..3, so its glyph sits on row 1
        assert_eq!(ZONES[4].center(80, 24), (1, 1));
    }

    #[test]
    fn origin_is_first_cell_of_sector() {
        let zone = ZONES[0]; // Right (20,9)
        let (c, r) = zone.origin(83, 25);
        assert_eq!(sector_at(c, r, 83, 25), Some((20, 9)));
        assert_ne!(sector_at(c - 1, r, 83, 25), Some((20, 9)));
        assert_ne!(sector_at(c, r - 1, 83, 25), Some((20, 9)));
    }
}
